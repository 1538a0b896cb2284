pub mod driver_accepted;
pub mod driver_confirmed;
pub mod progress_tick;

pub mod clock;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod fare;
pub mod geo;
pub mod matching;
pub mod otp;
pub mod service;
pub mod session;
pub mod systems;
pub mod telemetry;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
pub mod time;

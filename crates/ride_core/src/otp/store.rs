//! Challenge storage. The store owns the read-check-mark-consumed critical
//! section: `consume_latest_matching` is the compare-and-set that guarantees
//! a code succeeds for at most one of any number of racing verifications.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{OtpChallenge, PhoneNumber};

pub trait ChallengeStore: Send + Sync {
    /// Persists a freshly issued challenge.
    fn append(&self, challenge: OtpChallenge);

    /// Atomically consumes the most recent unconsumed, unexpired challenge
    /// for `phone` whose code matches. Returns `true` on the one successful
    /// consumption; every other outcome (wrong code, expired, already
    /// consumed, unknown phone) is `false`.
    fn consume_latest_matching(&self, phone: &PhoneNumber, code: &str, now_ms: u64) -> bool;
}

/// In-memory store. Challenges are appended in issue order, so "most recent"
/// is the last matching entry per phone.
#[derive(Debug, Default)]
pub struct MemoryChallengeStore {
    by_phone: Mutex<HashMap<PhoneNumber, Vec<OtpChallenge>>>,
}

impl MemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChallengeStore for MemoryChallengeStore {
    fn append(&self, challenge: OtpChallenge) {
        let mut by_phone = match self.by_phone.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        by_phone
            .entry(challenge.phone.clone())
            .or_default()
            .push(challenge);
    }

    fn consume_latest_matching(&self, phone: &PhoneNumber, code: &str, now_ms: u64) -> bool {
        let mut by_phone = match self.by_phone.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(challenges) = by_phone.get_mut(phone) else {
            return false;
        };
        let candidate = challenges
            .iter_mut()
            .rev()
            .find(|c| !c.consumed && c.expires_at > now_ms && c.code == code);
        match candidate {
            Some(challenge) => {
                challenge.consumed = true;
                true
            }
            None => false,
        }
    }
}

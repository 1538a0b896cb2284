//! One-time-code phone authentication.
//!
//! [OtpAuthority] owns the challenge lifecycle: it issues random 6-digit
//! codes bound to a normalized phone number, hands them to a
//! [CodeDelivery] collaborator, and consumes them exactly once on
//! verification. All state lives behind injected abstractions
//! ([ChallengeStore], [Clock](crate::time::Clock)); there is no ambient
//! process-wide table.

pub mod store;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::time::{Clock, ONE_MIN_MS};

pub use store::{ChallengeStore, MemoryChallengeStore};

/// Normalized, country-code-qualified phone number (`+` followed by 8 to 15
/// digits). Identity key for challenges, users, and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes and validates a raw phone string. Spaces and dashes are
    /// stripped; the result must be `+` plus 8-15 digits.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        let digits = match compact.strip_prefix('+') {
            Some(rest) => rest,
            None => {
                return Err(CoreError::Validation {
                    field: "phone",
                    reason: "missing country code prefix".into(),
                })
            }
        };
        if !(8..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::Validation {
                field: "phone",
                reason: "expected 8-15 digits after country code".into(),
            });
        }
        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One issued code. Appended by [OtpAuthority::request_code] and flipped to
/// `consumed` at most once by verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub phone: PhoneNumber,
    pub code: String,
    pub created_at: u64,
    pub expires_at: u64,
    pub consumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpConfig {
    /// Challenge time-to-live.
    pub ttl_ms: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5 * ONE_MIN_MS,
        }
    }
}

/// Out-of-band code dispatch (SMS in production). The engine never talks to
/// a network itself.
pub trait CodeDelivery: Send + Sync {
    fn deliver(&self, phone: &PhoneNumber, code: &str);

    /// When true, the issued code is echoed back to the caller. Only the
    /// developer/staging delivery does this.
    fn echoes_code(&self) -> bool {
        false
    }
}

/// Developer/staging delivery: no external dispatch, code returned in the
/// issue response.
#[derive(Debug, Default, Clone, Copy)]
pub struct DevEchoDelivery;

impl CodeDelivery for DevEchoDelivery {
    fn deliver(&self, _phone: &PhoneNumber, _code: &str) {}

    fn echoes_code(&self) -> bool {
        true
    }
}

/// Stable identity created on first successful verification of a phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

/// Phone -> identity registry. `find_or_create` is idempotent: repeated
/// logins for the same phone always resolve to the same [UserId].
#[derive(Debug, Default)]
pub struct UserDirectory {
    next_id: AtomicU64,
    by_phone: Mutex<HashMap<PhoneNumber, UserId>>,
}

impl UserDirectory {
    pub fn find_or_create(&self, phone: &PhoneNumber) -> UserId {
        let mut by_phone = match self.by_phone.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *by_phone
            .entry(phone.clone())
            .or_insert_with(|| UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Result of issuing a challenge. `dev_code` is populated only when the
/// delivery collaborator echoes codes (never in production).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedChallenge {
    pub phone: PhoneNumber,
    pub expires_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Issues and verifies one-time codes.
pub struct OtpAuthority {
    store: Box<dyn ChallengeStore>,
    users: UserDirectory,
    clock: Arc<dyn Clock>,
    delivery: Box<dyn CodeDelivery>,
    config: OtpConfig,
    rng: Mutex<StdRng>,
}

impl OtpAuthority {
    pub fn new(
        store: Box<dyn ChallengeStore>,
        clock: Arc<dyn Clock>,
        delivery: Box<dyn CodeDelivery>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            users: UserDirectory::default(),
            clock,
            delivery,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic code sequence for tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Issues a fresh challenge for `phone`. Older unconsumed challenges are
    /// left in place; verification picks the most recent match.
    pub fn request_code(&self, phone: &PhoneNumber) -> IssuedChallenge {
        let now = self.clock.now_ms();
        let code = {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            rng.gen_range(100_000..1_000_000).to_string()
        };
        let expires_at = now + self.config.ttl_ms;
        self.store.append(OtpChallenge {
            phone: phone.clone(),
            code: code.clone(),
            created_at: now,
            expires_at,
            consumed: false,
        });
        self.delivery.deliver(phone, &code);
        tracing::info!(phone = %phone, expires_at, "otp challenge issued");
        IssuedChallenge {
            phone: phone.clone(),
            expires_at,
            dev_code: self.delivery.echoes_code().then_some(code),
        }
    }

    /// Consumes the most recent unconsumed, unexpired challenge matching
    /// `code` and resolves the caller's identity. Wrong, expired, and
    /// already-consumed codes are rejected uniformly.
    pub fn verify_code(&self, phone: &PhoneNumber, code: &str) -> Result<UserId, CoreError> {
        let now = self.clock.now_ms();
        if !self.store.consume_latest_matching(phone, code, now) {
            tracing::debug!(phone = %phone, "otp verification rejected");
            return Err(CoreError::InvalidCredential);
        }
        let user = self.users.find_or_create(phone);
        tracing::info!(phone = %phone, subject = %user, "otp verified");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    fn authority(clock: Arc<ManualClock>) -> OtpAuthority {
        OtpAuthority::new(
            Box::new(MemoryChallengeStore::default()),
            clock,
            Box::new(DevEchoDelivery),
            OtpConfig::default(),
        )
        .with_rng_seed(7)
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("+919876543210").expect("valid phone")
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(
            PhoneNumber::parse("+91 98765-43210").expect("valid").as_str(),
            "+919876543210"
        );
        assert!(PhoneNumber::parse("9876543210").is_err());
        assert!(PhoneNumber::parse("+91abc").is_err());
        assert!(PhoneNumber::parse("+12").is_err());
    }

    #[test]
    fn issued_code_is_six_digits_and_echoed_in_dev() {
        let clock = Arc::new(ManualClock::new(1_000));
        let auth = authority(clock);
        let issued = auth.request_code(&phone());
        let code = issued.dev_code.expect("dev delivery echoes code");
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(issued.expires_at, 1_000 + 5 * ONE_MIN_MS);
    }

    #[test]
    fn code_consumed_exactly_once() {
        let clock = Arc::new(ManualClock::new(0));
        let auth = authority(clock);
        let p = phone();
        let code = auth.request_code(&p).dev_code.expect("code");

        assert_eq!(
            auth.verify_code(&p, "000000"),
            Err(CoreError::InvalidCredential)
        );
        let user = auth.verify_code(&p, &code).expect("first use succeeds");
        assert_eq!(
            auth.verify_code(&p, &code),
            Err(CoreError::InvalidCredential),
            "second use must be rejected"
        );

        // Same phone, later login: identity is stable.
        let code = auth.request_code(&p).dev_code.expect("code");
        assert_eq!(auth.verify_code(&p, &code), Ok(user));
    }

    #[test]
    fn expired_code_is_rejected_regardless_of_correctness() {
        let clock = Arc::new(ManualClock::new(0));
        let auth = authority(clock.clone());
        let p = phone();
        let code = auth.request_code(&p).dev_code.expect("code");

        clock.advance(5 * ONE_MIN_MS + 1);
        assert_eq!(
            auth.verify_code(&p, &code),
            Err(CoreError::InvalidCredential)
        );
    }

    #[test]
    fn latest_challenge_wins_but_older_one_remains_usable() {
        let clock = Arc::new(ManualClock::new(0));
        let auth = authority(clock.clone());
        let p = phone();
        let first = auth.request_code(&p).dev_code.expect("code");
        clock.advance(1_000);
        let second = auth.request_code(&p).dev_code.expect("code");

        assert!(auth.verify_code(&p, &second).is_ok());
        // Issuing a new challenge does not invalidate prior ones.
        assert!(auth.verify_code(&p, &first).is_ok());
    }

    #[test]
    fn directory_is_idempotent_per_phone() {
        let directory = UserDirectory::default();
        let a = directory.find_or_create(&phone());
        let b = directory.find_or_create(&phone());
        assert_eq!(a, b);
        let other = PhoneNumber::parse("+14155550100").expect("valid");
        assert_ne!(directory.find_or_create(&other), a);
    }
}

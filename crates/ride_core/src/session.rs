//! Session issuance and authorization.
//!
//! Successful OTP verification yields an opaque bearer token mapped to an
//! immutable [Session]. Authorization mirrors the OTP rejection philosophy:
//! missing, unknown, and expired tokens are all rejected as plain
//! "unauthorized".

use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::otp::UserId;
use crate::time::ONE_MIN_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Rider,
    Driver,
    Admin,
}

/// Immutable once issued; destroyed only by expiry or client-side discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub subject: UserId,
    pub role: Role,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Opaque bearer token presented on every privileged call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw bearer string received from a caller.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub ttl_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // 30 days, matching the reference deployment's token lifetime.
            ttl_ms: 30 * 24 * 60 * ONE_MIN_MS,
        }
    }
}

pub struct SessionManager {
    config: SessionConfig,
    rng: Mutex<StdRng>,
    active: Mutex<HashMap<SessionToken, Session>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            active: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, subject: UserId, role: Role, now_ms: u64) -> (SessionToken, Session) {
        let token = {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            SessionToken(format!("{:032x}", rng.gen::<u128>()))
        };
        let session = Session {
            subject,
            role,
            issued_at: now_ms,
            expires_at: now_ms + self.config.ttl_ms,
        };
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        active.insert(token.clone(), session);
        (token, session)
    }

    /// Resolves a token to its session. Expired entries are dropped on the
    /// way out; all failure cases collapse to [CoreError::Unauthorized].
    pub fn authorize(&self, token: &SessionToken, now_ms: u64) -> Result<Session, CoreError> {
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match active.get(token) {
            Some(session) if session.expires_at > now_ms => Ok(*session),
            Some(_) => {
                active.remove(token);
                Err(CoreError::Unauthorized)
            }
            None => Err(CoreError::Unauthorized),
        }
    }
}

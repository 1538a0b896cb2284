//! Transport-agnostic facade over the engine.
//!
//! This is the surface an HTTP layer (or the demo CLI) calls into: OTP
//! login, quoting, driver matching, and the ride lifecycle operations.
//! Validation and authorization happen here, before any state mutation;
//! privileged calls take the bearer token issued at login. A failed
//! confirmation propagates as an error, never as a disguised success.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::engine::{ProgressConfig, RideEngine, RideId, RideSnapshot};
use crate::error::CoreError;
use crate::fare::{FareConfig, FareQuote, RideMode};
use crate::geo::{trip_distance_km, Place};
use crate::matching::{match_drivers, DriverProfile, MatchConstraints};
use crate::otp::{
    CodeDelivery, DevEchoDelivery, MemoryChallengeStore, OtpAuthority, OtpConfig, PhoneNumber,
    UserId,
};
use crate::session::{Role, SessionConfig, SessionManager, SessionToken};
use crate::telemetry::EngineTelemetry;
use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceConfig {
    pub otp: OtpConfig,
    pub session: SessionConfig,
    pub fare: FareConfig,
    pub progress: ProgressConfig,
}

/// Response to an OTP request. `dev_code` is present only with the
/// developer-echo delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequested {
    pub challenge_issued: bool,
    pub expires_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSession {
    pub token: SessionToken,
    pub subject: UserId,
    pub role: Role,
}

/// A quote plus whether the distance came from the fallback heuristic
/// (either endpoint unresolved) rather than the actual coordinates.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote: FareQuote,
    pub distance_estimated: bool,
}

/// Companion contact a rider may attach when booking for someone else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateContact {
    pub name: String,
    pub phone: String,
}

/// The booking wizard's output: immutable once a quote is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub mode: String,
    pub pickup: Place,
    pub destination: Place,
    pub rider_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_contact: Option<AlternateContact>,
}

pub struct RideService {
    clock: Arc<dyn Clock>,
    auth: OtpAuthority,
    sessions: SessionManager,
    fares: FareConfig,
    pool: Vec<DriverProfile>,
    engine: Mutex<RideEngine>,
}

impl RideService {
    /// Production-shaped service: system clock, dev-echo OTP delivery.
    pub fn new(config: ServiceConfig, pool: Vec<DriverProfile>) -> Self {
        Self::with_parts(config, pool, Arc::new(SystemClock), Box::new(DevEchoDelivery))
    }

    /// Full injection point: tests pass a manual clock, deployments pass a
    /// real delivery collaborator.
    pub fn with_parts(
        config: ServiceConfig,
        pool: Vec<DriverProfile>,
        clock: Arc<dyn Clock>,
        delivery: Box<dyn CodeDelivery>,
    ) -> Self {
        let auth = OtpAuthority::new(
            Box::new(MemoryChallengeStore::new()),
            clock.clone(),
            delivery,
            config.otp,
        );
        Self {
            clock,
            auth,
            sessions: SessionManager::new(config.session),
            fares: config.fare,
            pool,
            engine: Mutex::new(RideEngine::new(config.progress)),
        }
    }

    pub fn request_otp(&self, phone: &str) -> Result<OtpRequested, CoreError> {
        let phone = PhoneNumber::parse(phone)?;
        let issued = self.auth.request_code(&phone);
        Ok(OtpRequested {
            challenge_issued: true,
            expires_at: issued.expires_at,
            dev_code: issued.dev_code,
        })
    }

    pub fn verify_otp(&self, phone: &str, code: &str) -> Result<VerifiedSession, CoreError> {
        let phone = PhoneNumber::parse(phone)?;
        let subject = self.auth.verify_code(&phone, code)?;
        let (token, session) = self
            .sessions
            .issue(subject, Role::Rider, self.clock.now_ms());
        tracing::info!(subject = %subject, "session issued");
        Ok(VerifiedSession {
            token,
            subject: session.subject,
            role: session.role,
        })
    }

    /// Quotes a trip. When either endpoint is unresolved the configured
    /// fallback distance is priced instead and the response says so.
    pub fn quote(
        &self,
        mode: &str,
        pickup: &Place,
        destination: &Place,
    ) -> Result<QuoteResponse, CoreError> {
        let mode = mode.parse::<RideMode>()?;
        validate_place("pickup", pickup)?;
        validate_place("destination", destination)?;

        let response = match trip_distance_km(pickup, destination) {
            Some(km) => QuoteResponse {
                quote: self.fares.estimate(mode, km),
                distance_estimated: false,
            },
            None => QuoteResponse {
                quote: self.fares.estimate(mode, self.fares.fallback_distance_km),
                distance_estimated: true,
            },
        };
        tracing::debug!(
            %mode,
            fare = response.quote.fare,
            estimated = response.distance_estimated,
            "quote produced"
        );
        Ok(response)
    }

    /// Validates a full booking request and quotes it. The booking is
    /// immutable once this returns; its quote is what gets frozen into the
    /// ride at confirmation.
    pub fn quote_booking(&self, booking: &BookingRequest) -> Result<QuoteResponse, CoreError> {
        PhoneNumber::parse(&booking.rider_phone)?;
        if let Some(contact) = &booking.alternate_contact {
            PhoneNumber::parse(&contact.phone)?;
        }
        self.quote(&booking.mode, &booking.pickup, &booking.destination)
    }

    /// Filters and ranks the driver pool. An empty vec is a valid "no match
    /// under current constraints" outcome.
    pub fn match_drivers(
        &self,
        mode: &str,
        constraints: &MatchConstraints,
    ) -> Result<Vec<DriverProfile>, CoreError> {
        let mode = mode.parse::<RideMode>()?;
        Ok(match_drivers(&self.pool, mode, constraints))
    }

    pub fn confirm_ride(
        &self,
        token: &SessionToken,
        quote: FareQuote,
        driver: DriverProfile,
    ) -> Result<RideId, CoreError> {
        let now = self.clock.now_ms();
        self.sessions.authorize(token, now)?;
        Ok(self.lock_engine().confirm_ride(now, quote, driver))
    }

    pub fn start_ride(&self, token: &SessionToken, id: RideId) -> Result<(), CoreError> {
        let now = self.clock.now_ms();
        self.sessions.authorize(token, now)?;
        self.lock_engine().start_ride(now, id)
    }

    pub fn cancel_ride(&self, token: &SessionToken, id: RideId) -> Result<(), CoreError> {
        let now = self.clock.now_ms();
        self.sessions.authorize(token, now)?;
        self.lock_engine().cancel_ride(now, id)
    }

    pub fn get_progress(&self, token: &SessionToken, id: RideId) -> Result<RideSnapshot, CoreError> {
        let now = self.clock.now_ms();
        self.sessions.authorize(token, now)?;
        self.lock_engine().progress(now, id)
    }

    pub fn telemetry(&self) -> EngineTelemetry {
        self.lock_engine().telemetry()
    }

    fn lock_engine(&self) -> MutexGuard<'_, RideEngine> {
        match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn validate_place(field: &'static str, place: &Place) -> Result<(), CoreError> {
    match place.coord {
        Some(coord) if !coord.is_valid() => Err(CoreError::Validation {
            field,
            reason: format!("coordinates out of range: {:.4},{:.4}", coord.lat, coord.lon),
        }),
        _ => Ok(()),
    }
}

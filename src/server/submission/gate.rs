//! Client-side pre-check in front of booking creation.
//!
//! The check is optimistic: nothing stops another booking from landing between the
//! evaluation and the remote create call. The backend remains the authority.

use std::time::Duration;
use log::{info, warn};
use serde::Serialize;
use crate::server::availability::{evaluate, Availability};
use crate::server::model::booking::{BookingRecord, CreateBookingRequest};
use crate::server::remote::BookingBackend;
use crate::server::session::Session;
use crate::server::submission::{Begin, SubmissionRegistry};
use crate::server::venue::{load_calendar, VenueError};

pub(crate) const SUBMITTED_MESSAGE: &str = "We'll contact you within 24 hours to confirm your reservation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub(crate) enum RejectReason {
    FullyBooked,
    Limited { remaining: u32 },
}

impl RejectReason {
    pub fn message(&self) -> String {
        match self {
            RejectReason::FullyBooked => "This date is fully booked. Please select another date.".to_string(),
            RejectReason::Limited { remaining } => format!(
                "This date can only accommodate {remaining} more guests. Please adjust your guest count or select another date."
            ),
        }
    }

    pub fn remaining_capacity(&self) -> u32 {
        match self {
            RejectReason::FullyBooked => 0,
            RejectReason::Limited { remaining } => *remaining,
        }
    }
}

/// Only `Available` may reach the backend.
pub(crate) fn decide(availability: Availability) -> Result<(), RejectReason> {
    match availability {
        Availability::Available => Ok(()),
        Availability::Limited { remaining } => Err(RejectReason::Limited { remaining }),
        Availability::Unavailable => Err(RejectReason::FullyBooked),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GateOutcome {
    Submitted(BookingRecord),
    /// the same idempotency key already produced this booking
    Replayed(BookingRecord),
    /// the same idempotency key is being submitted right now
    InFlight,
    Rejected(RejectReason),
}

/// how long a completed idempotency key keeps replaying its booking
const REPLAY_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Idempotency key of one booking submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmissionKey {
    /// sent by the caller, repeats are deduplicated
    Client(String),
    /// made up for a caller that sent none, it can never repeat and is not tracked
    Generated(String),
}

impl SubmissionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SubmissionKey::Client(key) | SubmissionKey::Generated(key) => key,
        }
    }
}

pub(crate) struct BookingGate {
    submissions: SubmissionRegistry<String, BookingRecord>,
}

impl BookingGate {
    pub fn new() -> Self {
        Self {
            submissions: SubmissionRegistry::new(REPLAY_WINDOW),
        }
    }

    pub async fn submit<B: BookingBackend>(
        &self,
        backend: &B,
        session: &Session,
        key: SubmissionKey,
        request: &CreateBookingRequest,
    ) -> Result<GateOutcome, VenueError> {
        let tracked = match &key {
            SubmissionKey::Client(key) => Some(key.clone()),
            SubmissionKey::Generated(_) => None,
        };
        if let Some(tracked) = &tracked {
            match self.submissions.begin(tracked.clone()) {
                Begin::Proceed => {}
                Begin::InFlight => {
                    warn!("booking submission {} is already in flight", tracked);
                    return Ok(GateOutcome::InFlight);
                }
                Begin::Completed(record) => {
                    warn!("booking submission {} already completed as booking {}", tracked, record.id);
                    return Ok(GateOutcome::Replayed(record));
                }
            }
        }

        let result = Self::check_and_create(backend, session, key.as_str(), request).await;
        if let Some(tracked) = tracked {
            match &result {
                Ok(GateOutcome::Submitted(record)) => self.submissions.finish(tracked, record.clone()),
                _ => self.submissions.abort(&tracked),
            }
        }
        result
    }

    async fn check_and_create<B: BookingBackend>(
        backend: &B,
        session: &Session,
        idempotency_key: &str,
        request: &CreateBookingRequest,
    ) -> Result<GateOutcome, VenueError> {
        let date = request.booking_date;
        let calendar = load_calendar(backend, session, request.restaurant_id, date, date).await?;
        if let Err(reason) = decide(evaluate(date, request.number_of_guests, &calendar.days)) {
            info!(
                "booking for {} guests at restaurant {} on {} refused locally, {:?}",
                request.number_of_guests, request.restaurant_id, date, reason
            );
            return Ok(GateOutcome::Rejected(reason));
        }

        let record = backend.create_booking(session, idempotency_key, request).await?;
        info!("booking {} created for restaurant {} on {}", record.id, record.restaurant_id, date);
        Ok(GateOutcome::Submitted(record))
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use crate::server::availability::DayAvailability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum Availability {
    Available,
    /// some seats are left, but fewer than requested
    Limited { remaining: u32 },
    Unavailable,
}

/// Classify a party of `candidate_guests` on `candidate_date`.
///
/// A date missing from `days` is reported as available: the window did not cover it, and
/// the backend stays the authority on the final decision.
pub(crate) fn evaluate(candidate_date: NaiveDate, candidate_guests: u32, days: &[DayAvailability]) -> Availability {
    match days.iter().find(|d| d.date == candidate_date) {
        None => Availability::Available,
        Some(day) if day.remaining_capacity == 0 => Availability::Unavailable,
        Some(day) if day.remaining_capacity < candidate_guests => Availability::Limited {
            remaining: day.remaining_capacity,
        },
        Some(_) => Availability::Available,
    }
}

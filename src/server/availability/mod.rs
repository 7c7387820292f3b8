//! Booking availability.
//!
//! [`annotate`] folds a venue's bookings into one [`DayAvailability`] per calendar day and
//! [`evaluate`] classifies a candidate party against those days. Every place that needs to
//! know whether a date can take a booking goes through this pair.

mod calendar;
mod error;
mod evaluator;

pub(crate) use calendar::{annotate, DayAvailability};
pub(crate) use error::AvailabilityError;
pub(crate) use evaluator::{evaluate, Availability};

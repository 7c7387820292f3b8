use chrono::NaiveDate;
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub(crate) enum AvailabilityError {
    #[display("invalid date range, start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[display("invalid venue capacity {capacity}, must be positive")]
    InvalidCapacity { capacity: i32 },
}

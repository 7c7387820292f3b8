use std::collections::HashMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::server::availability::AvailabilityError;
use crate::server::model::booking::Booking;

/// Aggregated bookings for one day of one venue. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DayAvailability {
    pub date: NaiveDate,
    pub booked_guest_total: u32,
    /// `max(0, capacity - booked_guest_total)`, never above capacity
    pub remaining_capacity: u32,
    pub is_fully_booked: bool,
}

impl DayAvailability {
    fn new(date: NaiveDate, capacity: u32, booked_guest_total: u32) -> Self {
        let remaining_capacity = capacity.saturating_sub(booked_guest_total);
        Self {
            date,
            booked_guest_total,
            remaining_capacity,
            is_fully_booked: remaining_capacity == 0,
        }
    }
}

/// Build one entry per day in `[start, end]`, ascending.
///
/// Bookings outside the range and bookings whose status does not consume capacity
/// (rejected, cancelled) are ignored. Days without bookings keep the full capacity.
pub(crate) fn annotate(
    venue_capacity: i32,
    bookings: &[Booking],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayAvailability>, AvailabilityError> {
    let capacity = u32::try_from(venue_capacity)
        .ok()
        .filter(|c| *c > 0)
        .ok_or(AvailabilityError::InvalidCapacity { capacity: venue_capacity })?;
    if start > end {
        return Err(AvailabilityError::InvalidRange { start, end });
    }

    let mut totals: HashMap<NaiveDate, u32> = HashMap::new();
    for booking in bookings
        .iter()
        .filter(|b| b.status.consumes_capacity() && (start..=end).contains(&b.date))
    {
        let total = totals.entry(booking.date).or_default();
        *total = total.saturating_add(booking.guest_count);
    }

    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DayAvailability::new(date, capacity, totals.get(&date).copied().unwrap_or(0)))
        .collect())
}

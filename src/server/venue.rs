//! Loading a venue's capacity and bookings from the backend and turning them into a calendar.

use chrono::NaiveDate;
use derive_more::{Display, Error};
use log::{info, warn};
use crate::server::availability::{annotate, AvailabilityError, DayAvailability};
use crate::server::model::booking::{Booking, BookingFilters, BookingStatus};
use crate::server::model::restaurant::Restaurant;
use crate::server::remote::{BookingBackend, RemoteError};
use crate::server::session::Session;

#[derive(Debug, Display, Error)]
pub(crate) enum VenueError {
    #[display("{source}")]
    Remote { source: RemoteError },
    #[display("{source}")]
    Availability { source: AvailabilityError },
}

impl From<RemoteError> for VenueError {
    fn from(source: RemoteError) -> Self {
        VenueError::Remote { source }
    }
}

impl From<AvailabilityError> for VenueError {
    fn from(source: AvailabilityError) -> Self {
        VenueError::Availability { source }
    }
}

#[derive(Debug)]
pub(crate) struct VenueCalendar {
    pub restaurant: Restaurant,
    pub days: Vec<DayAvailability>,
}

/// Fetch the restaurant and its bookings, then annotate every day in `[start, end]`.
///
/// Booking data is only visible to signed-in callers, so an anonymous session fails locally
/// with `Unauthorized` before any remote call.
pub(crate) async fn load_calendar<B: BookingBackend>(
    backend: &B,
    session: &Session,
    restaurant_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<VenueCalendar, VenueError> {
    if start > end {
        return Err(AvailabilityError::InvalidRange { start, end }.into());
    }
    if !session.is_authenticated() {
        return Err(RemoteError::Unauthorized.into());
    }
    let restaurant = backend.restaurant(restaurant_id).await?;
    let bookings = bookings_for(backend, session, &restaurant, start, end).await?;
    let days = annotate(restaurant.capacity, &bookings, start, end)?;
    Ok(VenueCalendar { restaurant, days })
}

/// Live bookings of `restaurant` between `start` and `end`.
///
/// Staff get the full rows with guest counts and statuses. Everyone else, and staff the
/// backend refuses for this restaurant, get the booked dates, which the backend already
/// restricts to pending and confirmed bookings. Each booked date reserves the whole venue.
pub(crate) async fn bookings_for<B: BookingBackend>(
    backend: &B,
    session: &Session,
    restaurant: &Restaurant,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Booking>, RemoteError> {
    if session.role().is_staff() {
        let filters = BookingFilters {
            status: None,
            from_date: Some(start),
            to_date: Some(end),
        };
        match backend.restaurant_bookings(session, restaurant.id, &filters).await {
            Ok(records) => return Ok(records.iter().map(Booking::from).collect()),
            Err(RemoteError::Forbidden) => {
                info!("session may not list bookings of restaurant {}, using booked dates", restaurant.id);
            }
            Err(e) => {
                warn!("failed to list bookings of restaurant {}, {}", restaurant.id, e);
                return Err(e);
            }
        }
    }
    let dates = backend.booked_dates(session, restaurant.id, start, end).await.map_err(|e| {
        warn!("failed to read booked dates of restaurant {}, {}", restaurant.id, e);
        e
    })?;
    Ok(whole_venue_bookings(restaurant, &dates))
}

fn whole_venue_bookings(restaurant: &Restaurant, dates: &[NaiveDate]) -> Vec<Booking> {
    let whole_venue = u32::try_from(restaurant.capacity).unwrap_or(0);
    dates
        .iter()
        .map(|&date| Booking {
            restaurant_id: restaurant.id,
            date,
            guest_count: whole_venue,
            status: BookingStatus::Pending,
        })
        .collect()
}

use actix_web::web;
use chrono::NaiveDate;
use crate::server::controller::error::CustomError;

pub(crate) mod auth;
pub(crate) mod availability;
pub(crate) mod bookings;
pub(crate) mod error;
pub(crate) mod listings;
pub(crate) mod restaurants;
pub(crate) mod reviews;

/// Longest range, in days, a single calendar or annotate request may cover.
pub(crate) const MAX_RANGE_DAYS: i64 = 366;

/// Refuse ranges longer than [`MAX_RANGE_DAYS`]. Inverted ranges are left to the annotator.
pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), CustomError> {
    let days = end.signed_duration_since(start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(CustomError::bad_request(format!(
            "range {start}..{end} covers {days} days, at most {MAX_RANGE_DAYS} are allowed"
        )));
    }
    Ok(())
}

/// Register every handler of the service.
pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(restaurants::get_restaurants)
        .service(restaurants::get_restaurant)
        .service(restaurants::get_calendar)
        .service(restaurants::get_availability)
        .service(restaurants::put_restaurant)
        .service(restaurants::delete_restaurant)
        .service(restaurants::get_restaurant_images)
        .service(bookings::post_bookings)
        .service(bookings::get_restaurant_bookings)
        .service(bookings::get_my_bookings)
        .service(bookings::put_booking_confirm)
        .service(bookings::put_booking_reject)
        .service(reviews::get_reviews)
        .service(reviews::post_reviews)
        .service(reviews::post_review_reply)
        .service(auth::post_login)
        .service(listings::post_listing_complete)
        .service(availability::post_annotate);
}

#[cfg(test)]
pub(crate) mod test_util {
    use actix_web::web;
use chrono::NaiveDate;
use crate::server::controller::error::CustomError;
    use crate::server::remote::mock::MockBackend;
    use crate::server::state::AppState;

    pub fn state(backend: MockBackend) -> web::Data<AppState> {
        web::Data::new(AppState::new(backend, 10))
    }
}

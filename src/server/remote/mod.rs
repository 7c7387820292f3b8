//! The remote REST API that owns restaurants, bookings, reviews and accounts.

pub(crate) mod api;
#[cfg(test)]
pub(crate) mod mock;

use chrono::NaiveDate;
use derive_more::{Display, Error};
use crate::server::model::auth::{LoginRequest, LoginResponse};
use crate::server::model::booking::{BookingFilters, BookingRecord, CreateBookingRequest};
use crate::server::model::listing::PaidListingRequest;
use crate::server::model::restaurant::{Restaurant, RestaurantImage, RestaurantUpdate};
use crate::server::model::review::{CreateReviewRequest, ReplyReviewRequest, Review};
use crate::server::model::MessageResponse;
use crate::server::session::Session;

pub(crate) const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Display, Error)]
pub(crate) enum RemoteError {
    #[display("authentication required")]
    Unauthorized,
    #[display("operation not permitted")]
    Forbidden,
    #[display("resource not found")]
    NotFound,
    #[display("backend rejected the request with {status}, {detail}")]
    Rejected { status: u16, detail: String },
    #[display("failed to reach backend, {source}")]
    Transport { source: reqwest::Error },
    #[display("failed to decode backend response, {source}")]
    Decode { source: reqwest::Error },
}

impl RemoteError {
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 => RemoteError::Unauthorized,
            403 => RemoteError::Forbidden,
            404 => RemoteError::NotFound,
            status => RemoteError::Rejected { status, detail },
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_decode() {
            RemoteError::Decode { source }
        } else {
            RemoteError::Transport { source }
        }
    }
}

/// Operations offered by the remote backend. Every call is issued once, there is no retry.
pub(crate) trait BookingBackend {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RemoteError>;

    async fn restaurant(&self, id: i64) -> Result<Restaurant, RemoteError>;

    async fn update_restaurant(
        &self,
        session: &Session,
        id: i64,
        update: &RestaurantUpdate,
    ) -> Result<Restaurant, RemoteError>;

    async fn delete_restaurant(&self, session: &Session, id: i64) -> Result<MessageResponse, RemoteError>;

    async fn restaurant_images(&self, id: i64) -> Result<Vec<RestaurantImage>, RemoteError>;

    /// ids of restaurants holding a confirmed booking on `date`
    async fn reserved_restaurants(&self, date: NaiveDate) -> Result<Vec<i64>, RemoteError>;

    /// Dates of pending or confirmed bookings of a restaurant, one entry per booking.
    /// Open to any signed-in session.
    async fn booked_dates(
        &self,
        session: &Session,
        restaurant_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RemoteError>;

    async fn restaurant_bookings(
        &self,
        session: &Session,
        restaurant_id: i64,
        filters: &BookingFilters,
    ) -> Result<Vec<BookingRecord>, RemoteError>;

    async fn my_bookings(&self, session: &Session) -> Result<Vec<BookingRecord>, RemoteError>;

    async fn create_booking(
        &self,
        session: &Session,
        idempotency_key: &str,
        payload: &CreateBookingRequest,
    ) -> Result<BookingRecord, RemoteError>;

    async fn confirm_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError>;

    async fn reject_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError>;

    async fn reviews(&self, restaurant_id: i64) -> Result<Vec<Review>, RemoteError>;

    async fn create_review(&self, restaurant_id: i64, review: &CreateReviewRequest) -> Result<Review, RemoteError>;

    async fn reply_review(
        &self,
        session: &Session,
        review_id: i64,
        reply: &ReplyReviewRequest,
    ) -> Result<Review, RemoteError>;

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, RemoteError>;

    async fn complete_listing(
        &self,
        idempotency_key: &str,
        listing: &PaidListingRequest,
    ) -> Result<Restaurant, RemoteError>;
}

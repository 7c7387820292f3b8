use std::time::Duration;
use chrono::NaiveDate;
use log::{error, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::server::model::auth::{LoginRequest, LoginResponse};
use crate::server::model::booking::{BookingFilters, BookingRecord, CreateBookingRequest};
use crate::server::model::listing::PaidListingRequest;
use crate::server::model::restaurant::{Restaurant, RestaurantImage, RestaurantUpdate};
use crate::server::model::review::{CreateReviewRequest, ReplyReviewRequest, Review};
use crate::server::model::MessageResponse;
use crate::server::remote::{BookingBackend, RemoteError, IDEMPOTENCY_KEY_HEADER};
use crate::server::session::Session;

/// reqwest backed client of the remote REST API
#[derive(Clone)]
pub(crate) struct RemoteApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl RemoteApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// attach the bearer token, or fail locally without issuing the call
    fn authorized(builder: RequestBuilder, session: &Session) -> Result<RequestBuilder, RemoteError> {
        match session.token() {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(RemoteError::Unauthorized),
        }
    }

    fn with_session(builder: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, RemoteError> {
        let response = builder.send().await.map_err(|e| {
            error!("backend request failed, {}", e);
            RemoteError::from(e)
        })?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let url = response.url().clone();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| detail_text(body.detail))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        warn!("backend answered {} for {}, {}", status, url, detail);
        Err(RemoteError::from_status(status.as_u16(), detail))
    }
}

/// The backend reports `detail` either as a message or as a validation error list.
fn detail_text(detail: serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(message) => message,
        other => other.to_string(),
    }
}

impl BookingBackend for RemoteApi {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RemoteError> {
        Self::send(self.client.get(self.url("restaurants/"))).await
    }

    async fn restaurant(&self, id: i64) -> Result<Restaurant, RemoteError> {
        Self::send(self.client.get(self.url(&format!("restaurants/{id}")))).await
    }

    async fn update_restaurant(
        &self,
        session: &Session,
        id: i64,
        update: &RestaurantUpdate,
    ) -> Result<Restaurant, RemoteError> {
        let builder = self.client.put(self.url(&format!("restaurants/{id}"))).json(update);
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn delete_restaurant(&self, session: &Session, id: i64) -> Result<MessageResponse, RemoteError> {
        let builder = self.client.delete(self.url(&format!("restaurants/{id}")));
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn restaurant_images(&self, id: i64) -> Result<Vec<RestaurantImage>, RemoteError> {
        Self::send(self.client.get(self.url(&format!("restaurants/{id}/images/")))).await
    }

    async fn reserved_restaurants(&self, date: NaiveDate) -> Result<Vec<i64>, RemoteError> {
        Self::send(self.client.get(self.url(&format!("bookings/reserved/{date}")))).await
    }

    async fn booked_dates(
        &self,
        session: &Session,
        restaurant_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RemoteError> {
        let builder = self
            .client
            .get(self.url(&format!("bookings/booked-dates/{restaurant_id}")))
            .query(&[("start_date", start), ("end_date", end)]);
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn restaurant_bookings(
        &self,
        session: &Session,
        restaurant_id: i64,
        filters: &BookingFilters,
    ) -> Result<Vec<BookingRecord>, RemoteError> {
        let builder = self
            .client
            .get(self.url(&format!("bookings/restaurant/{restaurant_id}")))
            .query(filters);
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn my_bookings(&self, session: &Session) -> Result<Vec<BookingRecord>, RemoteError> {
        let builder = self.client.get(self.url("bookings/restaurant/"));
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn create_booking(
        &self,
        session: &Session,
        idempotency_key: &str,
        payload: &CreateBookingRequest,
    ) -> Result<BookingRecord, RemoteError> {
        let builder = self
            .client
            .post(self.url("bookings/"))
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(payload);
        Self::send(Self::with_session(builder, session)).await
    }

    async fn confirm_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError> {
        let builder = self.client.put(self.url(&format!("bookings/{booking_id}/confirm")));
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn reject_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError> {
        let builder = self.client.put(self.url(&format!("bookings/{booking_id}/reject")));
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn reviews(&self, restaurant_id: i64) -> Result<Vec<Review>, RemoteError> {
        Self::send(self.client.get(self.url(&format!("reviews/restaurants/{restaurant_id}/reviews/")))).await
    }

    async fn create_review(&self, restaurant_id: i64, review: &CreateReviewRequest) -> Result<Review, RemoteError> {
        // the backend reads the review from the query string, not the body
        let builder = self
            .client
            .post(self.url(&format!("reviews/restaurants/{restaurant_id}/reviews/")))
            .query(review);
        Self::send(builder).await
    }

    async fn reply_review(
        &self,
        session: &Session,
        review_id: i64,
        reply: &ReplyReviewRequest,
    ) -> Result<Review, RemoteError> {
        let builder = self.client.post(self.url(&format!("reviews/{review_id}/reply"))).json(reply);
        Self::send(Self::authorized(builder, session)?).await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, RemoteError> {
        Self::send(self.client.post(self.url("auth/login")).json(credentials)).await
    }

    async fn complete_listing(
        &self,
        idempotency_key: &str,
        listing: &PaidListingRequest,
    ) -> Result<Restaurant, RemoteError> {
        let builder = self
            .client
            .post(self.url("restaurants/create-after-payment/"))
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(listing);
        Self::send(builder).await
    }
}

//! In-memory stand-in for the remote REST API, swapped in for every test build.
//!
//! Mirrors the backend's access rules: booking lists, status changes and restaurant edits are
//! staff only, booked dates and booking creation need any signed-in session. Booked dates and
//! reserved restaurants apply the backend's status filters. Idempotency keys of create calls
//! are recorded so tests can count remote submissions.
use std::sync::Mutex;
use chrono::NaiveDate;
use crate::server::model::auth::{LoginRequest, LoginResponse};
use crate::server::model::booking::{BookingFilters, BookingRecord, BookingStatus, CreateBookingRequest};
use crate::server::model::listing::PaidListingRequest;
use crate::server::model::restaurant::fixtures;
use crate::server::model::restaurant::{Restaurant, RestaurantImage, RestaurantUpdate};
use crate::server::model::review::{CreateReviewRequest, ReplyReviewRequest, Review};
use crate::server::model::MessageResponse;
use crate::server::remote::{BookingBackend, RemoteError};
use crate::server::session::{Role, Session};

#[derive(Default)]
pub(crate) struct MockBackend {
    pub restaurants: Mutex<Vec<Restaurant>>,
    pub bookings: Mutex<Vec<BookingRecord>>,
    pub reviews: Mutex<Vec<Review>>,
    /// idempotency keys of every create_booking call, in order
    pub create_calls: Mutex<Vec<String>>,
    /// idempotency keys of every complete_listing call, in order
    pub listing_calls: Mutex<Vec<String>>,
    pub fail_create_with: Mutex<Option<RemoteError>>,
    /// staff are refused booking lists, as for a restaurant they do not own
    pub forbid_booking_lists: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restaurant(self, restaurant: Restaurant) -> Self {
        self.restaurants.lock().unwrap().push(restaurant);
        self
    }

    pub fn with_booking(self, record: BookingRecord) -> Self {
        self.bookings.lock().unwrap().push(record);
        self
    }

    pub fn with_review(self, review: Review) -> Self {
        self.reviews.lock().unwrap().push(review);
        self
    }

    pub fn forbidding_booking_lists(mut self) -> Self {
        self.forbid_booking_lists = true;
        self
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> Vec<String> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.lock().unwrap().len()
    }

    fn transition(&self, session: &Session, booking_id: i64, status: BookingStatus) -> Result<BookingRecord, RemoteError> {
        staff_only(session)?;
        let mut bookings = self.bookings.lock().unwrap();
        let record = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or(RemoteError::NotFound)?;
        record.status = status;
        Ok(record.clone())
    }

    fn known_restaurant(&self, id: i64) -> Result<(), RemoteError> {
        match self.restaurants.lock().unwrap().iter().any(|r| r.id == id) {
            true => Ok(()),
            false => Err(RemoteError::NotFound),
        }
    }
}

fn signed_in(session: &Session) -> Result<(), RemoteError> {
    match session.is_authenticated() {
        true => Ok(()),
        false => Err(RemoteError::Unauthorized),
    }
}

fn staff_only(session: &Session) -> Result<(), RemoteError> {
    signed_in(session)?;
    if !session.role().is_staff() {
        return Err(RemoteError::Forbidden);
    }
    Ok(())
}

pub(crate) fn record(id: i64, restaurant_id: i64, date: NaiveDate, guests: u32, status: BookingStatus) -> BookingRecord {
    BookingRecord {
        id,
        booking_username: format!("guest {id}"),
        email: format!("guest{id}@example.com"),
        phone_number: "+100000".to_string(),
        event_type: "banquet".to_string(),
        number_of_guests: guests,
        additional_information: None,
        user_id: 1,
        restaurant_id,
        booking_date: date,
        status,
    }
}

pub(crate) fn review(id: i64, restaurant_id: i64, rating: u8) -> Review {
    Review {
        id,
        username: format!("reviewer {id}"),
        rating,
        comment: Some("Lovely evening".to_string()),
        restaurant_id,
        reply: None,
    }
}

fn apply(restaurant: &mut Restaurant, update: &RestaurantUpdate) {
    let update = update.clone();
    if let Some(v) = update.name { restaurant.name = v; }
    if let Some(v) = update.description { restaurant.description = v; }
    if let Some(v) = update.location { restaurant.location = v; }
    if let Some(v) = update.address { restaurant.address = v; }
    if let Some(v) = update.category { restaurant.category = v; }
    if let Some(v) = update.capacity { restaurant.capacity = v; }
    if let Some(v) = update.price_range { restaurant.price_range = v; }
    if let Some(v) = update.features { restaurant.features = v; }
    if let Some(v) = update.cuisines { restaurant.cuisines = v; }
    if let Some(v) = update.contact_phone { restaurant.contact_phone = v; }
    if let Some(v) = update.contact_email { restaurant.contact_email = v; }
    if let Some(urls) = update.image_urls {
        let next_id = restaurant.images.len() as i64 + 1;
        restaurant.images.extend(
            urls.into_iter()
                .enumerate()
                .map(|(i, url)| RestaurantImage { id: next_id + i as i64, url }),
        );
    }
}

impl BookingBackend for MockBackend {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RemoteError> {
        Ok(self.restaurants.lock().unwrap().clone())
    }

    async fn restaurant(&self, id: i64) -> Result<Restaurant, RemoteError> {
        self.restaurants
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn update_restaurant(
        &self,
        session: &Session,
        id: i64,
        update: &RestaurantUpdate,
    ) -> Result<Restaurant, RemoteError> {
        staff_only(session)?;
        let mut restaurants = self.restaurants.lock().unwrap();
        let restaurant = restaurants.iter_mut().find(|r| r.id == id).ok_or(RemoteError::NotFound)?;
        apply(restaurant, update);
        Ok(restaurant.clone())
    }

    async fn delete_restaurant(&self, session: &Session, id: i64) -> Result<MessageResponse, RemoteError> {
        staff_only(session)?;
        let mut restaurants = self.restaurants.lock().unwrap();
        let before = restaurants.len();
        restaurants.retain(|r| r.id != id);
        if restaurants.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(MessageResponse {
            message: "Restaurant deleted successfully".to_string(),
        })
    }

    async fn restaurant_images(&self, id: i64) -> Result<Vec<RestaurantImage>, RemoteError> {
        self.restaurant(id).await.map(|r| r.images)
    }

    async fn reserved_restaurants(&self, date: NaiveDate) -> Result<Vec<i64>, RemoteError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.booking_date == date && b.status == BookingStatus::Confirmed)
            .map(|b| b.restaurant_id)
            .collect())
    }

    async fn booked_dates(
        &self,
        session: &Session,
        restaurant_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RemoteError> {
        signed_in(session)?;
        self.known_restaurant(restaurant_id)?;
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.restaurant_id == restaurant_id)
            .filter(|b| matches!(b.status, BookingStatus::Pending | BookingStatus::Confirmed))
            .filter(|b| (start..=end).contains(&b.booking_date))
            .map(|b| b.booking_date)
            .collect())
    }

    async fn restaurant_bookings(
        &self,
        session: &Session,
        restaurant_id: i64,
        filters: &BookingFilters,
    ) -> Result<Vec<BookingRecord>, RemoteError> {
        staff_only(session)?;
        if self.forbid_booking_lists {
            return Err(RemoteError::Forbidden);
        }
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.restaurant_id == restaurant_id)
            .filter(|b| filters.status.map_or(true, |s| b.status == s))
            .filter(|b| filters.from_date.map_or(true, |d| b.booking_date >= d))
            .filter(|b| filters.to_date.map_or(true, |d| b.booking_date <= d))
            .cloned()
            .collect())
    }

    async fn my_bookings(&self, session: &Session) -> Result<Vec<BookingRecord>, RemoteError> {
        signed_in(session)?;
        Ok(self.bookings.lock().unwrap().iter().filter(|b| b.user_id == 1).cloned().collect())
    }

    async fn create_booking(
        &self,
        session: &Session,
        idempotency_key: &str,
        payload: &CreateBookingRequest,
    ) -> Result<BookingRecord, RemoteError> {
        self.create_calls.lock().unwrap().push(idempotency_key.to_string());
        signed_in(session)?;
        if let Some(e) = self.fail_create_with.lock().unwrap().take() {
            return Err(e);
        }
        let mut bookings = self.bookings.lock().unwrap();
        let created = BookingRecord {
            id: bookings.len() as i64 + 100,
            booking_username: payload.booking_username.clone(),
            email: payload.email.clone(),
            phone_number: payload.phone_number.clone(),
            event_type: payload.event_type.clone(),
            number_of_guests: payload.number_of_guests,
            additional_information: payload.additional_information.clone(),
            user_id: 1,
            restaurant_id: payload.restaurant_id,
            booking_date: payload.booking_date,
            status: BookingStatus::Pending,
        };
        bookings.push(created.clone());
        Ok(created)
    }

    async fn confirm_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError> {
        self.transition(session, booking_id, BookingStatus::Confirmed)
    }

    async fn reject_booking(&self, session: &Session, booking_id: i64) -> Result<BookingRecord, RemoteError> {
        self.transition(session, booking_id, BookingStatus::Rejected)
    }

    async fn reviews(&self, restaurant_id: i64) -> Result<Vec<Review>, RemoteError> {
        Ok(self.reviews.lock().unwrap().iter().filter(|r| r.restaurant_id == restaurant_id).cloned().collect())
    }

    async fn create_review(&self, restaurant_id: i64, review: &CreateReviewRequest) -> Result<Review, RemoteError> {
        let mut reviews = self.reviews.lock().unwrap();
        let created = Review {
            id: reviews.len() as i64 + 1,
            username: review.username.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            restaurant_id,
            reply: None,
        };
        reviews.push(created.clone());
        Ok(created)
    }

    async fn reply_review(
        &self,
        session: &Session,
        review_id: i64,
        reply: &ReplyReviewRequest,
    ) -> Result<Review, RemoteError> {
        staff_only(session)?;
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews.iter_mut().find(|r| r.id == review_id).ok_or(RemoteError::NotFound)?;
        review.reply = Some(reply.reply.clone());
        Ok(review.clone())
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, RemoteError> {
        match (credentials.phone.as_str(), credentials.password.as_str()) {
            ("+100000", "secret") => Ok(LoginResponse {
                access_token: "admin-token".to_string(),
                role: Role::Admin,
            }),
            _ => Err(RemoteError::Unauthorized),
        }
    }

    async fn complete_listing(
        &self,
        idempotency_key: &str,
        listing: &PaidListingRequest,
    ) -> Result<Restaurant, RemoteError> {
        let mut calls = self.listing_calls.lock().unwrap();
        calls.push(idempotency_key.to_string());
        let mut restaurant = fixtures::restaurant(calls.len() as i64 + 500, listing.capacity);
        restaurant.name = listing.name.clone();
        Ok(restaurant)
    }
}

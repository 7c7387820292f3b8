use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// whether a booking in this status takes seats away from the venue on its day
    pub fn consumes_capacity(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Booking as consumed by the availability calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Booking {
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub guest_count: u32,
    pub status: BookingStatus,
}

/// Booking row as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BookingRecord {
    pub id: i64,
    pub booking_username: String,
    pub email: String,
    pub phone_number: String,
    pub event_type: String,
    pub number_of_guests: u32,
    pub additional_information: Option<String>,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub booking_date: NaiveDate,
    pub status: BookingStatus,
}

impl From<&BookingRecord> for Booking {
    fn from(record: &BookingRecord) -> Self {
        Self {
            restaurant_id: record.restaurant_id,
            date: record.booking_date,
            guest_count: record.number_of_guests,
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CreateBookingRequest {
    pub restaurant_id: i64,
    pub booking_date: NaiveDate,
    pub booking_username: String,
    pub email: String,
    pub phone_number: String,
    pub event_type: String,
    pub number_of_guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.number_of_guests == 0 {
            return Err("number_of_guests must be at least 1".to_string());
        }
        if self.booking_username.trim().chars().count() < 2 {
            return Err("booking_username must be at least 2 characters".to_string());
        }
        if !self.email.contains('@') {
            return Err("email is not valid".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BookingFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostBookingsResponse {
    pub result_code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingRecord>,
}

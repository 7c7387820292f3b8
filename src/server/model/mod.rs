use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::server::availability::{Availability, DayAvailability};
use crate::server::model::booking::Booking;

pub(crate) mod auth;
pub(crate) mod booking;
pub(crate) mod config;
pub(crate) mod listing;
pub(crate) mod restaurant;
pub(crate) mod review;

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub guests: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityParams {
    pub date: NaiveDate,
    pub guests: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalendarDay {
    #[serde(flatten)]
    pub day: DayAvailability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Availability>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetCalendarResponse {
    pub restaurant_id: i64,
    pub capacity: i32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetAvailabilityResponse {
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub guests: u32,
    pub classification: Availability,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostAnnotateRequest {
    pub capacity: i32,
    pub bookings: Vec<Booking>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Plain acknowledgement, as answered by the backend for deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MessageResponse {
    pub message: String,
}

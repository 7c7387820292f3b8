use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::server::model::review::Review;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RestaurantImage {
    pub id: i64,
    pub url: String,
}

/// Booking as embedded in the restaurant detail, date only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BookingSummary {
    pub id: i64,
    pub booking_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: String,
    pub capacity: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub images: Vec<RestaurantImage>,
    #[serde(default)]
    pub reviews: Option<Vec<Review>>,
    #[serde(default)]
    pub bookings: Option<Vec<BookingSummary>>,
}

/// Owner edit of a restaurant. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct RestaurantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl RestaurantUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self == &Self::default() {
            return Err("nothing to update".to_string());
        }
        if let Some(capacity) = self.capacity {
            if capacity <= 0 {
                return Err(format!("capacity must be positive, got {capacity}"));
            }
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        if self.contact_email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err("contact_email is not valid".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RestaurantQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_capacity: Option<i32>,
    /// keep only restaurants without a confirmed booking on this date
    pub available_on: Option<NaiveDate>,
}

impl RestaurantQuery {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !restaurant.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(min_capacity) = self.min_capacity {
            if restaurant.capacity < min_capacity {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                [&restaurant.name, &restaurant.description, &restaurant.location]
                    .into_iter()
                    .chain(restaurant.cuisines.iter())
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Restaurant listing submitted once the checkout provider reports a paid session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PaidListingRequest {
    pub session_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub contact_phone: String,
    pub contact_email: String,
    pub average_price: i64,
    #[serde(default)]
    pub image_urls: String, // comma separated
    #[serde(default)]
    pub opening_hours: String,
    pub user_id: Option<i64>,
}

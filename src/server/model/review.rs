use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Review {
    pub id: i64,
    pub username: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub restaurant_id: i64,
    /// the owner's answer, if any
    #[serde(default)]
    pub reply: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CreateReviewRequest {
    pub username: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err(format!("rating must be between 1 and 5, got {}", self.rating));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReplyReviewRequest {
    pub reply: String,
}

impl ReplyReviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.reply.trim().is_empty() {
            return Err("reply must not be empty".to_string());
        }
        Ok(())
    }
}

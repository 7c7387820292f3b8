use serde::{Deserialize, Serialize};
use crate::server::session::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    pub role: Role,
}

//! Caller identity carried explicitly through every backend call.

use std::future::{ready, Ready};
use std::str::FromStr;
use actix_web::dev::Payload;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{FromRequest, HttpRequest};
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub(crate) const ROLE_HEADER: &str = "X-Session-Role";

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    #[default]
    #[display("guest")]
    Guest,
    #[display("user")]
    User,
    #[display("admin")]
    Admin,
    #[display("superuser")]
    Superuser,
}

impl Role {
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Superuser)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superuser" => Ok(Self::Superuser),
            s => Err(format!("Invalid Role: {s}")),
        }
    }
}

/// Bearer token and role of the caller. Built once per request, never read from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Session {
    token: Option<String>,
    role: Role,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let Some(token) = token else {
            return Self::anonymous();
        };
        // a token without a role header belongs to a plain user
        let role = headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(Role::User);
        Self::new(token, role)
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Session::from_headers(req.headers())))
    }
}

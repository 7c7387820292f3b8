use actix_web::{error, HttpResponse};
use actix_web::http::StatusCode;
use derive_more::{Display, Error};
use serde::Serialize;
use crate::server::availability::AvailabilityError;
use crate::server::remote::RemoteError;
use crate::server::venue::VenueError;

#[derive(Debug, Display, Error)]
pub(crate) enum CustomError {
    #[display("invalid request, {message}")]
    BadRequest { message: String },
    #[display("authentication required")]
    Unauthorized,
    #[display("operation not permitted")]
    Forbidden,
    #[display("resource not found")]
    ResourceNotFound,
    #[display("{detail}")]
    Upstream { status: u16, detail: String },
    #[display("backend unavailable")]
    BackendUnavailable,
    #[display("timeout occurred")]
    Timeout,
}

impl CustomError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CustomError::BadRequest { message: message.into() }
    }

    fn result_code(&self) -> &'static str {
        match self {
            CustomError::BadRequest { .. } => "E0400",
            CustomError::Unauthorized => "E0401",
            CustomError::Forbidden => "E0403",
            CustomError::ResourceNotFound => "E0404",
            CustomError::Upstream { .. } => "E0502",
            CustomError::BackendUnavailable => "S1234",
            CustomError::Timeout => "S1504",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub result_code: Option<String>,
    pub message: String,
}

impl error::ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            CustomError::Unauthorized => StatusCode::UNAUTHORIZED,
            CustomError::Forbidden => StatusCode::FORBIDDEN,
            CustomError::ResourceNotFound => StatusCode::NOT_FOUND,
            // backend validation failures are the caller's to fix, anything else is ours
            CustomError::Upstream { status, .. } => match StatusCode::from_u16(status) {
                Ok(code) if code.is_client_error() => code,
                _ => StatusCode::BAD_GATEWAY,
            },
            CustomError::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            CustomError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            result_code: Some(self.result_code().to_string()),
            message: self.to_string(),
        })
    }
}

impl From<RemoteError> for CustomError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Unauthorized => CustomError::Unauthorized,
            RemoteError::Forbidden => CustomError::Forbidden,
            RemoteError::NotFound => CustomError::ResourceNotFound,
            RemoteError::Rejected { status, detail } => CustomError::Upstream { status, detail },
            RemoteError::Transport { source } if source.is_timeout() => CustomError::Timeout,
            RemoteError::Transport { .. } => CustomError::BackendUnavailable,
            RemoteError::Decode { source } => CustomError::Upstream {
                status: 502,
                detail: source.to_string(),
            },
        }
    }
}

impl From<AvailabilityError> for CustomError {
    fn from(e: AvailabilityError) -> Self {
        CustomError::bad_request(e.to_string())
    }
}

impl From<VenueError> for CustomError {
    fn from(e: VenueError) -> Self {
        match e {
            VenueError::Remote { source } => source.into(),
            VenueError::Availability { source: source @ AvailabilityError::InvalidRange { .. } } => source.into(),
            // capacity came from the backend, not from the caller
            VenueError::Availability { source } => CustomError::Upstream {
                status: 502,
                detail: source.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use chrono::NaiveDate;

    #[test]
    fn remote_errors_map_to_status_codes() {
        assert_eq!(CustomError::from(RemoteError::Unauthorized).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CustomError::from(RemoteError::Forbidden).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(CustomError::from(RemoteError::NotFound).status_code(), StatusCode::NOT_FOUND);
        let rejected = RemoteError::Rejected { status: 400, detail: "Restaurant already booked".to_string() };
        let error = CustomError::from(rejected);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Restaurant already booked");
        let crashed = RemoteError::Rejected { status: 500, detail: "boom".to_string() };
        assert_eq!(CustomError::from(crashed).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn venue_errors_split_caller_and_backend_faults() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let range = VenueError::from(AvailabilityError::InvalidRange { start: day, end: day });
        assert_eq!(CustomError::from(range).status_code(), StatusCode::BAD_REQUEST);
        let capacity = VenueError::from(AvailabilityError::InvalidCapacity { capacity: 0 });
        assert_eq!(CustomError::from(capacity).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn error_body_is_json() {
        let response = CustomError::bad_request("guests must be positive").error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["result_code"], "E0400");
        assert_eq!(json["message"], "invalid request, guests must be positive");
    }
}

use actix_web::{get, post, put, web, HttpRequest, HttpResponse, Responder};
use actix_web::http::StatusCode;
use log::{error, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use crate::server::controller::error::CustomError;
use crate::server::model::booking::{BookingFilters, CreateBookingRequest, PostBookingsResponse};
use crate::server::remote::{BookingBackend, IDEMPOTENCY_KEY_HEADER};
use crate::server::session::Session;
use crate::server::state::AppState;
use crate::server::submission::gate::{GateOutcome, SubmissionKey, SUBMITTED_MESSAGE};

const IDEMPOTENCY_KEY_LEN: usize = 32;

/// the caller's key when it sent one, otherwise a fresh random key
fn idempotency_key(req: &HttpRequest) -> SubmissionKey {
    req.headers()
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| SubmissionKey::Client(k.to_string()))
        .unwrap_or_else(|| {
            SubmissionKey::Generated(
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(IDEMPOTENCY_KEY_LEN)
                    .map(char::from)
                    .collect(),
            )
        })
}

#[post("/v1/bookings")]
/// submit a booking request, refused locally when the date cannot take the party
async fn post_bookings(
    body: web::Json<CreateBookingRequest>,
    req: HttpRequest,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    body.validate().map_err(CustomError::bad_request)?;
    let key = idempotency_key(&req);
    let outcome = data.gate().submit(data.backend(), &session, key, &body).await.map_err(|e| {
        error!("post_bookings failed, {}", e);
        CustomError::from(e)
    })?;

    let (status, response) = match outcome {
        GateOutcome::Submitted(booking) => (
            StatusCode::OK,
            PostBookingsResponse {
                result_code: None,
                message: SUBMITTED_MESSAGE.to_string(),
                remaining_capacity: None,
                booking: Some(booking),
            },
        ),
        GateOutcome::Replayed(booking) => (
            StatusCode::OK,
            PostBookingsResponse {
                result_code: Some("B0002".to_string()),
                message: "This booking request was already submitted.".to_string(),
                remaining_capacity: None,
                booking: Some(booking),
            },
        ),
        GateOutcome::InFlight => (
            StatusCode::CONFLICT,
            PostBookingsResponse {
                result_code: Some("B0003".to_string()),
                message: "This booking request is already being submitted.".to_string(),
                remaining_capacity: None,
                booking: None,
            },
        ),
        GateOutcome::Rejected(reason) => (
            StatusCode::CONFLICT,
            PostBookingsResponse {
                result_code: Some("B0001".to_string()),
                message: reason.message(),
                remaining_capacity: Some(reason.remaining_capacity()),
                booking: None,
            },
        ),
    };
    Ok(HttpResponse::build(status).json(response))
}

#[get("/v1/restaurant/{id}/bookings")]
/// bookings of one restaurant, for its owner or an admin
async fn get_restaurant_bookings(
    id: web::Path<i64>,
    filters: web::Query<BookingFilters>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let bookings = data
        .backend()
        .restaurant_bookings(&session, id, &filters)
        .await
        .map_err(|e| {
            warn!("get_restaurant_bookings for restaurant {} failed, {}", id, e);
            CustomError::from(e)
        })?;
    Ok(web::Json(bookings))
}

#[get("/v1/bookings/mine")]
async fn get_my_bookings(session: Session, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let bookings = data.backend().my_bookings(&session).await?;
    Ok(web::Json(bookings))
}

#[put("/v1/booking/{id}/confirm")]
async fn put_booking_confirm(
    id: web::Path<i64>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let booking = data.backend().confirm_booking(&session, id).await.map_err(|e| {
        warn!("confirm of booking {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    Ok(web::Json(booking))
}

#[put("/v1/booking/{id}/reject")]
async fn put_booking_reject(
    id: web::Path<i64>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let booking = data.backend().reject_booking(&session, id).await.map_err(|e| {
        warn!("reject of booking {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    Ok(web::Json(booking))
}

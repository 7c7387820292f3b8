use actix_web::{post, web, HttpResponse, Responder};
use actix_web::http::StatusCode;
use log::error;
use serde::Serialize;
use crate::server::controller::error::CustomError;
use crate::server::model::listing::PaidListingRequest;
use crate::server::model::restaurant::Restaurant;
use crate::server::state::AppState;
use crate::server::submission::listing::ListingOutcome;

#[derive(Debug, Serialize)]
pub(crate) struct PostListingResponse {
    pub result_code: Option<String>,
    pub restaurant: Option<Restaurant>,
}

#[post("/v1/listings/complete")]
/// create the paid restaurant listing, at most once per checkout session
async fn post_listing_complete(
    body: web::Json<PaidListingRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if body.session_id.trim().is_empty() {
        return Err(CustomError::bad_request("session_id is required"));
    }
    let outcome = data.listings().complete(data.backend(), &body).await.map_err(|e| {
        error!("listing completion for checkout session {} failed, {}", body.session_id, e);
        CustomError::from(e)
    })?;
    let (status, response) = match outcome {
        ListingOutcome::Created(restaurant) => (
            StatusCode::OK,
            PostListingResponse { result_code: None, restaurant: Some(restaurant) },
        ),
        ListingOutcome::AlreadyCreated(restaurant) => (
            StatusCode::OK,
            PostListingResponse { result_code: Some("L0002".to_string()), restaurant: Some(restaurant) },
        ),
        ListingOutcome::InFlight => (
            StatusCode::CONFLICT,
            PostListingResponse { result_code: Some("L0003".to_string()), restaurant: None },
        ),
    };
    Ok(HttpResponse::build(status).json(response))
}

use actix_web::{get, post, web, Responder};
use log::warn;
use crate::server::controller::error::CustomError;
use crate::server::model::review::{CreateReviewRequest, ReplyReviewRequest};
use crate::server::remote::BookingBackend;
use crate::server::session::Session;
use crate::server::state::AppState;

#[get("/v1/restaurant/{id}/reviews")]
async fn get_reviews(id: web::Path<i64>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let reviews = data.backend().reviews(id.into_inner()).await?;
    Ok(web::Json(reviews))
}

#[post("/v1/restaurant/{id}/reviews")]
async fn post_reviews(
    id: web::Path<i64>,
    body: web::Json<CreateReviewRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    body.validate().map_err(CustomError::bad_request)?;
    let id = id.into_inner();
    let review = data.backend().create_review(id, &body).await.map_err(|e| {
        warn!("post_reviews for restaurant {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    Ok(web::Json(review))
}

#[post("/v1/review/{id}/reply")]
/// the restaurant owner answers a review
async fn post_review_reply(
    id: web::Path<i64>,
    body: web::Json<ReplyReviewRequest>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    body.validate().map_err(CustomError::bad_request)?;
    let id = id.into_inner();
    let review = data.backend().reply_review(&session, id, &body).await.map_err(|e| {
        warn!("reply to review {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    Ok(web::Json(review))
}

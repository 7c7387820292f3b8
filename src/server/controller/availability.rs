use actix_web::{post, web, Responder};
use crate::server::availability::annotate;
use crate::server::controller::check_range;
use crate::server::controller::error::CustomError;
use crate::server::model::PostAnnotateRequest;

#[post("/v1/availability/annotate")]
/// annotate caller supplied bookings, no backend involved
async fn post_annotate(body: web::Json<PostAnnotateRequest>) -> Result<impl Responder, CustomError> {
    let PostAnnotateRequest { capacity, bookings, start, end } = body.into_inner();
    check_range(start, end)?;
    let days = annotate(capacity, &bookings, start, end)?;
    Ok(web::Json(days))
}

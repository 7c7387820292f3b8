use actix_web::{post, web, Responder};
use log::info;
use crate::server::controller::error::CustomError;
use crate::server::model::auth::LoginRequest;
use crate::server::remote::BookingBackend;
use crate::server::state::AppState;

#[post("/v1/auth/login")]
/// exchange phone and password for a bearer token and role
async fn post_login(body: web::Json<LoginRequest>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let login = data.backend().login(&body).await?;
    info!("login succeeded with role={}", login.role);
    Ok(web::Json(login))
}

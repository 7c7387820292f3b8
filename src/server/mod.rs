//! main file for the server

pub(crate) mod availability;
mod controller;
pub mod model;
mod remote;
mod session;
mod state;
mod submission;
mod util;
mod venue;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use crate::server::model::config::ServerConfig;
use crate::server::state::{connect_util, AppState};

/// Run the server
pub(crate) async fn run(ServerConfig { addr, backend_url, calendar_window_days, backend_timeout }: ServerConfig) -> std::io::Result<()> {
    let backend = connect_util::connect(&backend_url, backend_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    info!("forwarding to backend at {}", backend_url);
    let state = web::Data::new(AppState::new(backend, calendar_window_days));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controller::routes)
    })
        .bind(addr)?
        .run()
        .await
}

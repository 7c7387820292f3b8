use std::time::Duration;
#[cfg(not(test))]
use crate::server::remote::api::RemoteApi;
#[cfg(test)]
use crate::server::remote::mock::MockBackend;
use crate::server::remote::RemoteError;
use crate::server::submission::gate::BookingGate;
use crate::server::submission::listing::ListingCompletion;

#[cfg(not(test))]
pub(crate) type Backend = RemoteApi;
#[cfg(test)]
pub(crate) type Backend = MockBackend;

pub(crate) mod connect_util {
    use super::*;

    #[cfg(not(test))]
    pub fn connect(base_url: &str, timeout: Duration) -> Result<Backend, RemoteError> {
        RemoteApi::new(base_url, timeout)
    }

    #[cfg(test)]
    pub fn connect(_: &str, _: Duration) -> Result<Backend, RemoteError> {
        Ok(MockBackend::new())
    }
}

/// Shared by every worker. Handlers receive it as `web::Data<AppState>`.
pub(crate) struct AppState {
    backend: Backend,
    gate: BookingGate,
    listings: ListingCompletion,
    calendar_window_days: u32,
}

impl AppState {
    pub fn new(backend: Backend, calendar_window_days: u32) -> Self {
        Self {
            backend,
            gate: BookingGate::new(),
            listings: ListingCompletion::new(),
            calendar_window_days,
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn gate(&self) -> &BookingGate {
        &self.gate
    }

    pub fn listings(&self) -> &ListingCompletion {
        &self.listings
    }

    pub fn calendar_window_days(&self) -> u32 {
        self.calendar_window_days
    }
}

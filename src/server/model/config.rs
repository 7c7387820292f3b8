use std::net::SocketAddrV4;
use std::time::Duration;

/// Server configs
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub addr: SocketAddrV4,
    /// base url of the remote REST API owning restaurants and bookings
    pub backend_url: String,
    /// days after today covered by a calendar when no range is requested
    pub calendar_window_days: u32,
    pub backend_timeout: Duration,
}

impl ServerConfig {
    pub fn new(addr: SocketAddrV4, backend_url: String, calendar_window_days: u32, backend_timeout: Duration) -> Self {
        Self {
            addr,
            backend_url,
            calendar_window_days,
            backend_timeout,
        }
    }
}

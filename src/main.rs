//! application entry point

use crate::server::model::config::ServerConfig;
use log::info;
use std::env;
use std::net::SocketAddrV4;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use derive_more::Display;

mod server;

const DOTENV_LOADING_FAILED_MSG: &str = "failed to load envs from dotenv files, aborting";
const HOST_PARSING_FAILED_MSG: &str = "failed to parse HOST, aborting";
const DEFAULT_HOST_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
const DEFAULT_CALENDAR_WINDOW_DAYS: u32 = 10;
const DEFAULT_BACKEND_TIMEOUT_SECONDS: u64 = 10;

#[actix_web::main()]
async fn main() -> std::io::Result<()> {
    // bootstrap
    // a. env
    let env = env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Env::Dev); // default dev env if absent

    match env {
        Env::Prod | Env::Stg => {} // load in CI
        Env::Dev => dotenvy::from_path(Path::new(".env.dev"))
            .expect(DOTENV_LOADING_FAILED_MSG),
    };

    // b. logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // c. run app
    let config = ServerConfig::new(
        SocketAddrV4::from_str(
            env::var("HOST")
                .unwrap_or(DEFAULT_HOST_ADDR.to_string())
                .as_str(),
        )
        .expect(HOST_PARSING_FAILED_MSG),
        env::var("BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL.to_string()),
        parse_var("CALENDAR_WINDOW_DAYS", DEFAULT_CALENDAR_WINDOW_DAYS),
        Duration::from_secs(parse_var("BACKEND_TIMEOUT_SECONDS", DEFAULT_BACKEND_TIMEOUT_SECONDS)),
    );

    info!("App is starting in env={}", env);

    server::run(config).await
}

/// numeric env var with a default, aborting on values that do not parse
fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("failed to parse {key}={raw}, {e}, aborting")),
        Err(_) => default,
    }
}

#[derive(Debug, Display)]
#[non_exhaustive]
enum Env {
    Dev,
    Stg,
    Prod,
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            s => Err(format!("Invalid Env: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parsing() {
        assert!(matches!("dev".parse::<Env>(), Ok(Env::Dev)));
        assert!(matches!("prod".parse::<Env>(), Ok(Env::Prod)));
        assert!("qa".parse::<Env>().is_err());
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        assert_eq!(parse_var("VENUE_BOOKING_TEST_UNSET_VAR", 7_u32), 7);
    }
}

//! Request shim for DigitalOcean Functions.
//!
//! Translates the platform's `(event, context)` invocation into an
//! `http::Request`, hands it to a [`Server`], and turns the resulting
//! `http::Response` back into the `{ statusCode, headers, body }` shape the
//! platform expects.

mod body;
mod env;
mod error;
mod event;
mod request;
mod response;
#[cfg(feature = "axum")]
mod router;
mod server;
mod shim;

use std::str::FromStr;

use log::LevelFilter;
use simple_logger::SimpleLogger;

pub use body::Body;
pub use env::Environment;
pub use error::ShimError;
pub use event::{Context, Event, FunctionResponse, HttpEvent};
pub use request::{decode_body, into_request, QueryString};
pub use response::from_response;
#[cfg(feature = "axum")]
pub use router::{RouterManifest, RouterServer};
pub use server::Server;
pub use shim::Shim;

/// Variable consulted by [`init_logger`].
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Install a stdout logger; the platform collects function stdout as logs.
///
/// The level comes from `LOG_LEVEL` in `env` (default `info`).
pub fn init_logger(env: &Environment) -> Result<(), log::SetLoggerError> {
    SimpleLogger::new().with_level(log_level(env)).init()
}

fn log_level(env: &Environment) -> LevelFilter {
    env.get(LOG_LEVEL_VAR)
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

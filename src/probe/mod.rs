//! Database connectivity check.
//!
//! A check opens exactly one connection through a [`Driver`], inspects it, and
//! closes it again before reporting a [`ConnectionOutcome`]. Nothing is pooled or
//! retried; every call is independent.

pub mod error;
pub mod sql;

use async_trait::async_trait;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Config;
use crate::utils::fmt_duration;

pub use error::DriverError;
pub use sql::SqlDriver;

/// Connection parameters for the probed datastore.
#[derive(Clone, custom_debug_derive::Debug, PartialEq, Eq)]
pub struct Datasource {
    pub url: String,
    pub username: String,
    #[debug(with = "crate::fmt::redacted")]
    pub password: String,
}

impl From<&Config> for Datasource {
    fn from(config: &Config) -> Self {
        Self {
            url: config.datasource_url.clone(),
            username: config.datasource_username.clone(),
            password: config.datasource_password.clone(),
        }
    }
}

/// The capability needed from a database client: open a connection.
///
/// `Ok(None)` models a driver that hands back no connection without raising an error.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn connect(
        &self,
        datasource: &Datasource,
    ) -> Result<Option<Box<dyn Connection>>, DriverError>;
}

/// A live connection owned by a single check.
#[async_trait]
pub trait Connection: Send {
    /// Whether the connection is usable right now.
    async fn is_open(&mut self) -> bool;

    /// Release the connection. Consumes the handle so it cannot be closed twice.
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Result of one connectivity check. `Display` renders the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    Success,
    /// A connection was handed back but is missing or not open.
    Failed,
    /// The driver raised an error while connecting.
    Error(String),
}

impl fmt::Display for ConnectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionOutcome::Success => f.write_str("DB Connection: SUCCESS"),
            ConnectionOutcome::Failed => f.write_str("DB Connection: FAILED"),
            ConnectionOutcome::Error(message) => write!(f, "DB Connection: ERROR - {message}"),
        }
    }
}

/// Open, inspect and close one connection.
///
/// The connection is closed on every path after acquisition. If the returned
/// future is dropped mid-check, dropping the boxed handle releases it instead.
pub async fn check(driver: &dyn Driver, datasource: &Datasource) -> ConnectionOutcome {
    let start = Instant::now();

    let outcome = match driver.connect(datasource).await {
        Ok(Some(mut connection)) => {
            let open = connection.is_open().await;
            if let Err(e) = connection.close().await {
                warn!(error = %e, "failed to close probe connection");
            }
            if open {
                ConnectionOutcome::Success
            } else {
                ConnectionOutcome::Failed
            }
        }
        Ok(None) => ConnectionOutcome::Failed,
        Err(e) => {
            let message = e.to_string();
            if message.is_empty() {
                ConnectionOutcome::Error(format!("{e:?}"))
            } else {
                ConnectionOutcome::Error(message)
            }
        }
    };

    let elapsed = fmt_duration(start.elapsed());
    match &outcome {
        ConnectionOutcome::Success => debug!(duration = elapsed, "database reachable"),
        ConnectionOutcome::Failed => warn!(duration = elapsed, "database connection not open"),
        ConnectionOutcome::Error(message) => {
            warn!(duration = elapsed, error = %message, "database connection error")
        }
    }

    outcome
}

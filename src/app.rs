use crate::config::Config;
use crate::probe::sql::redact_url;
use crate::probe::{Datasource, Driver, SqlDriver};
use crate::services::signals::handle_shutdown_signals;
use crate::state::AppState;
use crate::web::create_router;
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Main application struct: configuration plus the state handed to every request.
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create an App backed by the sqlx driver.
    ///
    /// No connection is opened here; the datastore is only contacted per `/dbtest` request.
    pub fn new(config: Config) -> Self {
        Self::with_driver(config, Arc::new(SqlDriver::new()))
    }

    pub fn with_driver(config: Config, driver: Arc<dyn Driver>) -> Self {
        info!(
            datasource = redact_url(&config.datasource_url),
            username = %config.datasource_username,
            has_password = !config.datasource_password.is_empty(),
            "datasource configured"
        );

        let app_state = AppState::new(Datasource::from(&config), driver);
        App { config, app_state }
    }

    pub fn router(&self) -> Router {
        create_router(self.app_state.clone())
    }

    /// Bind the listener.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))
    }

    /// Run the web server until a shutdown signal arrives.
    pub async fn run(self) -> ExitCode {
        let listener = match self.bind().await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, "failed to start web server");
                return ExitCode::FAILURE;
            }
        };

        let shutdown = CancellationToken::new();
        let server = tokio::spawn(crate::services::web::serve(
            listener,
            self.router(),
            shutdown.clone(),
        ));

        handle_shutdown_signals(server, shutdown, self.config.shutdown_timeout).await
    }
}

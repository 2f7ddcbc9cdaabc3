//! Scripted in-memory drivers and request helpers shared by integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use dbprobe::app::App;
use dbprobe::config::Config;
use dbprobe::probe::{Connection, Datasource, Driver, DriverError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

/// What a [`ScriptedDriver`] does on every `connect`.
#[derive(Clone, Copy)]
pub enum Script {
    /// Hands back a connection that reports itself open.
    Open,
    /// Hands back a connection that is already closed.
    Closed,
    /// Hands back no connection at all.
    Absent,
    /// Raises a driver error with this message.
    Fail(&'static str),
    /// Hands back an open connection whose `close` fails with this message.
    CloseFails(&'static str),
}

/// Counts every connection it opens and closes.
#[derive(Clone)]
pub struct ScriptedDriver {
    script: Script,
    latency: Option<Duration>,
    inspect_latency: Option<Duration>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub live: Arc<AtomicUsize>,
}

impl ScriptedDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            latency: None,
            inspect_latency: None,
            opened: Arc::default(),
            closed: Arc::default(),
            live: Arc::default(),
        }
    }

    /// Sleep this long inside `connect` so concurrent checks overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Sleep this long inside `is_open`, while the connection is held.
    pub fn with_inspect_latency(mut self, latency: Duration) -> Self {
        self.inspect_latency = Some(latency);
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn connect(
        &self,
        _datasource: &Datasource,
    ) -> Result<Option<Box<dyn Connection>>, DriverError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let (open, close_error) = match self.script {
            Script::Open => (true, None),
            Script::Closed => (false, None),
            Script::CloseFails(message) => (true, Some(message)),
            Script::Absent => return Ok(None),
            Script::Fail(message) => return Err(DriverError::Other(message.to_owned())),
        };

        self.opened.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        let connection: Box<dyn Connection> = Box::new(ScriptedConnection {
            open,
            inspect_latency: self.inspect_latency,
            close_error,
            closed: self.closed.clone(),
            live: self.live.clone(),
        });
        Ok(Some(connection))
    }
}

/// Counts as live until dropped, whether or not `close` ran.
struct ScriptedConnection {
    open: bool,
    inspect_latency: Option<Duration>,
    close_error: Option<&'static str>,
    closed: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn is_open(&mut self) -> bool {
        if let Some(latency) = self.inspect_latency {
            tokio::time::sleep(latency).await;
        }
        self.open
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        match self.close_error {
            Some(message) => Err(DriverError::Other(message.to_owned())),
            None => Ok(()),
        }
    }
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn config(url: &str, username: &str, password: &str) -> Config {
    Config {
        datasource_url: url.to_owned(),
        datasource_username: username.to_owned(),
        datasource_password: password.to_owned(),
        port: 0,
        log_level: "debug".to_owned(),
        shutdown_timeout: Duration::from_secs(1),
    }
}

/// Router wired to a scripted driver.
pub fn scripted_router(driver: &ScriptedDriver) -> Router {
    App::with_driver(
        config("postgres://db.invalid:5432/app", "probe", "secret"),
        Arc::new(driver.clone()),
    )
    .router()
}

/// Router wired to the real sqlx driver.
pub fn sql_router(url: &str, username: &str, password: &str) -> Router {
    App::new(config(url, username, password)).router()
}

pub fn datasource() -> Datasource {
    Datasource {
        url: "postgres://db.invalid:5432/app".to_owned(),
        username: "probe".to_owned(),
        password: "secret".to_owned(),
    }
}

pub async fn get(router: &Router, path: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// GET `path`, assert the status is 200, and return the body text.
pub async fn get_text(router: &Router, path: &str) -> String {
    let response = get(router, path).await;
    assert_eq!(response.status(), StatusCode::OK, "non-200 for {path}");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

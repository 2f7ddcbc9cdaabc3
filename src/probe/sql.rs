//! Production driver backed by sqlx's `Any` connection.
//!
//! The URL scheme picks the engine (`postgres`, `mysql`, `mariadb`, `sqlite`).
//! JDBC-style `jdbc:` prefixes are stripped, and configured credentials replace
//! whatever userinfo the URL carries.

use async_trait::async_trait;
use sqlx::AnyConnection;
use sqlx::Connection as _;
use tracing::debug;
use url::Url;

use super::{Connection, Datasource, Driver, DriverError};

/// Opens a fresh, unpooled sqlx connection per check.
#[derive(Debug, Clone, Copy)]
pub struct SqlDriver;

impl SqlDriver {
    pub fn new() -> Self {
        sqlx::any::install_default_drivers();
        SqlDriver
    }
}

impl Default for SqlDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for SqlDriver {
    async fn connect(
        &self,
        datasource: &Datasource,
    ) -> Result<Option<Box<dyn Connection>>, DriverError> {
        let url = connection_url(datasource)?;
        let connection = AnyConnection::connect(&url).await?;
        debug!(backend = connection.backend_name(), "probe connection opened");
        let connection: Box<dyn Connection> = Box::new(SqlConnection(connection));
        Ok(Some(connection))
    }
}

struct SqlConnection(AnyConnection);

#[async_trait]
impl Connection for SqlConnection {
    async fn is_open(&mut self) -> bool {
        self.0.ping().await.is_ok()
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.0.close().await?;
        Ok(())
    }
}

fn strip_jdbc(raw: &str) -> &str {
    raw.strip_prefix("jdbc:").unwrap_or(raw)
}

/// Build the URL handed to sqlx, with credentials merged in.
pub fn connection_url(datasource: &Datasource) -> Result<String, DriverError> {
    let raw = strip_jdbc(datasource.url.trim());
    if datasource.username.is_empty() && datasource.password.is_empty() {
        return Ok(raw.to_owned());
    }

    let mut url = Url::parse(raw)?;
    let accepted = (datasource.username.is_empty()
        || url.set_username(&datasource.username).is_ok())
        && (datasource.password.is_empty()
            || url.set_password(Some(&datasource.password)).is_ok());

    if !accepted {
        // e.g. `sqlite::memory:` or `sqlite:///path` have no authority to carry userinfo
        debug!(
            scheme = url.scheme(),
            "datasource URL cannot carry credentials, ignoring them"
        );
        return Ok(raw.to_owned());
    }

    Ok(url.into())
}

/// Query parameters that carry secrets in postgres, mysql and JDBC URLs. Compared case-insensitively.
const SECRET_QUERY_KEYS: &[&str] = &[
    "password",
    "pass",
    "passwd",
    "pwd",
    "sslpassword",
    "secret",
    "token",
];

fn is_secret_key(key: &str) -> bool {
    SECRET_QUERY_KEYS
        .iter()
        .any(|secret| key.eq_ignore_ascii_case(secret))
}

/// Render a URL for logging with passwords masked, both in userinfo and in the query.
pub fn redact_url(raw: &str) -> String {
    let raw = strip_jdbc(raw.trim());
    let Ok(mut url) = Url::parse(raw) else {
        return "<unparseable url>".to_owned();
    };

    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }

    if url.query_pairs().any(|(key, _)| is_secret_key(&key)) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if is_secret_key(&key) {
                    "***".to_owned()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.into()
}

//! Application state shared by every request handler.

use std::sync::Arc;

use crate::probe::{Datasource, Driver};

/// Read-only after startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub datasource: Arc<Datasource>,
    pub driver: Arc<dyn Driver>,
}

impl AppState {
    pub fn new(datasource: Datasource, driver: Arc<dyn Driver>) -> Self {
        Self {
            datasource: Arc::new(datasource),
            driver,
        }
    }
}

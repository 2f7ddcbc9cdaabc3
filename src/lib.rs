//! HTTP liveness and database connectivity probe.

pub mod app;
pub mod cli;
pub mod config;
pub mod fmt;
pub mod logging;
pub mod probe;
pub mod services;
pub mod state;
pub mod utils;
pub mod web;

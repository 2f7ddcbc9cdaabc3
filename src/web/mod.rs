//! HTTP surface: route table, handlers and middleware.

pub mod middleware;
pub mod routes;
pub mod status;

pub use routes::*;

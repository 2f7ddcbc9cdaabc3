pub mod signals;
pub mod web;

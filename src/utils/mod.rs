//! Shared helpers: logging, timestamps, minification.

pub mod date;
pub mod log;
pub mod minify;

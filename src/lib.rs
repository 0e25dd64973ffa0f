//! xreq - a thin HTTP request client
//!
//! This crate wraps reqwest with a fixed set of browser-like default headers,
//! GET/POST selection from the presence of a body, and a single cookie value
//! carried from call to call.

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod http;
pub mod logging;
pub mod utils;

pub use config::ClientConfig;
pub use error::{Result, XreqError};
pub use http::request::{FilePart, RequestData, RequestOptions};
pub use http::RequestClient;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

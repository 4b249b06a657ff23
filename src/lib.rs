//! authkeys - reconcile SSH authorized_keys files against a desired state
//!
//! This library parses authorized_keys content into an ordered model,
//! applies add/remove requests keyed by key material, and writes the result
//! back atomically while keeping lines it does not understand verbatim.

pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod reconcile;
pub mod store;

pub use error::{Error, Result};

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const NAME: &str = env!("CARGO_PKG_NAME");

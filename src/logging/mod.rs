//! Logging module for authkeys
//!
//! Diagnostics go to stderr through tracing-subscriber so that command
//! results on stdout stay machine readable. `RUST_LOG` overrides the level
//! chosen from the verbose/quiet flags.

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbosity level adjustment: -1 for quiet, 0 for normal, +1 for verbose
    pub verbosity: i8,
}

impl LogConfig {
    /// Create a new log configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode (+1 verbosity)
    pub fn verbose(mut self) -> Self {
        self.verbosity = 1;
        self
    }

    /// Set quiet mode (-1 verbosity)
    pub fn quiet(mut self) -> Self {
        self.verbosity = -1;
        self
    }

    /// Get the minimum log level based on verbosity
    fn min_level(&self) -> Level {
        match self.verbosity {
            v if v < 0 => Level::WARN,
            0 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

/// Initialize the logging subsystem from the global CLI flags
pub fn init(verbose: bool, quiet: bool) {
    let config = if quiet {
        LogConfig::new().quiet()
    } else if verbose {
        LogConfig::new().verbose()
    } else {
        LogConfig::new()
    };
    init_with_config(&config);
}

/// Initialize logging with full configuration
pub fn init_with_config(config: &LogConfig) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.min_level().into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
}

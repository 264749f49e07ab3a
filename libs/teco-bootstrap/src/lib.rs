//! Bootstrap for the teco server host process
//!
//! - [`config`]: layered application configuration and typed module sections
//! - [`host`]: logging initialization and signal handling

pub mod config;
pub mod host;

pub use config::{
    AppConfig, CliArgs, ConfigError, LogFormat, LoggingConfig, ServerConfig,
    module_config_or_default,
};
pub use host::{LoggingGuard, init_logging, wait_for_shutdown};

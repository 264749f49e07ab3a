//! Host process bootstrap: logging and signal handling.

pub mod logging;
pub mod signals;

pub use logging::{LoggingGuard, init_logging};
pub use signals::{ShutdownSignal, wait_for_shutdown};

//! Utility modules for tlog2ninja

pub mod logging;

pub use logging::{init_logging, LoggingConfig};

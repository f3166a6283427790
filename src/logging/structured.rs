//! Structured logging utilities.
//!
//! Provides context-aware logging with analysis_id and vehicle_id included
//! in every log message.

use std::fmt;

/// Initialize the process logger.
///
/// Safe to call repeatedly; only the first call installs the logger.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Logging context for one forensic analysis.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub analysis_id: String,
    pub vehicle_id: Option<String>,
}

impl LogContext {
    pub fn new(analysis_id: &str) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            vehicle_id: None,
        }
    }

    pub fn with_vehicle(&self, vehicle_id: &str) -> Self {
        Self {
            analysis_id: self.analysis_id.clone(),
            vehicle_id: Some(vehicle_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vehicle_id {
            Some(vid) => write!(f, "[analysis={}] [vehicle={}]", self.analysis_id, vid),
            None => write!(f, "[analysis={}]", self.analysis_id),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}

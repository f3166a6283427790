//! Structured logging with analysis context.
//!
//! Every log line emitted during an analysis carries the analysis id and
//! vehicle id so a risk reviewer can follow one run through the logs.

pub mod structured;

pub use structured::*;

//! Booking extraction module.
//!
//! Tolerant decoding of booking rows handed over by the host application.

pub mod booking;
pub mod json_path;

pub use booking::*;
pub use json_path::*;

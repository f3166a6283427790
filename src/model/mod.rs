//! Data model.
//!
//! Booking records consumed from the booking subsystem and the forensic
//! structures produced for claims, underwriting and the host UI.

pub mod analysis;
pub mod booking;

pub use analysis::*;
pub use booking::*;

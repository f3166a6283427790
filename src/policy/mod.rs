//! Severity policy module.
//!
//! Decides how much off-platform mileage a vehicle may accrue between
//! bookings for its declared primary use:
//! - Primary-use categories and label parsing
//! - Severity tiers and the `SeverityPolicy` seam
//! - Usage-rules table with a process-wide cache

pub mod rules;
pub mod severity;
pub mod usage;

pub use rules::*;
pub use severity::*;
pub use usage::*;

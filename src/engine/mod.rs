//! Forensics engine.
//!
//! Reconstructs a vehicle's mileage timeline across bookings:
//! - Gap extraction between consecutive bookings and up to "now"
//! - Anomaly detection (reversals, impossible speed, pattern shifts)
//! - Aggregate risk scoring
//! - Analysis orchestration

pub mod analyzer;
pub mod anomalies;
pub mod config;
pub mod context;
pub mod gaps;
pub mod scoring;

pub use analyzer::*;
pub use anomalies::*;
pub use config::*;
pub use context::*;
pub use gaps::*;
pub use scoring::*;

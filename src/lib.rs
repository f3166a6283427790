//! Mileage Forensics - odometer gap and fraud analysis for rental bookings
//!
//! This crate reconstructs a vehicle's mileage timeline across completed
//! rental bookings, flags unexplained odometer gaps, detects physically
//! implausible or fraudulent mileage patterns, and produces the risk level
//! used to gate insurance coverage. With the `python` feature it is exposed
//! to the booking application via PyO3.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `engine` - Gap extraction, anomaly detection, risk scoring, orchestration
//! - `policy` - Primary-use categories and injectable severity thresholds
//! - `model` - Booking input records and forensic output structures
//! - `report` - Recommendations and the plain-text audit report
//! - `extraction` - Tolerant decoding of booking rows from host JSON
//! - `logging` - Structured logging with analysis context
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use mileage_forensics::engine::{analyze_mileage, AnalysisContext, ForensicsConfig};
//! use mileage_forensics::model::RiskLevel;
//! use mileage_forensics::policy::{PrimaryUse, UsageRulesTable};
//!
//! let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
//! let ctx = AnalysisContext::new(12_000.0, PrimaryUse::Rental, now);
//! let analysis = analyze_mileage(&[], &ctx, &UsageRulesTable::new(), &ForensicsConfig::default())?;
//!
//! assert_eq!(analysis.risk_level, RiskLevel::Low);
//! assert_eq!(analysis.compliance_rate, 100.0);
//! # Ok::<(), mileage_forensics::error::ForensicsError>(())
//! ```

pub mod engine;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod model;
pub mod policy;
pub mod report;

#[cfg(feature = "python")]
mod python;

pub use engine::{analyze_mileage, AnalysisContext, ForensicsConfig};
pub use error::{ForensicsError, Result};
pub use model::{BookingMileageRecord, ForensicAnalysis};
pub use policy::{PrimaryUse, SeverityPolicy, SeverityTier};

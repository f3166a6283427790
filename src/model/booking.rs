//! Booking mileage records as produced by the booking subsystem.
//!
//! These are read-only to the engine. Only completed bookings with a
//! recorded end odometer take part in the analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status string that marks a finished trip.
pub const COMPLETED_STATUS: &str = "completed";

/// One rental booking with its odometer readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingMileageRecord {
    pub id: String,
    pub booking_code: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub start_odometer: Option<f64>,
    pub end_odometer: Option<f64>,
    pub status: String,
}

impl BookingMileageRecord {
    pub fn is_completed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(COMPLETED_STATUS)
    }

    /// Start reading, ignoring non-finite values.
    pub fn start_reading(&self) -> Option<f64> {
        self.start_odometer.filter(|v| v.is_finite())
    }

    /// End reading, ignoring non-finite values.
    pub fn end_reading(&self) -> Option<f64> {
        self.end_odometer.filter(|v| v.is_finite())
    }

    /// Completed and carrying a usable end odometer.
    pub fn qualifies(&self) -> bool {
        self.is_completed() && self.end_reading().is_some()
    }

    /// Miles driven during the booking, when both readings exist.
    pub fn rental_miles(&self) -> Option<f64> {
        Some(self.end_reading()? - self.start_reading()?)
    }
}

//! Engine tuning knobs.
//!
//! Gap thresholds live in the usage-rules table; this covers the rest.
//! Loaded from a JSON document in the host app; any omitted field takes its
//! default.

use serde::{Deserialize, Serialize};

use crate::error::{ForensicsError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForensicsConfig {
    /// Gap speed above which a gap is physically implausible.
    pub max_plausible_miles_per_day: f64,
    /// Rental-only vehicles averaging more than this per gap get a
    /// re-declaration suggestion.
    pub rental_average_gap_threshold: f64,
    /// Recent/historical mean ratio that counts as a usage-pattern shift.
    pub pattern_shift_ratio: f64,
    pub min_historical_samples: usize,
    pub min_recent_samples: usize,
    /// Run the pattern check over the analysed gaps themselves.
    pub detect_pattern_shift: bool,
    /// Number of trailing gaps treated as "recent" by that check.
    pub recent_gap_window: usize,
    /// Force odometer rollbacks between bookings to VIOLATION.
    pub escalate_negative_gaps: bool,
    /// Compliance below this (percent) triggers the trip-logging advice.
    pub min_compliance_rate: f64,
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            max_plausible_miles_per_day: 600.0,
            rental_average_gap_threshold: 30.0,
            pattern_shift_ratio: 3.0,
            min_historical_samples: 5,
            min_recent_samples: 3,
            detect_pattern_shift: false,
            recent_gap_window: 3,
            escalate_negative_gaps: true,
            min_compliance_rate: 80.0,
        }
    }
}

impl ForensicsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ForensicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("maxPlausibleMilesPerDay", self.max_plausible_miles_per_day),
            ("patternShiftRatio", self.pattern_shift_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ForensicsError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.rental_average_gap_threshold.is_finite() || self.rental_average_gap_threshold < 0.0 {
            return Err(ForensicsError::InvalidConfig(format!(
                "rentalAverageGapThreshold must be non-negative, got {}",
                self.rental_average_gap_threshold
            )));
        }

        if !(0.0..=100.0).contains(&self.min_compliance_rate) {
            return Err(ForensicsError::InvalidConfig(format!(
                "minComplianceRate must be within 0..=100, got {}",
                self.min_compliance_rate
            )));
        }

        if self.min_historical_samples == 0 || self.min_recent_samples == 0 {
            return Err(ForensicsError::InvalidConfig(
                "pattern sample floors must be at least 1".to_string(),
            ));
        }

        if self.detect_pattern_shift && self.recent_gap_window < self.min_recent_samples {
            return Err(ForensicsError::InvalidConfig(format!(
                "recentGapWindow ({}) is smaller than minRecentSamples ({})",
                self.recent_gap_window, self.min_recent_samples
            )));
        }

        Ok(())
    }
}

//! Derived forensic structures.
//!
//! Everything here is rebuilt on every analysis and never persisted by the
//! engine. Field names and the tier vocabularies are keyed off by claims,
//! underwriting and the host compliance UI, so the serialized form is fixed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::policy::SeverityTier;

/// Unexplained mileage between one booking and the next (or "now").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageGap {
    /// Booking the gap starts after.
    pub booking_id: String,
    pub booking_code: String,
    pub end_odometer: f64,
    pub end_date: DateTime<Utc>,
    pub next_start_odometer: f64,
    pub next_start_date: DateTime<Utc>,
    pub gap_miles: f64,
    pub gap_days: i64,
    pub severity: SeverityTier,
    pub flagged: bool,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    /// Odometer went backwards within one booking.
    Reverse,
    /// Negative gap: the next reading is lower than the previous booking's
    /// end reading, so the odometer went backwards between two bookings.
    ///
    /// The wire name is kept from the booking app's vocabulary. Oversized
    /// positive gaps are never reported here; they surface through the gap
    /// severity tiers and `ImpossibleSpeed`.
    ExcessiveGap,
    ImpossibleSpeed,
    PatternChange,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::Reverse => "REVERSE",
            AnomalyType::ExcessiveGap => "EXCESSIVE_GAP",
            AnomalyType::ImpossibleSpeed => "IMPOSSIBLE_SPEED",
            AnomalyType::PatternChange => "PATTERN_CHANGE",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly severity. Independent of gap `SeverityTier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Low => "low",
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
            AnomalySeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageAnomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: AnomalySeverity,
    pub description: String,
    pub reported_mileage: f64,
    pub expected_mileage: f64,
    pub booking_id: Option<String>,
    pub requires_investigation: bool,
}

/// Overall categorical risk of a vehicle's mileage history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's only output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForensicAnalysis {
    pub gaps: Vec<MileageGap>,
    pub anomalies: Vec<MileageAnomaly>,
    pub total_odometer: f64,
    pub total_rental_mileage: f64,
    pub unaccounted_mileage: f64,
    pub average_gap_size: f64,
    pub max_gap: f64,
    pub compliance_rate: f64,
    pub risk_level: RiskLevel,
    pub insurance_impact: String,
    pub recommendations: Vec<String>,
}

impl ForensicAnalysis {
    pub fn flagged_gap_count(&self) -> usize {
        self.gaps.iter().filter(|g| g.flagged).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Hex SHA-256 of the JSON form, recorded in audit trails.
    ///
    /// Identical inputs produce identical fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

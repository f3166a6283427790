//! Aggregate risk scoring.
//!
//! Pure reduction of gaps and anomalies into summary statistics and a
//! categorical risk level.

use crate::model::{AnomalySeverity, MileageAnomaly, MileageGap, RiskLevel};
use crate::policy::SeverityTier;

/// CRITICAL gaps tolerated before the vehicle is HIGH risk.
const MAX_CRITICAL_GAPS: usize = 2;
/// WARNING gaps tolerated before the vehicle is MEDIUM risk.
const MAX_WARNING_GAPS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateScore {
    pub unaccounted_mileage: f64,
    pub average_gap_size: f64,
    pub max_gap: f64,
    pub compliance_rate: f64,
    pub flagged_gaps: usize,
    pub risk_level: RiskLevel,
}

pub fn score(gaps: &[MileageGap], anomalies: &[MileageAnomaly]) -> AggregateScore {
    let total = gaps.len();
    let flagged = gaps.iter().filter(|g| g.flagged).count();
    let unaccounted: f64 = gaps.iter().map(|g| g.gap_miles).sum();

    let (average, max) = if total == 0 {
        (0.0, 0.0)
    } else {
        let max = gaps
            .iter()
            .map(|g| g.gap_miles)
            .fold(f64::NEG_INFINITY, f64::max);
        (unaccounted / total as f64, max)
    };

    AggregateScore {
        unaccounted_mileage: unaccounted,
        average_gap_size: average,
        max_gap: max,
        compliance_rate: compliance_rate(total, flagged),
        flagged_gaps: flagged,
        risk_level: risk_level(gaps, anomalies),
    }
}

/// Percentage of gaps within tolerance; 100 when there are none.
pub fn compliance_rate(total_gaps: usize, flagged_gaps: usize) -> f64 {
    if total_gaps == 0 {
        return 100.0;
    }
    100.0 * (total_gaps - flagged_gaps) as f64 / total_gaps as f64
}

/// First matching rule wins, checked from most to least severe.
pub fn risk_level(gaps: &[MileageGap], anomalies: &[MileageAnomaly]) -> RiskLevel {
    let count = |tier: SeverityTier| gaps.iter().filter(|g| g.severity == tier).count();

    if anomalies
        .iter()
        .any(|a| a.severity == AnomalySeverity::Critical)
    {
        RiskLevel::Critical
    } else if count(SeverityTier::Violation) > 0 || count(SeverityTier::Critical) > MAX_CRITICAL_GAPS {
        RiskLevel::High
    } else if count(SeverityTier::Warning) > MAX_WARNING_GAPS {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Insurance narrative for a risk level.
pub fn insurance_impact(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => {
            "Critical: insurance coverage may be denied for claims until the mileage history is investigated and resolved."
        }
        RiskLevel::High => {
            "High: claims will face additional scrutiny and may require proof of every unexplained mileage gap."
        }
        RiskLevel::Medium => {
            "Medium: minor impact on coverage; maintain documentation for off-platform trips."
        }
        RiskLevel::Low => "Low: no impact on insurance coverage.",
    }
}

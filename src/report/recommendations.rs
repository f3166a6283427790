//! Advisory recommendations.
//!
//! Each heuristic is checked independently; every one that applies adds its
//! advice, in a fixed order.

use crate::engine::config::ForensicsConfig;
use crate::engine::scoring::AggregateScore;
use crate::model::MileageAnomaly;
use crate::policy::PrimaryUse;

/// Flagged gaps tolerated before every gap must be documented.
const MAX_UNDOCUMENTED_FLAGGED_GAPS: usize = 3;

pub const REDECLARE_USE: &str = "Average mileage between rentals is high for a rental-only vehicle; consider declaring personal or mixed use to match how the vehicle is driven.";
pub const REMEDIATE_ANOMALIES: &str = "Mileage anomalies were detected; investigate and correct the affected odometer records immediately.";
pub const DOCUMENT_GAPS: &str = "Several mileage gaps are out of tolerance; document the cause of every gap between rentals.";
pub const IMPROVE_LOGGING: &str = "Compliance is below target; record start and end odometer readings for every trip.";
pub const ALL_CLEAR: &str = "Mileage history is fully compliant; keep recording odometer readings for every trip.";

pub fn generate_recommendations(
    primary_use: PrimaryUse,
    score: &AggregateScore,
    anomalies: &[MileageAnomaly],
    config: &ForensicsConfig,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if primary_use.is_rental_only() && score.average_gap_size > config.rental_average_gap_threshold {
        recommendations.push(REDECLARE_USE.to_string());
    }

    if !anomalies.is_empty() {
        recommendations.push(REMEDIATE_ANOMALIES.to_string());
    }

    if score.flagged_gaps > MAX_UNDOCUMENTED_FLAGGED_GAPS {
        recommendations.push(DOCUMENT_GAPS.to_string());
    }

    if score.compliance_rate < config.min_compliance_rate {
        recommendations.push(IMPROVE_LOGGING.to_string());
    }

    if recommendations.is_empty() && score.compliance_rate >= 100.0 {
        recommendations.push(ALL_CLEAR.to_string());
    }

    recommendations
}

//! Forensic analysis entry point.
//!
//! Coordinates one analysis run:
//! 1. Precondition checks on caller inputs
//! 2. Booking qualification and ordering
//! 3. Gap extraction (severity from the injected policy)
//! 4. Anomaly detection
//! 5. Aggregate scoring and insurance impact
//! 6. Recommendations
//!
//! The run reads nothing but its arguments, so concurrent calls need no
//! locking and identical inputs give identical output.

use crate::error::{ForensicsError, Result};
use crate::model::{BookingMileageRecord, ForensicAnalysis};
use crate::policy::SeverityPolicy;
use crate::report::recommendations::generate_recommendations;

use super::anomalies::detect_anomalies;
use super::config::ForensicsConfig;
use super::context::AnalysisContext;
use super::gaps::{extract_gaps, qualifying_bookings};
use super::scoring::{insurance_impact, score};

/// Analyze one vehicle's mileage history.
///
/// Bookings may arrive in any order. Records that cannot take part (not
/// completed, missing readings) are excluded rather than failing the run.
pub fn analyze_mileage(
    bookings: &[BookingMileageRecord],
    ctx: &AnalysisContext,
    policy: &dyn SeverityPolicy,
    config: &ForensicsConfig,
) -> Result<ForensicAnalysis> {
    let log_ctx = ctx.log_context();

    // [1] PRECONDITIONS
    if !ctx.current_odometer.is_finite() || ctx.current_odometer < 0.0 {
        return Err(ForensicsError::InvalidInput(format!(
            "current odometer must be a non-negative number, got {}",
            ctx.current_odometer
        )));
    }
    config.validate()?;

    log::debug!(
        "{} ANALYSIS_START bookings={} primary_use={} current_odometer={}",
        log_ctx,
        bookings.len(),
        ctx.primary_use,
        ctx.current_odometer
    );

    // [2] QUALIFY & SORT
    let qualifying = qualifying_bookings(bookings, &log_ctx);

    // [3] GAPS
    let extraction = extract_gaps(&qualifying, ctx, policy, config);

    // [4] ANOMALIES
    let anomalies = detect_anomalies(&qualifying, &extraction.gaps, config, &log_ctx);

    let gaps: Vec<_> = extraction.gaps.into_iter().map(|e| e.gap).collect();

    // [5] AGGREGATE
    let aggregate = score(&gaps, &anomalies);

    // [6] RECOMMENDATIONS
    let recommendations = generate_recommendations(ctx.primary_use, &aggregate, &anomalies, config);

    log::info!(
        "{} ANALYSIS_COMPLETE qualifying={} gaps={} flagged={} anomalies={} compliance={:.1} risk={}",
        log_ctx,
        qualifying.len(),
        gaps.len(),
        aggregate.flagged_gaps,
        anomalies.len(),
        aggregate.compliance_rate,
        aggregate.risk_level
    );

    Ok(ForensicAnalysis {
        gaps,
        anomalies,
        total_odometer: ctx.current_odometer,
        total_rental_mileage: extraction.total_rental_mileage,
        unaccounted_mileage: aggregate.unaccounted_mileage,
        average_gap_size: aggregate.average_gap_size,
        max_gap: aggregate.max_gap,
        compliance_rate: aggregate.compliance_rate,
        risk_level: aggregate.risk_level,
        insurance_impact: insurance_impact(aggregate.risk_level).to_string(),
        recommendations,
    })
}

//! Anomaly detection.
//!
//! Structural impossibilities in the mileage history, independent of the
//! usage-rule tiers: odometers running backwards, gaps driven faster than a
//! car plausibly can, and abrupt shifts in how far the vehicle travels
//! between bookings.

use crate::logging::structured::LogContext;
use crate::model::{AnomalySeverity, AnomalyType, BookingMileageRecord, MileageAnomaly};

use super::config::ForensicsConfig;
use super::gaps::{elapsed_days, ExtractedGap};

/// Reversed odometer within a single booking.
pub fn detect_reversed_odometer(booking: &BookingMileageRecord) -> Option<MileageAnomaly> {
    let start = booking.start_reading()?;
    let end = booking.end_reading()?;
    if end >= start {
        return None;
    }

    Some(MileageAnomaly {
        anomaly_type: AnomalyType::Reverse,
        severity: AnomalySeverity::Critical,
        description: format!(
            "Odometer decreased during booking {}: started at {} and ended at {}",
            booking.booking_code, start, end
        ),
        reported_mileage: end,
        expected_mileage: start,
        booking_id: Some(booking.id.clone()),
        requires_investigation: true,
    })
}

/// Gap covered at an implausible average speed.
///
/// Only gaps closed by a later booking are checked. Speed uses the exact
/// elapsed time, not the truncated `gap_days`, so a 23-hour gap is still
/// measured. Zero or negative intervals are skipped rather than divided by.
pub fn detect_impossible_speed(
    extracted: &ExtractedGap,
    config: &ForensicsConfig,
) -> Option<MileageAnomaly> {
    let next_booking_id = extracted.next_booking_id.as_ref()?;
    let gap = &extracted.gap;
    let elapsed = elapsed_days(gap.end_date, gap.next_start_date);
    if elapsed <= 0.0 {
        return None;
    }

    let miles_per_day = gap.gap_miles / elapsed;
    if miles_per_day <= config.max_plausible_miles_per_day {
        return None;
    }

    Some(MileageAnomaly {
        anomaly_type: AnomalyType::ImpossibleSpeed,
        severity: AnomalySeverity::High,
        description: format!(
            "{} miles in {:.1} day(s) after booking {} ({:.0} miles/day, limit {:.0})",
            gap.gap_miles,
            elapsed,
            gap.booking_code,
            miles_per_day,
            config.max_plausible_miles_per_day
        ),
        reported_mileage: gap.gap_miles,
        expected_mileage: config.max_plausible_miles_per_day * elapsed,
        booking_id: Some(next_booking_id.clone()),
        requires_investigation: true,
    })
}

/// Odometer rolled back between bookings.
pub fn detect_odometer_rollback(
    extracted: &ExtractedGap,
    config: &ForensicsConfig,
) -> Option<MileageAnomaly> {
    let gap = &extracted.gap;
    if !config.escalate_negative_gaps || gap.gap_miles >= 0.0 {
        return None;
    }

    let booking_id = extracted
        .next_booking_id
        .clone()
        .unwrap_or_else(|| gap.booking_id.clone());

    Some(MileageAnomaly {
        anomaly_type: AnomalyType::ExcessiveGap,
        severity: AnomalySeverity::Critical,
        description: format!(
            "Odometer went back {} miles after booking {} (ended at {}, next reading {})",
            -gap.gap_miles, gap.booking_code, gap.end_odometer, gap.next_start_odometer
        ),
        reported_mileage: gap.next_start_odometer,
        expected_mileage: gap.end_odometer,
        booking_id: Some(booking_id),
        requires_investigation: true,
    })
}

/// Compare recent gap sizes with the vehicle's history.
///
/// Returns `None` below the sample floors or when the history has no
/// positive mean to compare against.
pub fn detect_usage_pattern_change(
    historical: &[f64],
    recent: &[f64],
    config: &ForensicsConfig,
) -> Option<MileageAnomaly> {
    let historical: Vec<f64> = historical.iter().copied().filter(|v| v.is_finite()).collect();
    let recent: Vec<f64> = recent.iter().copied().filter(|v| v.is_finite()).collect();

    if historical.len() < config.min_historical_samples || recent.len() < config.min_recent_samples {
        return None;
    }

    let historical_mean = mean(&historical);
    let recent_mean = mean(&recent);
    if historical_mean <= 0.0 {
        return None;
    }

    let ratio = recent_mean / historical_mean;
    if ratio <= config.pattern_shift_ratio {
        return None;
    }

    Some(MileageAnomaly {
        anomaly_type: AnomalyType::PatternChange,
        severity: AnomalySeverity::Medium,
        description: format!(
            "Recent gaps average {:.1} miles, {:.1}x the historical average of {:.1} miles",
            recent_mean, ratio, historical_mean
        ),
        reported_mileage: recent_mean,
        expected_mileage: historical_mean,
        booking_id: None,
        requires_investigation: true,
    })
}

/// Split chronological gap sizes into (historical, recent).
pub fn split_gap_history(gaps: &[ExtractedGap], recent_window: usize) -> (Vec<f64>, Vec<f64>) {
    let sizes: Vec<f64> = gaps.iter().map(|g| g.gap.gap_miles).collect();
    let split = sizes.len().saturating_sub(recent_window);
    let (historical, recent) = sizes.split_at(split);
    (historical.to_vec(), recent.to_vec())
}

/// Run every per-booking and per-gap check.
///
/// Booking anomalies come first in booking order, then gap anomalies in gap
/// order, then the optional pattern check.
pub fn detect_anomalies(
    bookings: &[&BookingMileageRecord],
    gaps: &[ExtractedGap],
    config: &ForensicsConfig,
    ctx: &LogContext,
) -> Vec<MileageAnomaly> {
    let mut anomalies: Vec<MileageAnomaly> =
        bookings.iter().filter_map(|b| detect_reversed_odometer(b)).collect();

    for extracted in gaps {
        anomalies.extend(detect_odometer_rollback(extracted, config));
        anomalies.extend(detect_impossible_speed(extracted, config));
    }

    if config.detect_pattern_shift {
        let (historical, recent) = split_gap_history(gaps, config.recent_gap_window);
        anomalies.extend(detect_usage_pattern_change(&historical, &recent, config));
    }

    for anomaly in &anomalies {
        crate::log_warn!(
            ctx,
            "ANOMALY_DETECTED",
            kind = anomaly.anomaly_type.as_str(),
            severity = anomaly.severity.as_str(),
            booking = anomaly.booking_id,
        );
    }

    anomalies
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

//! Gap extraction.
//!
//! Walks completed bookings in end-date order and measures the mileage the
//! vehicle accrued between one booking's end and the next booking's start,
//! then between the last booking and the live odometer reading.

use chrono::{DateTime, Utc};

use crate::logging::structured::LogContext;
use crate::model::{BookingMileageRecord, MileageGap};
use crate::policy::{SeverityPolicy, SeverityTier};

use super::config::ForensicsConfig;
use super::context::AnalysisContext;

/// Explanation attached to the synthetic gap ending at the live reading.
pub const TRAILING_GAP_EXPLANATION: &str = "current odometer reading";

/// A gap plus the booking that closed it, if any.
#[derive(Debug, Clone)]
pub struct ExtractedGap {
    pub gap: MileageGap,
    /// `None` for the trailing gap.
    pub next_booking_id: Option<String>,
}

impl ExtractedGap {
    pub fn is_trailing(&self) -> bool {
        self.next_booking_id.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GapExtraction {
    pub gaps: Vec<ExtractedGap>,
    pub total_rental_mileage: f64,
}

/// Completed bookings with an end reading, sorted ascending by end date.
///
/// Ties fall back to start date, then booking id, so the order never
/// depends on how the caller listed the bookings. Everything else is
/// dropped here so later stages never see it.
pub fn qualifying_bookings<'a>(
    bookings: &'a [BookingMileageRecord],
    ctx: &LogContext,
) -> Vec<&'a BookingMileageRecord> {
    let mut qualifying: Vec<&BookingMileageRecord> = bookings
        .iter()
        .filter(|b| {
            if b.qualifies() {
                return true;
            }
            if b.is_completed() {
                crate::log_warn!(
                    ctx,
                    "RECORD_EXCLUDED",
                    booking = b.booking_code,
                    reason = "missing end odometer",
                );
            }
            false
        })
        .collect();

    qualifying.sort_by(|a, b| {
        a.end_date
            .cmp(&b.end_date)
            .then(a.start_date.cmp(&b.start_date))
            .then_with(|| a.id.cmp(&b.id))
    });
    qualifying
}

/// Whole days from `from` to `to`, truncated toward zero.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Fractional days from `from` to `to`.
pub fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0
}

/// Extract gaps from bookings already passed through `qualifying_bookings`.
pub fn extract_gaps(
    bookings: &[&BookingMileageRecord],
    ctx: &AnalysisContext,
    policy: &dyn SeverityPolicy,
    config: &ForensicsConfig,
) -> GapExtraction {
    let log_ctx = ctx.log_context();
    let mut extraction = GapExtraction::default();
    let mut previous: Option<&BookingMileageRecord> = None;

    for &booking in bookings {
        if let Some(miles) = booking.rental_miles() {
            extraction.total_rental_mileage += miles;
        }

        if let Some(prev) = previous {
            match (prev.end_reading(), booking.start_reading()) {
                (Some(prev_end), Some(next_start)) => {
                    let gap = build_gap(
                        prev,
                        prev_end,
                        next_start,
                        booking.start_date,
                        None,
                        ctx,
                        policy,
                        config,
                    );
                    log_gap(&log_ctx, &gap);
                    extraction.gaps.push(ExtractedGap {
                        gap,
                        next_booking_id: Some(booking.id.clone()),
                    });
                }
                _ => {
                    crate::log_debug!(
                        log_ctx,
                        "GAP_SKIPPED",
                        booking = booking.booking_code,
                        reason = "missing start odometer",
                    );
                }
            }
        }

        previous = Some(booking);
    }

    if let Some(last) = previous {
        if let Some(last_end) = last.end_reading() {
            let trailing = build_gap(
                last,
                last_end,
                ctx.current_odometer,
                ctx.now,
                Some(TRAILING_GAP_EXPLANATION.to_string()),
                ctx,
                policy,
                config,
            );
            // Always computed, only surfaced when out of tolerance.
            if trailing.flagged {
                log_gap(&log_ctx, &trailing);
                extraction.gaps.push(ExtractedGap {
                    gap: trailing,
                    next_booking_id: None,
                });
            }
        }
    }

    extraction
}

#[allow(clippy::too_many_arguments)]
fn build_gap(
    prev: &BookingMileageRecord,
    prev_end: f64,
    next_start: f64,
    next_start_date: DateTime<Utc>,
    explanation: Option<String>,
    ctx: &AnalysisContext,
    policy: &dyn SeverityPolicy,
    config: &ForensicsConfig,
) -> MileageGap {
    let gap_miles = next_start - prev_end;
    let gap_days = days_between(prev.end_date, next_start_date);

    let mut severity = policy.classify(gap_miles, ctx.primary_use);
    if config.escalate_negative_gaps && gap_miles < 0.0 {
        severity = SeverityTier::Violation;
    }

    MileageGap {
        booking_id: prev.id.clone(),
        booking_code: prev.booking_code.clone(),
        end_odometer: prev_end,
        end_date: prev.end_date,
        next_start_odometer: next_start,
        next_start_date,
        gap_miles,
        gap_days,
        severity,
        flagged: severity.is_flagged(),
        explanation,
    }
}

fn log_gap(ctx: &LogContext, gap: &MileageGap) {
    if gap.flagged {
        crate::log_info!(
            ctx,
            "GAP_FLAGGED",
            after = gap.booking_code,
            miles = gap.gap_miles,
            days = gap.gap_days,
            severity = gap.severity.as_str(),
        );
    } else {
        crate::log_debug!(
            ctx,
            "GAP_NORMAL",
            after = gap.booking_code,
            miles = gap.gap_miles,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PrimaryUse, UsageRulesTable};
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, d, 12, 0, 0).unwrap()
    }

    fn booking(id: &str, start_day: u32, end_day: u32, start: Option<f64>, end: Option<f64>) -> BookingMileageRecord {
        BookingMileageRecord {
            id: id.to_string(),
            booking_code: format!("BK-{}", id),
            start_date: day(start_day),
            end_date: day(end_day),
            start_odometer: start,
            end_odometer: end,
            status: "completed".to_string(),
        }
    }

    fn ctx(current: f64) -> AnalysisContext {
        AnalysisContext::new(current, PrimaryUse::Rental, day(28))
    }

    fn run(bookings: &[BookingMileageRecord], current: f64) -> GapExtraction {
        let log_ctx = LogContext::new("test-analysis");
        let sorted = qualifying_bookings(bookings, &log_ctx);
        extract_gaps(&sorted, &ctx(current), &UsageRulesTable::new(), &ForensicsConfig::default())
    }

    #[test]
    fn test_qualifying_bookings_filters_and_sorts() {
        let mut cancelled = booking("c", 1, 2, Some(0.0), Some(10.0));
        cancelled.status = "cancelled".to_string();
        let bookings = vec![
            booking("late", 10, 12, Some(200.0), Some(300.0)),
            cancelled,
            booking("early", 1, 3, Some(0.0), Some(100.0)),
            booking("no-end", 5, 6, Some(100.0), None),
        ];

        let sorted = qualifying_bookings(&bookings, &LogContext::new("t"));
        let ids: Vec<&str> = sorted.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_single_booking_has_no_gaps() {
        let extraction = run(&[booking("a", 1, 3, Some(100.0), Some(250.0))], 250.0);
        assert!(extraction.gaps.is_empty());
        assert_eq!(extraction.total_rental_mileage, 150.0);
    }

    #[test]
    fn test_contiguous_bookings_produce_normal_gap() {
        let extraction = run(
            &[
                booking("a", 1, 3, Some(100.0), Some(250.0)),
                booking("b", 5, 7, Some(250.0), Some(400.0)),
            ],
            400.0,
        );

        assert_eq!(extraction.gaps.len(), 1);
        let gap = &extraction.gaps[0];
        assert_eq!(gap.gap.gap_miles, 0.0);
        assert_eq!(gap.gap.gap_days, 2);
        assert_eq!(gap.gap.severity, SeverityTier::Normal);
        assert!(!gap.gap.flagged);
        assert_eq!(gap.gap.booking_id, "a");
        assert_eq!(gap.next_booking_id.as_deref(), Some("b"));
        assert_eq!(extraction.total_rental_mileage, 300.0);
    }

    #[test]
    fn test_large_gap_is_flagged_for_rental() {
        let extraction = run(
            &[
                booking("a", 1, 3, Some(100.0), Some(250.0)),
                booking("b", 5, 7, Some(750.0), Some(800.0)),
            ],
            800.0,
        );

        let gap = &extraction.gaps[0].gap;
        assert_eq!(gap.gap_miles, 500.0);
        assert_ne!(gap.severity, SeverityTier::Normal);
        assert!(gap.flagged);
    }

    #[test]
    fn test_trailing_gap_only_when_flagged() {
        let bookings = [booking("a", 1, 3, Some(100.0), Some(250.0))];

        let quiet = run(&bookings, 260.0);
        assert!(quiet.gaps.is_empty());

        let loud = run(&bookings, 900.0);
        assert_eq!(loud.gaps.len(), 1);
        let trailing = &loud.gaps[0];
        assert!(trailing.is_trailing());
        assert_eq!(trailing.gap.gap_miles, 650.0);
        assert_eq!(trailing.gap.next_start_date, day(28));
        assert_eq!(trailing.gap.gap_days, 25);
        assert_eq!(
            trailing.gap.explanation.as_deref(),
            Some(TRAILING_GAP_EXPLANATION)
        );
    }

    #[test]
    fn test_missing_start_odometer_skips_incoming_gap() {
        let extraction = run(
            &[
                booking("a", 1, 3, Some(100.0), Some(250.0)),
                booking("b", 5, 7, None, Some(400.0)),
                booking("c", 9, 10, Some(400.0), Some(450.0)),
            ],
            450.0,
        );

        assert_eq!(extraction.gaps.len(), 1);
        assert_eq!(extraction.gaps[0].gap.booking_id, "b");
        assert_eq!(extraction.total_rental_mileage, 200.0);
    }

    #[test]
    fn test_negative_gap_escalated_unless_disabled() {
        let bookings = [
            booking("a", 1, 3, Some(100.0), Some(250.0)),
            booking("b", 5, 7, Some(200.0), Some(300.0)),
        ];
        let log_ctx = LogContext::new("t");
        let sorted = qualifying_bookings(&bookings, &log_ctx);
        let policy = UsageRulesTable::new();

        let escalated = extract_gaps(&sorted, &ctx(300.0), &policy, &ForensicsConfig::default());
        assert_eq!(escalated.gaps[0].gap.gap_miles, -50.0);
        assert_eq!(escalated.gaps[0].gap.severity, SeverityTier::Violation);

        let config = ForensicsConfig {
            escalate_negative_gaps: false,
            ..ForensicsConfig::default()
        };
        let raw = extract_gaps(&sorted, &ctx(300.0), &policy, &config);
        assert_eq!(raw.gaps[0].gap.severity, SeverityTier::Normal);
    }

    #[test]
    fn test_days_between_truncates() {
        let start = day(1);
        assert_eq!(days_between(start, start + Duration::hours(47)), 1);
        assert_eq!(days_between(start, start - Duration::hours(30)), -1);
    }

    #[test]
    fn test_elapsed_days_is_fractional() {
        let start = day(1);
        assert_eq!(elapsed_days(start, start + Duration::hours(36)), 1.5);
        assert_eq!(elapsed_days(start, start - Duration::hours(12)), -0.5);
        assert_eq!(elapsed_days(start, start), 0.0);
    }

    #[test]
    fn test_tied_end_dates_ignore_input_order() {
        let shared_end = day(2);
        let mut x = booking("x", 1, 2, Some(1000.0), Some(1100.0));
        x.start_date = shared_end - Duration::hours(30);
        x.end_date = shared_end;
        let mut y = booking("y", 1, 2, Some(1500.0), Some(1600.0));
        y.start_date = shared_end - Duration::hours(6);
        y.end_date = shared_end;

        let forward = run(&[x.clone(), y.clone()], 1600.0);
        let backward = run(&[y, x], 1600.0);

        let miles = |e: &GapExtraction| e.gaps.iter().map(|g| g.gap.gap_miles).collect::<Vec<_>>();
        assert_eq!(miles(&forward), vec![400.0]);
        assert_eq!(miles(&forward), miles(&backward));

        // Same start and end: the id decides.
        let a = booking("a", 1, 2, Some(0.0), Some(10.0));
        let b = booking("b", 1, 2, Some(10.0), Some(20.0));
        let log_ctx = LogContext::new("t");
        let bookings = [b, a];
        let ids: Vec<&str> = qualifying_bookings(&bookings, &log_ctx)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

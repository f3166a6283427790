//! Analysis throughput over long booking histories.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mileage_forensics::engine::{analyze_mileage, AnalysisContext, ForensicsConfig};
use mileage_forensics::model::BookingMileageRecord;
use mileage_forensics::policy::{PrimaryUse, UsageRulesTable};

fn history(len: usize) -> (Vec<BookingMileageRecord>, f64) {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let mut odometer = 5_000.0;
    let bookings = (0..len)
        .map(|i| {
            // Mostly quiet gaps with a spike every 17th booking.
            odometer += if i % 17 == 0 { 900.0 } else { (i % 7) as f64 * 6.0 };
            let start = odometer;
            odometer += 80.0 + (i % 11) as f64 * 15.0;
            let start_date = base + Duration::days(i as i64 * 3);
            BookingMileageRecord {
                id: format!("b-{}", i),
                booking_code: format!("BK-{:06}", i),
                start_date,
                end_date: start_date + Duration::days(2),
                start_odometer: Some(start),
                end_odometer: Some(odometer),
                status: "completed".to_string(),
            }
        })
        .collect();
    (bookings, odometer + 40.0)
}

fn bench_analyze(c: &mut Criterion) {
    let policy = UsageRulesTable::new();
    let config = ForensicsConfig {
        detect_pattern_shift: true,
        ..ForensicsConfig::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("analyze_mileage");
    for len in [10usize, 100, 1_000] {
        let (bookings, current) = history(len);
        let ctx = AnalysisContext::new(current, PrimaryUse::Rental, now);
        group.bench_with_input(BenchmarkId::from_parameter(len), &bookings, |b, bookings| {
            b.iter(|| analyze_mileage(black_box(bookings), &ctx, &policy, &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);

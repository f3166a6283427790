//! Booking record decoding from host JSON.
//!
//! The booking app serializes rows with whatever key style its ORM uses, so
//! each field is looked up under several paths. Records missing an id or a
//! usable date are skipped; odometers that are absent or unparseable decode
//! as missing readings and are handled by the engine.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::logging::structured::LogContext;
use crate::model::BookingMileageRecord;

use super::json_path::{resolve_json_path, value_to_float, value_to_string};

const ID_PATHS: &[&str] = &["id", "booking_id", "bookingId"];
const CODE_PATHS: &[&str] = &["booking_code", "bookingCode", "code"];
const START_DATE_PATHS: &[&str] = &["start_date", "startDate", "trip_start", "tripStart"];
const END_DATE_PATHS: &[&str] = &["end_date", "endDate", "trip_end", "tripEnd"];
const START_ODOMETER_PATHS: &[&str] = &["start_odometer", "startOdometer", "odometer.start"];
const END_ODOMETER_PATHS: &[&str] = &["end_odometer", "endOdometer", "odometer.end"];
const STATUS_PATHS: &[&str] = &["status", "booking_status", "bookingStatus"];

/// First non-null value found under any of `paths`.
fn lookup<'a>(data: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| resolve_json_path(data, p))
        .find(|v| !v.is_null())
}

/// Parse RFC 3339, naive "YYYY-MM-DD HH:MM:SS" (taken as UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode one booking object.
pub fn decode_booking(data: &Value) -> Result<BookingMileageRecord, String> {
    if !data.is_object() {
        return Err("record is not a JSON object".to_string());
    }

    let id = lookup(data, ID_PATHS)
        .map(value_to_string)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing booking id".to_string())?;

    let booking_code = lookup(data, CODE_PATHS)
        .map(value_to_string)
        .unwrap_or_else(|| id.clone());

    let date = |paths: &[&str], name: &str| {
        lookup(data, paths)
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp)
            .ok_or_else(|| format!("missing or unparseable {}", name))
    };
    let start_date = date(START_DATE_PATHS, "start date")?;
    let end_date = date(END_DATE_PATHS, "end date")?;

    let status = lookup(data, STATUS_PATHS)
        .map(value_to_string)
        .unwrap_or_default();

    Ok(BookingMileageRecord {
        id,
        booking_code,
        start_date,
        end_date,
        start_odometer: lookup(data, START_ODOMETER_PATHS).and_then(value_to_float),
        end_odometer: lookup(data, END_ODOMETER_PATHS).and_then(value_to_float),
        status,
    })
}

/// Decode serialized booking rows, skipping the ones that cannot be used.
pub fn decode_bookings(rows: &[String], ctx: &LogContext) -> Vec<BookingMileageRecord> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let decoded = serde_json::from_str::<Value>(row)
            .map_err(|e| format!("JSON parse error: {}", e))
            .and_then(|value| decode_booking(&value));

        match decoded {
            Ok(record) => records.push(record),
            Err(reason) => {
                crate::log_warn!(ctx, "RECORD_UNDECODABLE", index = index, reason = reason);
            }
        }
    }

    log::debug!(
        "{} RECORDS_DECODED received={} decoded={}",
        ctx,
        rows.len(),
        records.len()
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_snake_case() {
        let record = decode_booking(&json!({
            "id": 42,
            "booking_code": "BK-42",
            "start_date": "2026-03-01T09:00:00Z",
            "end_date": "2026-03-03T18:00:00+02:00",
            "start_odometer": 18250,
            "end_odometer": "18410.5",
            "status": "completed"
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.booking_code, "BK-42");
        assert_eq!(record.end_date, Utc.with_ymd_and_hms(2026, 3, 3, 16, 0, 0).unwrap());
        assert_eq!(record.start_odometer, Some(18250.0));
        assert_eq!(record.end_odometer, Some(18410.5));
        assert!(record.qualifies());
    }

    #[test]
    fn test_decode_camel_case_and_nested_odometer() {
        let record = decode_booking(&json!({
            "bookingId": "b-9",
            "startDate": "2026-03-01 09:00:00",
            "endDate": "2026-03-02",
            "odometer": {"start": 100, "end": null},
            "bookingStatus": "completed"
        }))
        .unwrap();

        assert_eq!(record.booking_code, "b-9");
        assert_eq!(record.start_date, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        assert_eq!(record.end_date, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
        assert_eq!(record.start_odometer, Some(100.0));
        assert_eq!(record.end_odometer, None);
        assert!(!record.qualifies());
    }

    #[test]
    fn test_decode_rejects_unusable_rows() {
        assert!(decode_booking(&json!([1, 2])).is_err());
        assert!(decode_booking(&json!({"start_date": "2026-03-01"})).is_err());
        assert!(decode_booking(&json!({"id": "b", "start_date": "yesterday", "end_date": "2026-03-01"})).is_err());
    }

    #[test]
    fn test_decode_bookings_skips_bad_rows() {
        let rows = vec![
            r#"{"id": "a", "start_date": "2026-03-01", "end_date": "2026-03-02", "status": "completed"}"#.to_string(),
            "invalid json{".to_string(),
            r#"{"id": "b"}"#.to_string(),
        ];
        let records = decode_bookings(&rows, &LogContext::new("t"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-03-01T09:00:00.123Z").is_some());
        assert!(parse_timestamp("2026-03-01T09:00:00").is_some());
        assert!(parse_timestamp("01/03/2026").is_none());
    }
}

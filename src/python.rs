//! PyO3 bindings for the booking application.
//!
//! Bookings cross the boundary as JSON strings and results come back as
//! JSON, so the Python side only needs `json.dumps`/`json.loads`.

use chrono::Utc;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::engine::{analyze_mileage, detect_usage_pattern_change as detect_pattern, AnalysisContext, ForensicsConfig};
use crate::error::{ForensicsError, Result};
use crate::extraction::{decode_bookings, parse_timestamp};
use crate::logging::init_logger;
use crate::model::ForensicAnalysis;
use crate::policy::{get_usage_rules, get_usage_rules_mut, PrimaryUse};
use crate::report::render_report;

impl From<ForensicsError> for PyErr {
    fn from(err: ForensicsError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn load_config(config: Option<&str>) -> Result<ForensicsConfig> {
    match config {
        Some(json) => ForensicsConfig::from_json(json),
        None => Ok(ForensicsConfig::default()),
    }
}

fn build_context(
    current_odometer: f64,
    primary_use: &str,
    now: Option<&str>,
    vehicle_id: Option<&str>,
) -> Result<AnalysisContext> {
    let primary_use: PrimaryUse = primary_use.parse()?;
    let now = match now {
        Some(raw) => parse_timestamp(raw)
            .ok_or_else(|| ForensicsError::InvalidInput(format!("unparseable timestamp {:?}", raw)))?,
        None => Utc::now(),
    };

    let ctx = AnalysisContext::new(current_odometer, primary_use, now);
    Ok(match vehicle_id {
        Some(vid) => ctx.with_vehicle(vid),
        None => ctx,
    })
}

fn run(
    bookings: &[String],
    current_odometer: f64,
    primary_use: &str,
    now: Option<&str>,
    config: Option<&str>,
    vehicle_id: Option<&str>,
) -> Result<(ForensicAnalysis, AnalysisContext)> {
    let ctx = build_context(current_odometer, primary_use, now, vehicle_id)?;
    let config = load_config(config)?;
    let records = decode_bookings(bookings, &ctx.log_context());

    let rules = get_usage_rules();
    let analysis = analyze_mileage(&records, &ctx, &*rules, &config)?;
    Ok((analysis, ctx))
}

/// Analyze a vehicle's mileage history.
///
/// # Arguments
/// * `bookings` - Booking rows, each JSON serialized
/// * `current_odometer` - Live odometer reading
/// * `primary_use` - Declared use label ("Rental", "Personal", ...)
/// * `now` - RFC 3339 instant the trailing gap runs to (defaults to now)
/// * `config` - Optional JSON engine configuration
/// * `vehicle_id` - Optional id for log correlation
///
/// # Returns
/// The forensic analysis as a JSON string
#[pyfunction]
#[pyo3(signature = (bookings, current_odometer, primary_use, now=None, config=None, vehicle_id=None))]
fn analyze_vehicle_mileage(
    bookings: Vec<String>,
    current_odometer: f64,
    primary_use: String,
    now: Option<String>,
    config: Option<String>,
    vehicle_id: Option<String>,
) -> PyResult<String> {
    init_logger();
    let (analysis, _) = run(
        &bookings,
        current_odometer,
        &primary_use,
        now.as_deref(),
        config.as_deref(),
        vehicle_id.as_deref(),
    )?;
    Ok(analysis.to_json()?)
}

/// Analyze and render the plain-text audit report.
#[pyfunction]
#[pyo3(signature = (bookings, current_odometer, primary_use, now=None, config=None, vehicle_id=None))]
fn render_forensic_report(
    bookings: Vec<String>,
    current_odometer: f64,
    primary_use: String,
    now: Option<String>,
    config: Option<String>,
    vehicle_id: Option<String>,
) -> PyResult<String> {
    init_logger();
    let (analysis, ctx) = run(
        &bookings,
        current_odometer,
        &primary_use,
        now.as_deref(),
        config.as_deref(),
        vehicle_id.as_deref(),
    )?;
    Ok(render_report(&analysis, &ctx)?)
}

/// Compare recent gap sizes with historical ones.
///
/// Returns the anomaly as JSON, or None when there is no shift or too few
/// samples.
#[pyfunction]
#[pyo3(signature = (historical, recent, config=None))]
fn detect_usage_pattern_change(
    historical: Vec<f64>,
    recent: Vec<f64>,
    config: Option<String>,
) -> PyResult<Option<String>> {
    let config = load_config(config.as_deref())?;
    match detect_pattern(&historical, &recent, &config) {
        Some(anomaly) => Ok(Some(
            serde_json::to_string(&anomaly).map_err(ForensicsError::from)?,
        )),
        None => Ok(None),
    }
}

/// Load usage rules from database rows.
///
/// # Arguments
/// * `rows` - List of (use_label, warning, critical, violation) tuples
#[pyfunction]
fn load_usage_rules_from_db(rows: Vec<(String, f64, f64, f64)>) -> PyResult<()> {
    init_logger();
    get_usage_rules_mut().load_from_db_rows(rows)?;
    Ok(())
}

/// Reset the usage rules to built-in defaults.
#[pyfunction]
fn refresh_usage_rules() -> PyResult<()> {
    init_logger();
    get_usage_rules_mut().clear();
    log::info!("USAGE_RULES_CLEARED");
    Ok(())
}

/// Get the use categories in the rules table.
#[pyfunction]
fn get_loaded_use_categories() -> PyResult<Vec<String>> {
    Ok(get_usage_rules().use_categories())
}

/// Python module definition
#[pymodule]
fn mileage_forensics(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_vehicle_mileage, m)?)?;
    m.add_function(wrap_pyfunction!(render_forensic_report, m)?)?;
    m.add_function(wrap_pyfunction!(detect_usage_pattern_change, m)?)?;
    m.add_function(wrap_pyfunction!(load_usage_rules_from_db, m)?)?;
    m.add_function(wrap_pyfunction!(refresh_usage_rules, m)?)?;
    m.add_function(wrap_pyfunction!(get_loaded_use_categories, m)?)?;
    Ok(())
}

//! Plain-text forensic report for audit trails and support tooling.
//!
//! Section order is fixed: header, mileage totals, compliance and risk,
//! insurance impact, recommendations, anomalies.

use crate::engine::context::AnalysisContext;
use crate::error::Result;
use crate::model::ForensicAnalysis;

const RULE: &str = "============================================================";

pub fn render_report(analysis: &ForensicAnalysis, ctx: &AnalysisContext) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();

    // Header
    lines.push(RULE.to_string());
    lines.push("MILEAGE FORENSIC REPORT".to_string());
    lines.push(RULE.to_string());
    lines.push(format!(
        "Vehicle: {}",
        ctx.vehicle_id.as_deref().unwrap_or("unspecified")
    ));
    lines.push(format!("Declared primary use: {}", ctx.primary_use));
    lines.push(format!("As of: {}", ctx.now.to_rfc3339()));
    lines.push(format!("Fingerprint: {}", analysis.fingerprint()?));
    lines.push(String::new());

    lines.push("MILEAGE TOTALS".to_string());
    lines.push(format!("  Current odometer:      {:.1} mi", analysis.total_odometer));
    lines.push(format!("  Rental mileage:        {:.1} mi", analysis.total_rental_mileage));
    lines.push(format!("  Unaccounted mileage:   {:.1} mi", analysis.unaccounted_mileage));
    lines.push(format!("  Average gap:           {:.1} mi", analysis.average_gap_size));
    lines.push(format!("  Largest gap:           {:.1} mi", analysis.max_gap));
    lines.push(String::new());

    lines.push("COMPLIANCE & RISK".to_string());
    lines.push(format!(
        "  Gaps analysed: {} ({} flagged)",
        analysis.gaps.len(),
        analysis.flagged_gap_count()
    ));
    lines.push(format!("  Compliance rate: {:.1}%", analysis.compliance_rate));
    lines.push(format!("  Risk level: {}", analysis.risk_level));
    lines.push(String::new());

    lines.push("INSURANCE IMPACT".to_string());
    lines.push(format!("  {}", analysis.insurance_impact));
    lines.push(String::new());

    lines.push("RECOMMENDATIONS".to_string());
    if analysis.recommendations.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (i, rec) in analysis.recommendations.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, rec));
    }
    lines.push(String::new());

    lines.push("ANOMALIES".to_string());
    if analysis.anomalies.is_empty() {
        lines.push("  (none)".to_string());
    }
    for anomaly in &analysis.anomalies {
        lines.push(format!(
            "  [{}] {} - {}{}",
            anomaly.severity.as_str().to_uppercase(),
            anomaly.anomaly_type,
            anomaly.description,
            if anomaly.requires_investigation {
                " (investigate)"
            } else {
                ""
            }
        ));
    }

    Ok(lines.join("\n") + "\n")
}

//! Analysis context.
//!
//! Carries the caller-supplied "now", the live odometer reading and the
//! vehicle's declared use, plus ids for log correlation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::policy::PrimaryUse;

/// Inputs for one analysis besides the booking list.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub analysis_id: String,
    pub vehicle_id: Option<String>,
    pub current_odometer: f64,
    pub primary_use: PrimaryUse,
    /// Instant the trailing gap runs up to.
    pub now: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn new(current_odometer: f64, primary_use: PrimaryUse, now: DateTime<Utc>) -> Self {
        let analysis_id = format!("analysis-{}", &Uuid::new_v4().simple().to_string()[..8]);

        Self {
            analysis_id,
            vehicle_id: None,
            current_odometer,
            primary_use,
            now,
        }
    }

    pub fn with_vehicle(mut self, vehicle_id: &str) -> Self {
        self.vehicle_id = Some(vehicle_id.to_string());
        self
    }

    pub fn log_context(&self) -> LogContext {
        let ctx = LogContext::new(&self.analysis_id);
        match &self.vehicle_id {
            Some(vid) => ctx.with_vehicle(vid),
            None => ctx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_context_includes_vehicle() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let ctx = AnalysisContext::new(1000.0, PrimaryUse::Rental, now).with_vehicle("veh-9");

        assert!(ctx.analysis_id.starts_with("analysis-"));
        assert_eq!(ctx.analysis_id.len(), "analysis-".len() + 8);
        assert_eq!(
            ctx.log_context().to_string(),
            format!("[analysis={}] [vehicle=veh-9]", ctx.analysis_id)
        );
    }
}

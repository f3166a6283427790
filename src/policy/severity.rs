//! Gap severity tiers and the severity-policy seam.
//!
//! The analyzer never decides thresholds itself. It asks a `SeverityPolicy`
//! to classify each gap; the usage-rules table is the production policy and
//! tests can pass any closure.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::usage::PrimaryUse;

/// Gap severity, in ascending order of concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    Normal,
    Warning,
    Critical,
    Violation,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "NORMAL",
            SeverityTier::Warning => "WARNING",
            SeverityTier::Critical => "CRITICAL",
            SeverityTier::Violation => "VIOLATION",
        }
    }

    pub fn is_flagged(&self) -> bool {
        *self != SeverityTier::Normal
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a mileage gap for a vehicle's declared use.
///
/// Implementations must be pure: the same inputs always give the same tier.
pub trait SeverityPolicy {
    fn classify(&self, gap_miles: f64, primary_use: PrimaryUse) -> SeverityTier;
}

impl<F> SeverityPolicy for F
where
    F: Fn(f64, PrimaryUse) -> SeverityTier,
{
    fn classify(&self, gap_miles: f64, primary_use: PrimaryUse) -> SeverityTier {
        self(gap_miles, primary_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_and_flagging() {
        assert!(SeverityTier::Normal < SeverityTier::Warning);
        assert!(SeverityTier::Critical < SeverityTier::Violation);
        assert!(!SeverityTier::Normal.is_flagged());
        assert!(SeverityTier::Warning.is_flagged());
    }

    #[test]
    fn test_closure_policy() {
        let policy = |miles: f64, _: PrimaryUse| {
            if miles > 10.0 {
                SeverityTier::Violation
            } else {
                SeverityTier::Normal
            }
        };
        assert_eq!(policy.classify(11.0, PrimaryUse::Rental), SeverityTier::Violation);
        assert_eq!(policy.classify(10.0, PrimaryUse::Rental), SeverityTier::Normal);
    }

    #[test]
    fn test_wire_vocabulary() {
        assert_eq!(serde_json::to_string(&SeverityTier::Violation).unwrap(), "\"VIOLATION\"");
        assert_eq!(SeverityTier::Warning.to_string(), "WARNING");
    }
}

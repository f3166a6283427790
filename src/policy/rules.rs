//! Usage-rules table: per-use gap thresholds.
//!
//! The booking app keeps the thresholds in its database and pushes them in
//! through `load_from_db_rows`. Until then the built-in defaults apply.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use crate::error::{ForensicsError, Result};

use super::severity::{SeverityPolicy, SeverityTier};
use super::usage::PrimaryUse;

/// Gap thresholds in miles. A gap strictly above a threshold reaches that tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRule {
    pub warning: f64,
    pub critical: f64,
    pub violation: f64,
}

impl UsageRule {
    pub const fn new(warning: f64, critical: f64, violation: f64) -> Self {
        Self {
            warning,
            critical,
            violation,
        }
    }

    /// Thresholds must be finite, non-negative and strictly ascending.
    pub fn validate(&self, use_label: &str) -> Result<()> {
        let invalid = |reason: &str| ForensicsError::InvalidUsageRule {
            use_label: use_label.to_string(),
            reason: reason.to_string(),
        };

        if ![self.warning, self.critical, self.violation]
            .iter()
            .all(|t| t.is_finite() && *t >= 0.0)
        {
            return Err(invalid("thresholds must be finite and non-negative"));
        }
        if !(self.warning < self.critical && self.critical < self.violation) {
            return Err(invalid("thresholds must ascend warning < critical < violation"));
        }
        Ok(())
    }

    pub fn tier_for(&self, gap_miles: f64) -> SeverityTier {
        if gap_miles > self.violation {
            SeverityTier::Violation
        } else if gap_miles > self.critical {
            SeverityTier::Critical
        } else if gap_miles > self.warning {
            SeverityTier::Warning
        } else {
            SeverityTier::Normal
        }
    }
}

/// Built-in thresholds used until the database rows are loaded.
pub fn default_rule(primary_use: PrimaryUse) -> UsageRule {
    match primary_use {
        PrimaryUse::Rental => UsageRule::new(25.0, 75.0, 150.0),
        PrimaryUse::Business => UsageRule::new(100.0, 300.0, 600.0),
        PrimaryUse::Mixed => UsageRule::new(150.0, 400.0, 800.0),
        PrimaryUse::Personal => UsageRule::new(200.0, 500.0, 1000.0),
    }
}

/// Thresholds for every primary-use category.
#[derive(Debug, Clone)]
pub struct UsageRulesTable {
    rules: BTreeMap<PrimaryUse, UsageRule>,
    loaded: bool,
}

impl Default for UsageRulesTable {
    fn default() -> Self {
        Self {
            rules: PrimaryUse::ALL
                .iter()
                .map(|u| (*u, default_rule(*u)))
                .collect(),
            loaded: false,
        }
    }
}

impl UsageRulesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once database rows replaced the built-in defaults.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn rule(&self, primary_use: PrimaryUse) -> UsageRule {
        self.rules
            .get(&primary_use)
            .copied()
            .unwrap_or_else(|| default_rule(primary_use))
    }

    pub fn set_rule(&mut self, primary_use: PrimaryUse, rule: UsageRule) -> Result<()> {
        rule.validate(primary_use.as_str())?;
        self.rules.insert(primary_use, rule);
        Ok(())
    }

    pub fn use_categories(&self) -> Vec<String> {
        self.rules.keys().map(|u| u.as_str().to_string()).collect()
    }

    /// Load rules from database rows.
    ///
    /// # Arguments
    /// * `rows` - (use_label, warning, critical, violation)
    ///
    /// Categories missing from `rows` keep their built-in thresholds. The
    /// table is left untouched if any row is invalid.
    pub fn load_from_db_rows(&mut self, rows: Vec<(String, f64, f64, f64)>) -> Result<()> {
        let mut staged = UsageRulesTable::default().rules;

        for (use_label, warning, critical, violation) in rows {
            let primary_use: PrimaryUse = use_label.parse()?;
            let rule = UsageRule::new(warning, critical, violation);
            rule.validate(&use_label)?;
            staged.insert(primary_use, rule);
        }

        self.rules = staged;
        self.loaded = true;

        log::info!(
            "USAGE_RULES_LOADED categories={:?}",
            self.rules
                .iter()
                .map(|(u, r)| (u.as_str(), r.warning, r.critical, r.violation))
                .collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Reset to built-in defaults.
    pub fn clear(&mut self) {
        *self = UsageRulesTable::default();
    }
}

impl SeverityPolicy for UsageRulesTable {
    fn classify(&self, gap_miles: f64, primary_use: PrimaryUse) -> SeverityTier {
        self.rule(primary_use).tier_for(gap_miles)
    }
}

// Global rules cache shared by every analysis in the process
lazy_static! {
    static ref USAGE_RULES: RwLock<UsageRulesTable> = RwLock::new(UsageRulesTable::new());
}

/// Get a read-only reference to the global usage-rules table.
pub fn get_usage_rules() -> RwLockReadGuard<'static, UsageRulesTable> {
    USAGE_RULES.read()
}

/// Get a mutable reference to the global usage-rules table.
pub fn get_usage_rules_mut() -> RwLockWriteGuard<'static, UsageRulesTable> {
    USAGE_RULES.write()
}

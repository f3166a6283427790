//! Declared primary-use categories.
//!
//! Hosts declare how a vehicle is used outside of rentals. The label comes
//! from free-form host settings, so parsing is lenient about case and
//! separators ("Rental", "rental-only", "RENTAL_ONLY" are all `Rental`).

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ForensicsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimaryUse {
    Rental,
    Personal,
    Business,
    Mixed,
}

impl PrimaryUse {
    pub const ALL: [PrimaryUse; 4] = [
        PrimaryUse::Rental,
        PrimaryUse::Personal,
        PrimaryUse::Business,
        PrimaryUse::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryUse::Rental => "Rental",
            PrimaryUse::Personal => "Personal",
            PrimaryUse::Business => "Business",
            PrimaryUse::Mixed => "Mixed",
        }
    }

    /// Rental-only vehicles are expected to accrue almost no off-platform miles.
    pub fn is_rental_only(&self) -> bool {
        matches!(self, PrimaryUse::Rental)
    }
}

impl fmt::Display for PrimaryUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[\s_\-/&]+").unwrap();

    /// Checked in order; mixed labels mention personal/business too.
    static ref USE_PATTERNS: Vec<(Regex, PrimaryUse)> = vec![
        (Regex::new(r"\bmixed\b|^personal (and )?business( use)?$").unwrap(), PrimaryUse::Mixed),
        (Regex::new(r"^rentals?( only| use)?$").unwrap(), PrimaryUse::Rental),
        (Regex::new(r"^personal( use)?$").unwrap(), PrimaryUse::Personal),
        (Regex::new(r"^(business|commercial)( use)?$").unwrap(), PrimaryUse::Business),
    ];
}

impl FromStr for PrimaryUse {
    type Err = ForensicsError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let lowered = label.trim().to_lowercase();
        let normalized = SEPARATORS.replace_all(&lowered, " ");
        let normalized = normalized.trim();

        USE_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(normalized))
            .map(|(_, category)| *category)
            .ok_or_else(|| ForensicsError::UnknownPrimaryUse(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_labels() {
        for category in PrimaryUse::ALL {
            assert_eq!(category.as_str().parse::<PrimaryUse>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_host_variants() {
        assert_eq!("rental-only".parse::<PrimaryUse>().unwrap(), PrimaryUse::Rental);
        assert_eq!("RENTAL_ONLY".parse::<PrimaryUse>().unwrap(), PrimaryUse::Rental);
        assert_eq!(" Personal use ".parse::<PrimaryUse>().unwrap(), PrimaryUse::Personal);
        assert_eq!("commercial".parse::<PrimaryUse>().unwrap(), PrimaryUse::Business);
        assert_eq!("mixed business use".parse::<PrimaryUse>().unwrap(), PrimaryUse::Mixed);
        assert_eq!("Personal/Mixed use".parse::<PrimaryUse>().unwrap(), PrimaryUse::Mixed);
        assert_eq!("personal & business".parse::<PrimaryUse>().unwrap(), PrimaryUse::Mixed);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "boat".parse::<PrimaryUse>().unwrap_err();
        assert!(matches!(err, ForensicsError::UnknownPrimaryUse(ref l) if l == "boat"));
    }
}

//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The coverage fraction was out of range.
    #[error("coverage must be between 0.0 and 1.0, got {value}")]
    CoverageOutOfRange { value: f64 },
}

/// Generates a validated string newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new value after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated case identifier.
    ///
    /// Case IDs must be non-empty. All events sharing a case ID belong to
    /// the same process instance.
    CaseId, "case ID"
);

define_string_id!(
    /// A validated activity label.
    ///
    /// Activities are the nodes of the process map and the elements of a
    /// variant path.
    Activity, "activity"
);

/// A coverage fraction in the range \[0.0, 1.0\].
///
/// Used as the cutoff for the cumulative-share reductions (variants and
/// boundary activities).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Coverage(f64);

impl Coverage {
    /// Share of cases the reduced variant set must cover.
    pub const VARIANTS: Self = Self(0.95);

    /// Share of start/end occurrences the boundary activities must cover.
    pub const BOUNDARY: Self = Self(0.90);

    /// Creates a new coverage value after validation.
    ///
    /// Returns an error if the value is outside \[0.0, 1.0\] or is NaN.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::CoverageOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the inner fraction.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_id_rejects_empty() {
        assert!(CaseId::new("").is_err());
        assert!(CaseId::new("case-1").is_ok());
    }

    #[test]
    fn test_activity_rejects_empty() {
        let err = Activity::new("").unwrap_err();
        assert_eq!(err.to_string(), "activity cannot be empty");
        assert!(Activity::new("Register").is_ok());
    }

    #[test]
    fn test_activity_serde_roundtrip() {
        let activity = Activity::new("ثبت درخواست").unwrap();
        let json = serde_json::to_string(&activity).unwrap();
        assert_eq!(json, "\"ثبت درخواست\"");
        let parsed: Activity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, activity);
    }

    #[test]
    fn test_case_id_serde_rejects_empty() {
        let result: Result<CaseId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_case_ids_order_lexicographically() {
        let a = CaseId::new("10").unwrap();
        let b = CaseId::new("2").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_coverage_validates_range() {
        assert!(Coverage::new(0.0).is_ok());
        assert!(Coverage::new(0.95).is_ok());
        assert!(Coverage::new(1.0).is_ok());
        assert!(Coverage::new(-0.1).is_err());
        assert!(Coverage::new(1.1).is_err());
        assert!(Coverage::new(f64::NAN).is_err());
    }

    #[test]
    fn test_coverage_displays_as_percent() {
        assert_eq!(Coverage::VARIANTS.to_string(), "95%");
        assert_eq!(Coverage::BOUNDARY.to_string(), "90%");
    }
}

//! Error types for the planning engines.
//!
//! Two error classes are kept apart:
//! - Caller-contract violations (bad bounds, malformed indices, cycles) are
//!   returned as `Err` values from this module.
//! - Algorithmic infeasibility is a normal outcome reported through the
//!   `ok` flag on the delivery results and never appears here.

use thiserror::Error;

use crate::validation::{ValidationError, ValidationErrorKind};

/// Caller errors rejected by the delivery planner before it runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    #[error("demand sequence is empty: at least one period is required")]
    EmptyHorizon,

    #[error("inventory bounds are inverted: minV = {min} > maxV = {max}")]
    InvertedBounds { min: f64, max: f64 },

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}

/// Structural errors rejected by the project scheduler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// The problem failed validation; every detected issue is listed.
    #[error("scheduling problem is invalid: {}", summarize(.0))]
    Invalid(Vec<ValidationError>),

    /// A scheduler configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl SchedulingError {
    /// All validation issues carried by this error.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            Self::InvalidConfig { .. } => &[],
        }
    }

    /// Whether any carried issue has the given kind.
    pub fn has_kind(&self, kind: ValidationErrorKind) -> bool {
        self.errors().iter().any(|e| e.kind == kind)
    }
}

impl From<Vec<ValidationError>> for SchedulingError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Invalid(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_messages() {
        let err = DeliveryError::InvertedBounds { min: 5.0, max: 1.0 };
        assert_eq!(
            err.to_string(),
            "inventory bounds are inverted: minV = 5 > maxV = 1"
        );
        assert!(DeliveryError::EmptyHorizon.to_string().contains("empty"));
    }

    #[test]
    fn test_scheduling_error_summary() {
        let err = SchedulingError::from(vec![
            ValidationError::new(ValidationErrorKind::NoJobs, "no jobs"),
            ValidationError::new(ValidationErrorKind::NoResources, "no resources"),
        ]);
        assert_eq!(err.errors().len(), 2);
        assert!(err.has_kind(ValidationErrorKind::NoResources));
        assert!(!err.has_kind(ValidationErrorKind::CyclicDependency));
        assert!(err.to_string().contains("no jobs (and 1 more)"));
    }

    #[test]
    fn test_config_error_carries_no_issues() {
        let err = SchedulingError::InvalidConfig {
            reason: "passes must be at least 1",
        };
        assert!(err.errors().is_empty());
        assert_eq!(err.to_string(), "invalid config: passes must be at least 1");
    }
}

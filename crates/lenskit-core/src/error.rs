//! Error types for Lenskit Core

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Result type alias using Lenskit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// How far a closure exceeded its object limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowDiagnostic {
    /// The object limit that was exceeded
    pub limit: usize,

    /// Distinct objects counted, always at least `limit + 1`
    pub collected: usize,

    /// The probe ran out of budget, so `collected` is a lower bound
    pub at_least: bool,
}

impl OverflowDiagnostic {
    pub fn exceeded_by(&self) -> usize {
        self.collected.saturating_sub(self.limit)
    }
}

impl std::fmt::Display for OverflowDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let qualifier = if self.at_least { "at least " } else { "" };
        write!(
            f,
            "Snapshot exceeded safety limit of {} objects (collected {}{}, exceeded by {}).",
            self.limit,
            qualifier,
            self.collected,
            self.exceeded_by()
        )
    }
}

impl Serialize for OverflowDiagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OverflowDiagnostic", 4)?;
        state.serialize_field("limit", &self.limit)?;
        state.serialize_field("collected", &self.collected)?;
        state.serialize_field("exceeded_by", &self.exceeded_by())?;
        state.serialize_field("at_least", &self.at_least)?;
        state.end()
    }
}

/// Lenskit error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    ClosureOverflow(OverflowDiagnostic),

    #[error("Fixture export is disabled by configuration")]
    ExportDisabled,

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The overflow diagnostic, if this error is a closure overflow
    pub fn overflow(&self) -> Option<&OverflowDiagnostic> {
        match self {
            Self::ClosureOverflow(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_message() {
        let exact = OverflowDiagnostic {
            limit: 2,
            collected: 5,
            at_least: false,
        };
        assert_eq!(
            Error::ClosureOverflow(exact).to_string(),
            "Snapshot exceeded safety limit of 2 objects (collected 5, exceeded by 3)."
        );

        let bounded = OverflowDiagnostic {
            at_least: true,
            ..exact
        };
        assert!(bounded.to_string().contains("collected at least 5"));
    }

    #[test]
    fn test_overflow_serializes_exceeded_by() {
        let diagnostic = OverflowDiagnostic {
            limit: 10,
            collected: 12,
            at_least: true,
        };
        let value = serde_json::to_value(diagnostic).unwrap();
        assert_eq!(value["exceeded_by"], 2);
        assert_eq!(value["at_least"], true);
    }
}

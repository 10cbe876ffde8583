//! Boundary errors.
//!
//! The kernel itself never fails; these errors are raised only while turning
//! external input (backend JSON, palettes, config files) into kernel input.

use thiserror::Error;

/// Errors raised at the system boundary.
#[derive(Error, Debug)]
pub enum CalibError {
    /// A backend record did not carry one canonical numeric field.
    #[error("malformed record for entity '{entity}', parameter '{parameter}': {reason}")]
    MalformedRecord {
        entity: String,
        parameter: String,
        reason: String,
    },

    /// A palette entry that is not a `#rrggbb` or `#rgb` color.
    #[error("invalid color '{0}': expected #rrggbb or #rgb")]
    InvalidColor(String),

    /// A palette with no colors.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// A config value outside what the layout can index.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalibError {
    /// Creates a malformed-record error.
    pub fn malformed(
        entity: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalibError::MalformedRecord {
            entity: entity.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalibError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_message_names_entity_and_parameter() {
        let err = CalibError::malformed("Q3", "t1", "expected number");
        let msg = err.to_string();
        assert!(msg.contains("'Q3'"));
        assert!(msg.contains("'t1'"));
        assert!(msg.contains("expected number"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CalibError = parse.into();
        assert!(matches!(err, CalibError::Json(_)));
    }
}

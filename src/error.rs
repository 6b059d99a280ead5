//! Error taxonomy for instance loading, solution validation and
//! search configuration.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum FjspError {
    /// The instance is structurally inconsistent (dimensions, or an
    /// operation without any admissible machine).
    #[error("malformed instance: {0}")]
    MalformedInstance(String),

    /// The instance text could not be tokenized.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number in the source text; past the last line for
        /// truncated input.
        line: usize,
        /// What was expected.
        reason: String,
    },

    /// A solution breaks job precedence or machine admissibility.
    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    /// A search parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading an instance file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shorthand result type.
pub type Result<T> = std::result::Result<T, FjspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = FjspError::Parse {
            line: 3,
            reason: "expected 2 durations".into(),
        };
        assert_eq!(e.to_string(), "parse error at line 3: expected 2 durations");

        let e = FjspError::MalformedInstance("no machines".into());
        assert_eq!(e.to_string(), "malformed instance: no machines");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: FjspError = io.into();
        assert!(matches!(e, FjspError::Io(_)));
    }
}

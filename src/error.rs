//! Error types for mutator-math.
//!
//! Every error here is a precondition violation or a misconfiguration. Nothing
//! is retried and nothing degrades into a best-effort value.

use thiserror::Error;

/// The main error type for mutator-math operations.
#[derive(Error, Debug)]
pub enum MutatorError {
    /// No master sits on the resolved bias, so there is nothing to use as neutral.
    #[error("Did not find a neutral for this system (bias {bias})")]
    NoNeutral { bias: String },

    /// Scaling or dividing a location by zero.
    #[error("Division by zero: cannot divide a location by {factor}")]
    ZeroDivision { factor: String },

    /// A user-supplied warp function returned an error.
    #[error("A warp function \"{warp}\" (for axis \"{axis}\") raised \"{source}\" at location {location}")]
    WarpFailed {
        axis: String,
        warp: String,
        location: String,
        #[source]
        source: anyhow::Error,
    },

    /// Split coordinates cannot be used as master or bias locations.
    #[error("Ambivalent location cannot be used as a master: {location}")]
    AmbivalentMaster { location: String },

    /// A master value that can not be combined with the neutral.
    #[error("Master at {location} does not match the neutral: {reason}")]
    IncompatibleMaster { location: String, reason: String },

    /// A coordinate that can not be used numerically.
    #[error("Malformed location value: {axis} = {value}")]
    MalformedLocation { axis: String, value: String },

    /// A design space document that can not be evaluated.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with MutatorError
pub type Result<T> = std::result::Result<T, MutatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warp_failed_message() {
        let err = MutatorError::WarpFailed {
            axis: "c".to_string(),
            warp: "warp_error".to_string(),
            location: "c:-1".to_string(),
            source: anyhow::anyhow!("integer division or modulo by zero"),
        };
        assert_eq!(
            err.to_string(),
            "A warp function \"warp_error\" (for axis \"c\") raised \"integer division or modulo by zero\" at location c:-1"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_incompatible_master_message() {
        let err = MutatorError::IncompatibleMaster {
            location: "pop:1".to_string(),
            reason: "2 values, expected 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Master at pop:1 does not match the neutral: 2 values, expected 3"
        );
    }

    #[test]
    fn test_no_neutral_message() {
        let err = MutatorError::NoNeutral {
            bias: "pop:1".to_string(),
        };
        assert!(err.to_string().starts_with("Did not find a neutral"));
    }
}

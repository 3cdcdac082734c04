//! Error types for QuoteDesk

use thiserror::Error;

/// Main error type for QuoteDesk
#[derive(Error, Debug)]
pub enum QuoteDeskError {
    // Pricing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Rounding policy undefined: {0}")]
    RoundingPolicyUndefined(String),

    // Negotiation errors
    #[error("Invalid negotiation state transition: {0}")]
    InvalidTransition(String),

    #[error("Negotiation not found: {0}")]
    NegotiationNotFound(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for QuoteDesk operations
pub type Result<T> = std::result::Result<T, QuoteDeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = QuoteDeskError::NegotiationNotFound("neg_123".to_string());
        assert_eq!(err.to_string(), "Negotiation not found: neg_123");
    }

    #[test]
    fn test_result_type() {
        fn sample_function() -> Result<u64> {
            Ok(1092)
        }

        let result = sample_function();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 1092);
    }

    #[test]
    fn test_error_conversion() {
        fn io_error_function() -> Result<()> {
            std::fs::read_to_string("/nonexistent/quotedesk.toml")?;
            Ok(())
        }

        let result = io_error_function();
        assert!(matches!(result.unwrap_err(), QuoteDeskError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        fn parse() -> Result<toml::Value> {
            Ok(toml::from_str::<toml::Value>("not = [valid")?)
        }

        assert!(matches!(parse().unwrap_err(), QuoteDeskError::Toml(_)));
    }

    #[test]
    fn test_policy_violation_message() {
        let err =
            QuoteDeskError::PolicyViolation("margin 150.00% outside [5.00%, 15.00%]".to_string());
        assert_eq!(
            err.to_string(),
            "Policy violation: margin 150.00% outside [5.00%, 15.00%]"
        );
    }
}

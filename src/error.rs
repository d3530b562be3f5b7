//! Error types for remote invoice operations.

use std::fmt;

/// A failed attempt that is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No response was received (connection refused, DNS, timeout, ...).
    Network(String),
    /// A response was received with a non-success status code.
    Status(u16),
    /// A success response whose body could not be decoded.
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Status(code) => write!(f, "Server returned status: {}", code),
            TransportError::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Problems with the configured endpoint, detected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No endpoint was configured.
    Missing,
    /// The endpoint is still the setup placeholder.
    Placeholder,
    /// The endpoint does not point at the expected script host.
    UnexpectedPrefix { url: String, expected: String },
    /// The endpoint is not a valid URL.
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing => write!(f, "No endpoint URL configured"),
            ConfigError::Placeholder => {
                write!(f, "Endpoint URL is still the placeholder value")
            }
            ConfigError::UnexpectedPrefix { url, expected } => {
                write!(f, "Endpoint URL '{}' does not start with '{}'", url, expected)
            }
            ConfigError::Malformed(msg) => write!(f, "Endpoint URL is malformed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Terminal outcome of a logical operation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Bad or missing endpoint. No request was sent.
    Configuration(ConfigError),
    /// A required value was empty. No request was sent.
    InvalidInput(String),
    /// The endpoint answered, but rejected the request (e.g. invoice not found).
    Logical(String),
    /// Every attempt failed with a transport error.
    Terminal {
        attempts: usize,
        last: TransportError,
    },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Configuration(e) => write!(f, "Configuration error: {}", e),
            CallError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CallError::Logical(msg) => write!(f, "Request rejected: {}", msg),
            CallError::Terminal { attempts, last } => {
                write!(f, "Failed after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Configuration(e) => Some(e),
            CallError::Terminal { last, .. } => Some(last),
            _ => None,
        }
    }
}

impl From<ConfigError> for CallError {
    fn from(e: ConfigError) -> Self {
        CallError::Configuration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status(500);
        assert_eq!(err.to_string(), "Server returned status: 500");

        let err = TransportError::Network("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = TransportError::Decode("expected value".to_string());
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnexpectedPrefix {
            url: "http://example.com".to_string(),
            expected: "https://script.google.com/".to_string(),
        };
        assert!(err.to_string().contains("http://example.com"));
        assert!(err.to_string().contains("https://script.google.com/"));

        assert!(ConfigError::Placeholder.to_string().contains("placeholder"));
    }

    #[test]
    fn test_call_error_terminal_keeps_last_error_as_source() {
        let err = CallError::Terminal {
            attempts: 3,
            last: TransportError::Status(503),
        };
        assert!(err.to_string().contains("3 attempts"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Server returned status: 503");
    }

    #[test]
    fn test_call_error_from_config_error() {
        let err: CallError = ConfigError::Missing.into();
        assert_eq!(err, CallError::Configuration(ConfigError::Missing));
        assert!(CallError::Logical("not found".into()).source().is_none());
    }
}

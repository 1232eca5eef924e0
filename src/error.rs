//! Error types for the ILS gateway

use std::fmt;
use thiserror::Error;

/// Protocol-level problem envelope reported by the remote system inside an
/// otherwise well-formed response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProblemFault {
    pub problem_type: Option<String>,
    pub detail: Option<String>,
    pub element: Option<String>,
    pub value: Option<String>,
}

impl fmt::Display for ProblemFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref t) = self.problem_type {
            parts.push(format!("ProblemType: {}", t));
        }
        if let Some(ref d) = self.detail {
            parts.push(format!("ProblemDetail: {}", d));
        }
        if let Some(ref e) = self.element {
            parts.push(format!("ProblemElement: {}", e));
        }
        if let Some(ref v) = self.value {
            parts.push(format!("ProblemValue: {}", v));
        }
        if parts.is_empty() {
            write!(f, "unspecified problem")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Main gateway error type
#[derive(Error, Debug)]
pub enum IlsError {
    /// Caller supplied insufficient data, detected before any document is built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not well-formed XML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed response carrying a protocol-level problem envelope
    #[error("Protocol fault: {0}")]
    ProtocolFault(ProblemFault),

    /// Business-rule violation, e.g. a required field missing from an
    /// otherwise valid response
    #[error("ILS error: {0}")]
    Ils(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for gateway operations
pub type IlsResult<T> = Result<T, IlsError>;

//! Error types for the request builder.
//!
//! # Design
//! Only conditions a caller can reasonably react to travel through `Result`:
//! transport failures, status mismatches from the checked send helper, and
//! payload serialization problems. Call-ordering mistakes (appending to an
//! unset base URI, reading a response that does not exist) are programmer
//! errors and panic instead; see the `# Panics` sections on the methods
//! involved. An HTTP error status is neither: 4xx/5xx responses are normal
//! outcomes inspected through `status_code`.

use std::fmt;

/// Errors returned by `RequestBuilder` send operations.
#[derive(Debug)]
pub enum ClientError {
    /// `send` was called before `build` pushed the staged configuration to
    /// the transport.
    NotBuilt,

    /// The exchange could not be completed at all (DNS, connection refused,
    /// TLS failure, timeout). Distinct from an HTTP error status, which is
    /// returned as data.
    Transport(String),

    /// `send_expecting` observed a status other than the required one.
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    /// The request payload could not be serialized to JSON.
    Serialization(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::NotBuilt => {
                write!(f, "send called before build applied the staged configuration")
            }
            ClientError::Transport(msg) => write!(f, "transport failure: {msg}"),
            ClientError::UnexpectedStatus {
                expected,
                actual,
                body,
            } => {
                write!(f, "expected HTTP {expected}, got {actual}: {body}")
            }
            ClientError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

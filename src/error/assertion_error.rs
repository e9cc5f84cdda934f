use std::fmt;

use crate::error::assertion_error_enums::*;

#[derive(Debug, Clone)]
pub struct AssertionError {
    pub kind: AssertionErrorKind,
    pub message: String,
}

impl AssertionError {
    pub fn new(kind: AssertionErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn connection(kind: ConnectionError, message: String) -> Self {
        Self::new(AssertionErrorKind::Connection(kind), message)
    }

    pub fn malformed(kind: MalformedResponseError, message: String) -> Self {
        Self::new(AssertionErrorKind::MalformedResponse(kind), message)
    }

    /// Map an I/O error raised while talking to the server into a connection error.
    pub fn from_io(err: &std::io::Error, context: &str) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::ConnectionRefused => ConnectionError::Refused,
            std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted | std::io::ErrorKind::BrokenPipe => ConnectionError::Reset,
            std::io::ErrorKind::TimedOut => ConnectionError::ReadTimeout,
            _ => ConnectionError::Io,
        };
        Self::connection(kind, format!("{}: {}", context, err))
    }

    /// Short name of the error category, used as the diagnostic kind label.
    pub fn category(&self) -> &'static str {
        match self.kind {
            AssertionErrorKind::Connection(_) => "ConnectionError",
            AssertionErrorKind::MalformedResponse(_) => "MalformedResponseError",
            AssertionErrorKind::ResourceNotFound => "ResourceNotFoundError",
            AssertionErrorKind::Configuration => "ConfigurationError",
            AssertionErrorKind::Redirect => "RedirectError",
        }
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for AssertionError {}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    Status,
    StatusMessage,
    HeaderPresent,
    HeaderAbsent,
    ContentType,
    Body,
    Cookie,
    Connection,
    MalformedResponse,
    ResourceNotFound,
    Configuration,
    Redirect,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Status => "status code",
            CheckKind::StatusMessage => "status message",
            CheckKind::HeaderPresent => "expected header",
            CheckKind::HeaderAbsent => "unexpected header",
            CheckKind::ContentType => "content type",
            CheckKind::Body => "body",
            CheckKind::Cookie => "cookie",
            CheckKind::Connection => "connection",
            CheckKind::MalformedResponse => "malformed response",
            CheckKind::ResourceNotFound => "golden resource",
            CheckKind::Configuration => "configuration",
            CheckKind::Redirect => "redirect",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: CheckKind,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] expected: {} | actual: {}", self.kind, self.expected, self.actual)
    }
}

/// Outcome of one assertion: passed when no diagnostic was recorded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    pub fn pass() -> Self {
        Verdict { diagnostics: Vec::new() }
    }

    /// A failing verdict whose only diagnostic is the error that stopped the assertion.
    pub fn from_error(error: &AssertionError) -> Self {
        let kind = match error.kind {
            AssertionErrorKind::Connection(_) => CheckKind::Connection,
            AssertionErrorKind::MalformedResponse(_) => CheckKind::MalformedResponse,
            AssertionErrorKind::ResourceNotFound => CheckKind::ResourceNotFound,
            AssertionErrorKind::Configuration => CheckKind::Configuration,
            AssertionErrorKind::Redirect => CheckKind::Redirect,
        };
        Verdict {
            diagnostics: vec![Diagnostic {
                kind,
                expected: "no error".to_string(),
                actual: error.to_string(),
            }],
        }
    }

    pub fn add<E: Into<String>, A: Into<String>>(&mut self, kind: CheckKind, expected: E, actual: A) {
        self.diagnostics.push(Diagnostic {
            kind,
            expected: expected.into(),
            actual: actual.into(),
        });
    }

    pub fn has_failed(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn count(&self, kind: CheckKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn report(&self) -> String {
        if !self.has_failed() {
            return "PASS".to_string();
        }
        let mut report = format!("FAIL ({} problem{})", self.diagnostics.len(), if self.diagnostics.len() == 1 { "" } else { "s" });
        for diagnostic in &self.diagnostics {
            report.push_str("\n  ");
            report.push_str(&diagnostic.to_string());
        }
        report
    }
}

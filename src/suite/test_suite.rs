use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assertion::expectation_set::{CookieExpectation, parse_flag};
use crate::assertion::http_assertion::HttpAssertion;
use crate::configuration::run_configuration::RunConfiguration;
use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;

/// A flag written either as a JSON boolean or as one of the legacy strings ("true", "1", ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    pub fn value(&self) -> Result<bool, String> {
        match self {
            Flag::Bool(b) => Ok(*b),
            Flag::Text(text) => parse_flag(text),
        }
    }
}

/// One declarative test case: a literal request plus the expected response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub name: String,
    pub description: Option<String>,
    pub request: String,
    pub status: Option<u16>,
    pub any_status: bool,
    pub status_message: Option<String>,
    pub expect_headers: Option<String>,
    pub unexpected_headers: Option<String>,
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub golden: Option<String>,
    pub expect_lines: Vec<String>,
    pub unexpected_lines: Vec<String>,
    pub expect_empty_body: bool,
    pub exact_match: Option<Flag>,
    pub cookies: Vec<CookieExpectation>,
    pub follow_redirects: bool,
    pub timeout_ms: Option<u64>,
}

impl TestCase {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Test case name cannot be empty".to_string());
        }
        if self.request.trim().is_empty() {
            errors.push(format!("Test case '{}' has no request", self.name));
        }
        if let Some(status) = self.status {
            if !(100..=599).contains(&status) {
                errors.push(format!("Test case '{}' expects an invalid status code {}", self.name, status));
            }
            if self.any_status {
                errors.push(format!("Test case '{}' sets both a status and any_status", self.name));
            }
        }
        if let Some(flag) = &self.exact_match {
            if let Err(e) = flag.value() {
                errors.push(format!("Test case '{}': exact_match {}", self.name, e));
            }
        }
        if self.timeout_ms == Some(0) {
            errors.push(format!("Test case '{}' has a zero timeout", self.name));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn to_assertion(&self, configuration: &RunConfiguration) -> HttpAssertion {
        let mut assertion = HttpAssertion::new(configuration.clone()).description(&self.name).request(&self.request);

        if let Some(status) = self.status {
            assertion = assertion.expect_status(status);
        }
        if self.any_status {
            assertion = assertion.expect_any_status();
        }
        if let Some(message) = &self.status_message {
            assertion = assertion.expect_status_message(message);
        }
        if let Some(headers) = &self.expect_headers {
            assertion = assertion.expect_headers(headers);
        }
        if let Some(headers) = &self.unexpected_headers {
            assertion = assertion.unexpected_headers(headers);
        }
        if let Some(content_type) = &self.content_type {
            assertion = assertion.expect_content_type(content_type);
        }
        if let Some(charset) = &self.charset {
            assertion = assertion.charset(charset);
        }
        if let Some(golden) = &self.golden {
            assertion = assertion.golden_resource(golden);
        }
        if !self.expect_lines.is_empty() {
            assertion = assertion.expect_lines(&self.expect_lines);
        }
        if !self.unexpected_lines.is_empty() {
            assertion = assertion.unexpected_lines(&self.unexpected_lines);
        }
        if self.expect_empty_body {
            assertion = assertion.expect_empty_body();
        }
        match &self.exact_match {
            Some(Flag::Bool(exact)) => assertion = assertion.exact_match(*exact),
            Some(Flag::Text(text)) => assertion = assertion.exact_match_flag(text),
            None => {}
        }
        for cookie in &self.cookies {
            assertion = assertion.expect_cookie(&cookie.name, cookie.value.as_deref());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            assertion = assertion.timeout(std::time::Duration::from_millis(timeout_ms));
        }

        assertion.follow_redirects(self.follow_redirects)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn load(path: &Path) -> Result<Self, AssertionError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssertionError::new(AssertionErrorKind::ResourceNotFound, format!("Failed to read suite file '{}': {}", path.display(), e)))?;
        Self::from_json(&content).map_err(|e| AssertionError::new(AssertionErrorKind::Configuration, format!("Suite file '{}': {}", path.display(), e.message)))
    }

    pub fn from_json(content: &str) -> Result<Self, AssertionError> {
        let suite: TestSuite = serde_json::from_str(content).map_err(|e| AssertionError::new(AssertionErrorKind::Configuration, format!("Failed to parse suite: {}", e)))?;
        suite
            .validate()
            .map_err(|errors| AssertionError::new(AssertionErrorKind::Configuration, errors.join("; ")))?;
        Ok(suite)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.cases.is_empty() {
            errors.push(format!("Suite '{}' has no test cases", self.name));
        }
        for case in &self.cases {
            if let Err(case_errors) = case.validate() {
                errors.extend(case_errors);
            }
        }
        let mut names: Vec<&str> = self.cases.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        for pair in names.windows(2) {
            if pair[0] == pair[1] && !pair[0].is_empty() {
                errors.push(format!("Duplicate test case name: {}", pair[0]));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

use serde::{Deserialize, Serialize};

use crate::http::charset::{charset_of_content_type, media_type_of_content_type};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatusExpectation {
    Exact(u16),
    /// Any status in 200..=399.
    Success,
    Any,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchMode {
    Exact,
    Substring,
}

/// A `name:value` header predicate; without a value only the name is checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderPredicate {
    pub name: String,
    pub value: Option<String>,
}

impl HeaderPredicate {
    pub fn parse(predicate: &str) -> Result<Self, String> {
        let (name, value) = match predicate.split_once(':') {
            Some((n, v)) => (n.trim(), Some(v.trim().to_string())),
            None => (predicate.trim(), None),
        };
        if name.is_empty() {
            return Err(format!("Header predicate {:?} has no header name", predicate));
        }
        Ok(HeaderPredicate { name: name.to_string(), value })
    }

    /// Parse a `|`-separated list such as `Content-Type:text/html|X-Flag`.
    pub fn parse_list(predicates: &str) -> Result<Vec<Self>, String> {
        Self::parse_list_with(predicates, |_| false)
    }

    /// Like [`HeaderPredicate::parse_list`], but a `|name|` pair for which
    /// `is_placeholder(name)` holds stays inside its predicate instead of splitting it.
    pub fn parse_list_with<F>(predicates: &str, is_placeholder: F) -> Result<Vec<Self>, String>
    where
        F: Fn(&str) -> bool,
    {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut rest = predicates;

        while let Some(pos) = rest.find('|') {
            current.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(end) = after.find('|') {
                let name = &after[..end];
                if !name.is_empty() && is_placeholder(name) {
                    current.push('|');
                    current.push_str(name);
                    current.push('|');
                    rest = &after[end + 1..];
                    continue;
                }
            }
            parts.push(std::mem::take(&mut current));
            rest = after;
        }
        current.push_str(rest);
        parts.push(current);

        parts.iter().filter(|p| !p.trim().is_empty()).map(|p| Self::parse(p)).collect()
    }

    pub fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!("{}: {}", self.name, value),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ContentTypeExpectation {
    Any,
    MediaType { media_type: String, charset: Option<String> },
}

impl ContentTypeExpectation {
    pub fn parse(content_type: &str) -> Result<Self, String> {
        let media_type = media_type_of_content_type(content_type);
        if media_type.is_empty() || !media_type.contains('/') {
            return Err(format!("Invalid content type: {:?}", content_type));
        }
        Ok(ContentTypeExpectation::MediaType {
            media_type,
            charset: charset_of_content_type(content_type),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BodyExpectation {
    /// Path of a golden resource, compared according to the match mode.
    Golden(String),
    ContainsLines(Vec<String>),
    ExcludesLines(Vec<String>),
    Empty,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CookieExpectation {
    pub name: String,
    pub value: Option<String>,
}

/// Everything one test expects of a response. Categories left at their
/// defaults are not checked, except the status which defaults to `Success`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSet {
    pub status: StatusExpectation,
    pub status_message: Option<String>,
    pub expect_headers: Vec<HeaderPredicate>,
    pub unexpected_headers: Vec<HeaderPredicate>,
    pub content_type: ContentTypeExpectation,
    pub body: Vec<BodyExpectation>,
    pub match_mode: MatchMode,
    pub cookies: Vec<CookieExpectation>,
    pub charset_override: Option<String>,
    pub follow_redirects: bool,
}

impl Default for ExpectationSet {
    fn default() -> Self {
        ExpectationSet {
            status: StatusExpectation::Success,
            status_message: None,
            expect_headers: Vec::new(),
            unexpected_headers: Vec::new(),
            content_type: ContentTypeExpectation::Any,
            body: Vec::new(),
            match_mode: MatchMode::Exact,
            cookies: Vec::new(),
            charset_override: None,
            follow_redirects: false,
        }
    }
}

/// Convert a legacy string flag ("true", "1", "yes", ...) into a bool.
pub fn parse_flag(flag: &str) -> Result<bool, String> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(format!("Not a boolean flag: {:?}", other)),
    }
}

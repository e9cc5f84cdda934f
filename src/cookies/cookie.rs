use serde::{Deserialize, Serialize};

/// A cookie as handed out in one `Set-Cookie` header, following the Netscape / RFC 2109 model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub version: u8,
    pub comment: Option<String>,
    pub expires: Option<String>,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: None,
            path: None,
            max_age: None,
            secure: false,
            http_only: false,
            version: 0,
            comment: None,
            expires: None,
        }
    }

    /// Render the cookie for a `Cookie:` request header. Version 1 cookies carry
    /// their `$Version`, `$Path` and `$Domain` attributes as RFC 2109 describes.
    /// Values holding separators, whitespace or quotes are sent as quoted strings.
    pub fn to_request_header(&self) -> String {
        if self.version == 0 {
            return format!("{}={}", self.name, quote_if_needed(&self.value));
        }

        let mut header = format!("$Version={}; {}={}", self.version, self.name, quote_if_needed(&self.value));
        if let Some(path) = &self.path {
            header.push_str(&format!("; $Path={}", quote_if_needed(path)));
        }
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; $Domain={}", quote_if_needed(domain)));
        }
        header
    }
}

/// Wrap a value in a quoted string when it would not survive as a bare token.
pub fn quote_if_needed(value: &str) -> String {
    if !value.chars().any(|c| c.is_whitespace() || matches!(c, ';' | ',' | '"' | '\\')) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

use crate::cookies::cookie::Cookie;
use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;

/// One request header. `raw_value` is everything after the colon exactly as written,
/// leading whitespace included. `None` is a bare line without a colon, kept so
/// malformed requests can be sent as written.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestHeader {
    pub name: String,
    pub raw_value: Option<String>,
}

impl RequestHeader {
    pub fn new(name: &str, value: &str) -> Self {
        RequestHeader {
            name: name.to_string(),
            raw_value: Some(format!(" {}", value)),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.raw_value.as_deref().map(str::trim)
    }

    pub fn render(&self) -> String {
        match &self.raw_value {
            Some(raw_value) => format!("{}:{}", self.name, raw_value),
            None => self.name.clone(),
        }
    }
}

/// A literal HTTP request. Nothing is added to it on the way out: no `Host`,
/// no `Content-Length`, no normalisation of casing or header order.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    request_line: String,
    headers: Vec<RequestHeader>,
    body: Option<Vec<u8>>,
    verbatim: Option<Vec<u8>>,
}

impl RequestSpec {
    pub fn new(method: &str, target: &str, version: &str) -> Self {
        let request_line = if version.is_empty() {
            format!("{} {}", method, target)
        } else {
            format!("{} {} {}", method, target, version)
        };
        Self::from_request_line(&request_line)
    }

    pub fn from_request_line(request_line: &str) -> Self {
        RequestSpec {
            request_line: request_line.to_string(),
            headers: Vec::new(),
            body: None,
            verbatim: None,
        }
    }

    /// Parse a literal request text. Head lines may end in `\n` or `\r\n` and are sent with `\r\n`;
    /// everything after the first blank line is the body, sent unchanged.
    pub fn parse(raw: &str) -> Result<Self, AssertionError> {
        let (head, body) = split_head(raw);

        let mut lines = head.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));
        let request_line = lines.next().unwrap_or("");
        if request_line.trim().is_empty() {
            return Err(AssertionError::new(AssertionErrorKind::Configuration, "Request text has no request line".to_string()));
        }

        let mut spec = Self::from_request_line(request_line);
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let header = match line.split_once(':') {
                Some((name, raw_value)) => RequestHeader {
                    name: name.to_string(),
                    raw_value: Some(raw_value.to_string()),
                },
                None => RequestHeader { name: line.to_string(), raw_value: None },
            };
            spec.headers.push(header);
        }

        if let Some(body) = body {
            if !body.is_empty() {
                spec.body = Some(body.as_bytes().to_vec());
            }
        }

        Ok(spec)
    }

    /// A request whose bytes go on the wire exactly as given, line endings included.
    pub fn verbatim(bytes: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&bytes).to_string();
        let mut spec = Self::parse(&text).unwrap_or_else(|_| Self::from_request_line(""));
        spec.verbatim = Some(bytes);
        spec
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push(RequestHeader::new(name, value));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Re-send a cookie the server handed out earlier. Like any added header it
    /// has no effect on a verbatim request.
    pub fn with_cookie(self, cookie: &Cookie) -> Self {
        self.with_header("Cookie", &cookie.to_request_header())
    }

    pub fn request_line(&self) -> &str {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.split_whitespace().next().unwrap_or("")
    }

    pub fn target(&self) -> &str {
        self.request_line.split_whitespace().nth(1).unwrap_or("")
    }

    pub fn version(&self) -> &str {
        self.request_line.split_whitespace().nth(2).unwrap_or("")
    }

    pub fn headers(&self) -> &[RequestHeader] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|h| h.name.eq_ignore_ascii_case(name)).and_then(|h| h.value())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn is_head(&self) -> bool {
        self.method() == "HEAD"
    }

    pub fn is_verbatim(&self) -> bool {
        self.verbatim.is_some()
    }

    pub fn to_wire_bytes(&self) -> Vec<u8> {
        if let Some(bytes) = &self.verbatim {
            return bytes.clone();
        }

        let mut wire = Vec::with_capacity(256);
        wire.extend_from_slice(self.request_line.as_bytes());
        wire.extend_from_slice(b"\r\n");
        for header in &self.headers {
            wire.extend_from_slice(header.render().as_bytes());
            wire.extend_from_slice(b"\r\n");
        }
        wire.extend_from_slice(b"\r\n");
        if let Some(body) = &self.body {
            wire.extend_from_slice(body);
        }
        wire
    }
}

fn split_head(raw: &str) -> (&str, Option<&str>) {
    let crlf = raw.find("\r\n\r\n").map(|p| (p, 4));
    let lf = raw.find("\n\n").map(|p| (p, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match split {
        Some((pos, len)) => (&raw[..pos], Some(&raw[pos + len..])),
        None => (raw.trim_end_matches(['\r', '\n']), None),
    }
}

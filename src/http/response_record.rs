use std::time::Duration;

use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::MalformedResponseError;
use crate::http::charset::{charset_of_content_type, decode_text};
use crate::http::message_framing::{content_length, decode_chunked, find_head_end, is_chunked, skip_interim_responses};
use crate::logging::syslog::{debug, trace};

/// A parsed response, exactly as the server sent it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseRecord {
    pub status_line: String,
    pub version: String,
    pub status_code: u16,
    pub reason: String,
    /// Headers in the order received, names case preserved, duplicates kept.
    pub headers: Vec<(String, String)>,
    /// Body bytes, de-chunked when the response used chunked transfer coding.
    pub body: Vec<u8>,
    pub raw: Vec<u8>,
    pub elapsed: Duration,
}

impl ResponseRecord {
    pub fn parse(raw: Vec<u8>, elapsed: Duration) -> Result<Self, AssertionError> {
        if raw.is_empty() {
            return Err(AssertionError::malformed(MalformedResponseError::Empty, "Server closed the connection without sending a response".to_string()));
        }

        let start = skip_interim_responses(&raw).unwrap_or(0);
        let response = &raw[start..];

        let (head, body_bytes) = match find_head_end(response) {
            Some((head_len, sep_len)) => (&response[..head_len], &response[head_len + sep_len..]),
            None => (response, &response[response.len()..]),
        };

        let mut lines = head.split(|b| *b == b'\n').map(|l| l.strip_suffix(b"\r").unwrap_or(l));
        let status_line = String::from_utf8_lossy(lines.next().unwrap_or(b"")).to_string();
        let (version, status_code, reason) = parse_status_line(&status_line).ok_or_else(|| {
            AssertionError::malformed(MalformedResponseError::InvalidStatusLine, format!("No valid status line in response, got: {:?}", truncate(&status_line, 80)))
        })?;

        let mut headers: Vec<(String, String)> = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            // Obsolete line folding continues the previous header value
            if (line[0] == b' ' || line[0] == b'\t') && !headers.is_empty() {
                if let Some(last) = headers.last_mut() {
                    last.1.push(' ');
                    last.1.push_str(String::from_utf8_lossy(line).trim());
                }
                continue;
            }
            let Some(colon) = line.iter().position(|b| *b == b':') else {
                debug(format!("Skipping response header line without colon: {:?}", String::from_utf8_lossy(line)));
                continue;
            };
            let name = String::from_utf8_lossy(&line[..colon]).trim().to_string();
            let value = String::from_utf8_lossy(&line[colon + 1..]).trim().to_string();
            headers.push((name, value));
        }

        let body = if is_chunked(&headers) {
            match decode_chunked(body_bytes) {
                Ok(Some((decoded, _))) => decoded,
                Ok(None) => {
                    return Err(AssertionError::malformed(MalformedResponseError::InvalidChunkedBody, "Chunked body ended before the last chunk".to_string()));
                }
                Err(e) => return Err(AssertionError::malformed(MalformedResponseError::InvalidChunkedBody, e)),
            }
        } else {
            match content_length(&headers) {
                Some(length) if body_bytes.len() > length => {
                    trace(format!("Response carried {} bytes beyond its Content-Length of {}", body_bytes.len() - length, length));
                    body_bytes[..length].to_vec()
                }
                _ => body_bytes.to_vec(),
            }
        };

        Ok(ResponseRecord {
            status_line,
            version,
            status_code,
            reason,
            headers,
            body,
            raw,
            elapsed,
        })
    }

    /// All values of a header, case-insensitive on the name, in received order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str()).collect()
    }

    pub fn first_header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.first_header("Content-Type")
    }

    pub fn charset(&self) -> Option<String> {
        self.content_type().and_then(charset_of_content_type)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Body as text, decoded with the override charset, else the declared one.
    pub fn body_text(&self, charset_override: Option<&str>) -> String {
        let declared = self.charset();
        let charset = charset_override.or(declared.as_deref());
        decode_text(&self.body, charset)
    }
}

fn parse_status_line(status_line: &str) -> Option<(String, u16, String)> {
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next()?;
    let code = parts.next()?;
    let reason = parts.next().unwrap_or("").trim();

    let digits = version.strip_prefix("HTTP/")?;
    let (major, minor) = digits.split_once('.')?;
    if major.is_empty() || minor.is_empty() || !major.bytes().chain(minor.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((version.to_string(), code.parse().ok()?, reason.to_string()))
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

//! Locating the end of a response head and working out where the body ends,
//! shared by the transport (to know when to stop reading) and the parser.

pub fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Returns `(head_len, separator_len)` for the first blank line, accepting `\r\n\r\n` or a bare `\n\n`.
pub fn find_head_end(data: &[u8]) -> Option<(usize, usize)> {
    let crlf = find_subslice(data, b"\r\n\r\n").map(|p| (p, 4));
    let lf = find_subslice(data, b"\n\n").map(|p| (p, 2));
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Reads the status code out of a status line such as `HTTP/1.1 200 OK`.
pub fn status_code_of(status_line: &[u8]) -> Option<u16> {
    let line = std::str::from_utf8(status_line).ok()?;
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code.parse().ok()
}

/// Split a head into `(name, value)` pairs, skipping the status line.
pub fn head_header_pairs(head: &[u8]) -> Vec<(String, String)> {
    head.split(|b| *b == b'\n')
        .skip(1)
        .filter_map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let colon = line.iter().position(|b| *b == b':')?;
            let name = String::from_utf8_lossy(&line[..colon]).trim().to_string();
            let value = String::from_utf8_lossy(&line[colon + 1..]).trim().to_string();
            Some((name, value))
        })
        .collect()
}

/// Offset of the final (non-1xx) response in the buffer. Interim responses such as
/// `100 Continue` are skipped; `101 Switching Protocols` counts as final.
pub fn skip_interim_responses(data: &[u8]) -> Option<usize> {
    let mut offset = 0;
    loop {
        let rest = &data[offset..];
        let line_end = rest.iter().position(|b| *b == b'\n')?;
        let status_line = rest[..line_end].strip_suffix(b"\r").unwrap_or(&rest[..line_end]);
        match status_code_of(status_line) {
            Some(code) if (100..200).contains(&code) && code != 101 => {
                let (head_len, sep_len) = find_head_end(rest)?;
                offset += head_len + sep_len;
            }
            _ => return Some(offset),
        }
    }
}

/// Decode a chunked body. `Ok(None)` means more data is needed; the second tuple
/// element is the number of bytes consumed including the trailer section.
pub fn decode_chunked(data: &[u8]) -> Result<Option<(Vec<u8>, usize)>, String> {
    let mut decoded = Vec::new();
    let mut pos = 0;

    loop {
        let Some(line_len) = data[pos..].iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };
        let size_line = &data[pos..pos + line_len];
        let size_line = size_line.strip_suffix(b"\r").unwrap_or(size_line);
        let size_text = String::from_utf8_lossy(size_line);
        // Chunk extensions follow a ';'
        let size_hex = size_text.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(|_| format!("Invalid chunk size line: {:?}", size_text))?;
        pos += line_len + 1;

        if size == 0 {
            // Trailer section ends at an empty line
            loop {
                let Some(trailer_len) = data[pos..].iter().position(|b| *b == b'\n') else {
                    return Ok(None);
                };
                let trailer = &data[pos..pos + trailer_len];
                pos += trailer_len + 1;
                if trailer.is_empty() || trailer == b"\r" {
                    return Ok(Some((decoded, pos)));
                }
            }
        }

        let Some(chunk_end) = pos.checked_add(size) else {
            return Err(format!("Chunk size too large: {:?}", size_hex));
        };
        if data.len() < chunk_end {
            return Ok(None);
        }
        decoded.extend_from_slice(&data[pos..chunk_end]);
        pos = chunk_end;

        if data[pos..].starts_with(b"\r\n") {
            pos += 2;
        } else if data[pos..].starts_with(b"\n") {
            pos += 1;
        } else if data.len() - pos < 2 {
            return Ok(None);
        } else {
            return Err("Chunk data is not followed by a line break".to_string());
        }
    }
}

pub fn is_chunked(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .any(|(name, value)| name.eq_ignore_ascii_case("Transfer-Encoding") && value.to_ascii_lowercase().contains("chunked"))
}

pub fn content_length(headers: &[(String, String)]) -> Option<usize> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Whether `data` already holds a complete response, so the reader may stop
/// without waiting for the server to close the connection.
pub fn is_response_complete(data: &[u8], is_head_request: bool) -> bool {
    let Some(start) = skip_interim_responses(data) else {
        return false;
    };
    let response = &data[start..];
    let Some((head_len, sep_len)) = find_head_end(response) else {
        return false;
    };
    let head = &response[..head_len];
    let body = &response[head_len + sep_len..];

    let line_end = head.iter().position(|b| *b == b'\n').unwrap_or(head.len());
    let status_line = head[..line_end].strip_suffix(b"\r").unwrap_or(&head[..line_end]);
    let status = status_code_of(status_line).unwrap_or(0);
    if is_head_request || status == 204 || status == 304 {
        return true;
    }

    let headers = head_header_pairs(head);
    if is_chunked(&headers) {
        return matches!(decode_chunked(body), Ok(Some(_)) | Err(_));
    }
    match content_length(&headers) {
        Some(length) => body.len() >= length,
        None => false,
    }
}

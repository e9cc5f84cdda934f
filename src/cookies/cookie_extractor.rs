use crate::cookies::cookie::Cookie;
use crate::logging::syslog::trace;

/// One cookie per `Set-Cookie` header, in the order the headers were received.
pub fn extract(headers: &[(String, String)]) -> Vec<Cookie> {
    headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Set-Cookie"))
        .map(|(_, value)| parse_set_cookie(value))
        .collect()
}

/// Parse a single `Set-Cookie` value: `name=value` followed by `;`-separated attributes.
pub fn parse_set_cookie(header_value: &str) -> Cookie {
    let mut parts = split_unquoted(header_value, &[';']).into_iter();
    let name_value = parts.next().unwrap_or("").trim();
    let (name, value) = match name_value.split_once('=') {
        Some((n, v)) => (n.trim(), unquote(v.trim())),
        None => (name_value, String::new()),
    };

    let mut cookie = Cookie::new(name, &value);

    for attribute in parts {
        let attribute = attribute.trim();
        if attribute.is_empty() {
            continue;
        }
        let (attr_name, attr_value) = match attribute.split_once('=') {
            Some((n, v)) => (n.trim(), unquote(v.trim())),
            None => (attribute, String::new()),
        };

        match attr_name.to_ascii_lowercase().as_str() {
            "path" => cookie.path = Some(attr_value),
            "domain" => cookie.domain = Some(attr_value),
            "max-age" => match attr_value.parse::<i64>() {
                Ok(max_age) => cookie.max_age = Some(max_age),
                Err(_) => trace(format!("Ignoring invalid Max-Age {:?} on cookie {}", attr_value, cookie.name)),
            },
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "version" => cookie.version = attr_value.parse().unwrap_or(0),
            "comment" => cookie.comment = Some(attr_value),
            "expires" => cookie.expires = Some(attr_value),
            other => trace(format!("Ignoring unknown cookie attribute {:?} on cookie {}", other, cookie.name)),
        }
    }

    cookie
}

/// Parse a `Cookie:` request header back into name/value pairs. `$`-prefixed
/// RFC 2109 attributes are skipped.
pub fn parse_cookie_header(header_value: &str) -> Vec<(String, String)> {
    split_unquoted(header_value, &[';', ','])
        .into_iter()
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() || name.starts_with('$') {
                return None;
            }
            Some((name.to_string(), unquote(value.trim())))
        })
        .collect()
}

/// Split on any of `separators` outside quoted strings.
fn split_unquoted<'a>(text: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if !in_quotes && separators.contains(&c) => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn unquote(value: &str) -> String {
    if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
        return value.to_string();
    }
    let mut unquoted = String::with_capacity(value.len() - 2);
    let mut escaped = false;
    for c in value[1..value.len() - 1].chars() {
        if escaped {
            unquoted.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            unquoted.push(c);
        }
    }
    unquoted
}

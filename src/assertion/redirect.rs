use http::Uri;

use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;
use crate::http::request_spec::RequestSpec;
use crate::http::response_record::ResponseRecord;

/// Where the next hop of a redirect goes.
#[derive(Clone, Debug, PartialEq)]
pub struct RedirectTarget {
    pub host: String,
    pub port: u16,
    pub request: RequestSpec,
}

/// Work out the follow-up request for a 3xx response. `None` when the response
/// is not a redirect or carries no `Location`.
pub fn next_request(host: &str, port: u16, current: &RequestSpec, response: &ResponseRecord) -> Option<Result<RedirectTarget, AssertionError>> {
    if !response.is_redirect() {
        return None;
    }
    let location = response.first_header("Location")?.trim();
    if location.is_empty() {
        return None;
    }
    Some(resolve_location(host, port, current, location))
}

fn resolve_location(host: &str, port: u16, current: &RequestSpec, location: &str) -> Result<RedirectTarget, AssertionError> {
    let (next_host, next_port, target) = if location.starts_with("http://") || location.starts_with("https://") || location.starts_with("//") {
        let absolute = if location.starts_with("//") { format!("http:{}", location) } else { location.to_string() };
        let uri: Uri = absolute
            .parse()
            .map_err(|e| AssertionError::new(AssertionErrorKind::Redirect, format!("Invalid Location {:?}: {}", location, e)))?;
        if uri.scheme_str() == Some("https") {
            return Err(AssertionError::new(AssertionErrorKind::Redirect, format!("Cannot follow redirect to TLS location {}", location)));
        }
        let next_host = uri.host().unwrap_or(host).trim_start_matches('[').trim_end_matches(']').to_string();
        let next_port = uri.port_u16().unwrap_or(80);
        let target = match uri.query() {
            Some(query) => format!("{}?{}", uri.path(), query),
            None => uri.path().to_string(),
        };
        (next_host, next_port, target)
    } else if location.starts_with('/') {
        (host.to_string(), port, location.to_string())
    } else {
        (host.to_string(), port, resolve_relative(current.target(), location))
    };

    let mut request = RequestSpec::new(current.method(), &target, current.version());
    if current.header("Host").is_some() {
        let authority = if next_host == host && next_port == port {
            current.header("Host").unwrap_or(host).to_string()
        } else if next_port == 80 {
            next_host.clone()
        } else {
            format!("{}:{}", next_host, next_port)
        };
        request = request.with_header("Host", &authority);
    }
    if let Some(connection) = current.header("Connection") {
        request = request.with_header("Connection", connection);
    }

    Ok(RedirectTarget {
        host: next_host,
        port: next_port,
        request,
    })
}

/// Resolve a relative reference against the directory of the current target.
fn resolve_relative(current_target: &str, location: &str) -> String {
    let path = current_target.split(['?', '#']).next().unwrap_or("/");
    if location.starts_with('?') {
        return format!("{}{}", path, location);
    }
    let directory = match path.rfind('/') {
        Some(pos) => &path[..=pos],
        None => "/",
    };
    format!("{}{}", directory, location)
}

use std::collections::HashMap;

use crate::assertion::expectation_set::{BodyExpectation, ContentTypeExpectation, ExpectationSet, HeaderPredicate, MatchMode, StatusExpectation};
use crate::assertion::verdict::{CheckKind, Verdict};
use crate::cookies::cookie_extractor::extract;
use crate::golden::golden_resource_loader::GoldenResourceLoader;
use crate::http::charset::{charset_of_content_type, media_type_of_content_type};
use crate::http::response_record::ResponseRecord;
use crate::logging::syslog::trace;
use crate::substitution::variable_substitutor::VariableSubstitutor;

/// Check a response against every configured expectation.
///
/// All checks run and every violation is recorded. The one exception is a golden
/// resource that cannot be loaded: that is a broken test, so the verdict carries
/// only that error.
pub async fn evaluate(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, loader: &GoldenResourceLoader) -> Verdict {
    let mut goldens = HashMap::new();
    for body in &expectations.body {
        if let BodyExpectation::Golden(path) = body {
            let path = substitutor.substitute(path);
            match loader.load(&path).await {
                Ok(content) => {
                    goldens.insert(path, content);
                }
                Err(e) => return Verdict::from_error(&e),
            }
        }
    }

    evaluate_with_goldens(response, expectations, substitutor, &goldens)
}

/// Same as [`evaluate`] with golden contents already loaded, keyed by substituted path.
pub fn evaluate_with_goldens(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, goldens: &HashMap<String, Vec<u8>>) -> Verdict {
    let mut verdict = Verdict::pass();

    check_status(response, expectations, &mut verdict);
    check_expected_headers(response, expectations, substitutor, &mut verdict);
    check_unexpected_headers(response, expectations, substitutor, &mut verdict);
    check_content_type(response, expectations, &mut verdict);
    check_body(response, expectations, substitutor, goldens, &mut verdict);
    check_cookies(response, expectations, substitutor, &mut verdict);

    trace(format!("Evaluated response {} with {} diagnostic(s)", response.status_code, verdict.diagnostics.len()));
    verdict
}

fn check_status(response: &ResponseRecord, expectations: &ExpectationSet, verdict: &mut Verdict) {
    match expectations.status {
        StatusExpectation::Exact(expected) => {
            if response.status_code != expected {
                verdict.add(CheckKind::Status, expected.to_string(), response.status_code.to_string());
            }
        }
        StatusExpectation::Success => {
            if !(200..=399).contains(&response.status_code) {
                verdict.add(CheckKind::Status, "200-399", response.status_code.to_string());
            }
        }
        StatusExpectation::Any => {}
    }

    if let Some(message) = &expectations.status_message {
        if &response.reason != message {
            verdict.add(CheckKind::StatusMessage, message.clone(), response.reason.clone());
        }
    }
}

/// Whether one received header satisfies a predicate under the given match mode.
pub fn header_matches(name: &str, value: &str, predicate: &HeaderPredicate, expected_value: Option<&str>, mode: &MatchMode) -> bool {
    if !name.eq_ignore_ascii_case(predicate.name.trim()) {
        return false;
    }
    match expected_value {
        None => true,
        Some(expected) => match mode {
            MatchMode::Exact => value.trim() == expected.trim(),
            MatchMode::Substring => value.to_lowercase().contains(&expected.trim().to_lowercase()),
        },
    }
}

fn find_matching_header<'a>(response: &'a ResponseRecord, predicate: &HeaderPredicate, expected_value: Option<&str>, mode: &MatchMode) -> Option<&'a (String, String)> {
    response.headers.iter().find(|(name, value)| header_matches(name, value, predicate, expected_value, mode))
}

fn check_expected_headers(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, verdict: &mut Verdict) {
    for predicate in &expectations.expect_headers {
        let expected_value = predicate.value.as_deref().map(|v| substitutor.substitute(v));
        if find_matching_header(response, predicate, expected_value.as_deref(), &expectations.match_mode).is_some() {
            continue;
        }

        let received = response.header_values(&predicate.name);
        let actual = if received.is_empty() {
            format!("no {} header", predicate.name)
        } else {
            received.iter().map(|v| format!("{}: {}", predicate.name, v)).collect::<Vec<_>>().join(", ")
        };
        let expected = match &expected_value {
            Some(v) => format!("{}: {}", predicate.name, v),
            None => predicate.name.clone(),
        };
        verdict.add(CheckKind::HeaderPresent, expected, actual);
    }
}

fn check_unexpected_headers(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, verdict: &mut Verdict) {
    for predicate in &expectations.unexpected_headers {
        let unexpected_value = predicate.value.as_deref().map(|v| substitutor.substitute(v));
        if let Some((name, value)) = find_matching_header(response, predicate, unexpected_value.as_deref(), &expectations.match_mode) {
            let expected = match &unexpected_value {
                Some(v) => format!("no {}: {}", predicate.name, v),
                None => format!("no {} header", predicate.name),
            };
            verdict.add(CheckKind::HeaderAbsent, expected, format!("{}: {}", name, value));
        }
    }
}

fn check_content_type(response: &ResponseRecord, expectations: &ExpectationSet, verdict: &mut Verdict) {
    let ContentTypeExpectation::MediaType { media_type, charset } = &expectations.content_type else {
        return;
    };

    let expected = match charset {
        Some(c) => format!("{}; charset={}", media_type, c),
        None => media_type.clone(),
    };

    let Some(actual) = response.content_type() else {
        verdict.add(CheckKind::ContentType, expected, "no Content-Type header");
        return;
    };

    let media_type_matches = media_type_of_content_type(actual) == media_type.to_ascii_lowercase();
    let charset_matches = match charset {
        Some(expected_charset) => charset_of_content_type(actual).is_some_and(|c| c.eq_ignore_ascii_case(expected_charset)),
        None => true,
    };

    if !media_type_matches || !charset_matches {
        verdict.add(CheckKind::ContentType, expected, actual);
    }
}

fn check_body(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, goldens: &HashMap<String, Vec<u8>>, verdict: &mut Verdict) {
    if expectations.body.is_empty() {
        return;
    }

    let body_text = response.body_text(expectations.charset_override.as_deref());

    for body in &expectations.body {
        match body {
            BodyExpectation::Golden(path) => {
                let path = substitutor.substitute(path);
                let Some(golden) = goldens.get(&path) else {
                    verdict.add(CheckKind::ResourceNotFound, format!("golden resource {}", path), "not loaded");
                    continue;
                };
                match expectations.match_mode {
                    MatchMode::Exact => check_golden_exact(response, &body_text, &path, golden, substitutor, verdict),
                    MatchMode::Substring => check_golden_lines(&body_text, &path, golden, substitutor, verdict),
                }
            }
            BodyExpectation::ContainsLines(lines) => {
                for line in lines {
                    let line = substitutor.substitute(line);
                    if !body_text.contains(&line) {
                        verdict.add(CheckKind::Body, format!("body containing {:?}", line), summarize(&body_text));
                    }
                }
            }
            BodyExpectation::ExcludesLines(lines) => {
                for line in lines {
                    let line = substitutor.substitute(line);
                    if body_text.contains(&line) {
                        verdict.add(CheckKind::Body, format!("body without {:?}", line), summarize(&body_text));
                    }
                }
            }
            BodyExpectation::Empty => {
                if !response.body.is_empty() {
                    verdict.add(CheckKind::Body, "empty body", format!("{} bytes", response.body.len()));
                }
            }
        }
    }
}

fn check_golden_exact(response: &ResponseRecord, body_text: &str, path: &str, golden: &[u8], substitutor: &VariableSubstitutor, verdict: &mut Verdict) {
    let golden = substitutor.substitute_bytes(golden);

    let Ok(golden_text) = std::str::from_utf8(&golden) else {
        // Binary golden: compare bytes as received
        if response.body != golden {
            verdict.add(
                CheckKind::Body,
                format!("{} bytes of {}", golden.len(), path),
                format!("{} bytes that differ", response.body.len()),
            );
        }
        return;
    };

    let expected = normalize_line_endings(golden_text);
    let actual = normalize_line_endings(body_text);
    if expected == actual {
        return;
    }

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let line = (0..expected_lines.len().max(actual_lines.len()))
        .find(|i| expected_lines.get(*i) != actual_lines.get(*i))
        .unwrap_or(0);

    verdict.add(
        CheckKind::Body,
        format!("{} line {}: {:?}", path, line + 1, expected_lines.get(line).copied().unwrap_or("<end of content>")),
        format!("line {}: {:?}", line + 1, actual_lines.get(line).copied().unwrap_or("<end of body>")),
    );
}

fn check_golden_lines(body_text: &str, path: &str, golden: &[u8], substitutor: &VariableSubstitutor, verdict: &mut Verdict) {
    let golden = substitutor.substitute(&String::from_utf8_lossy(golden));
    let missing: Vec<&str> = golden.lines().map(str::trim).filter(|line| !line.is_empty() && !body_text.contains(*line)).collect();

    if !missing.is_empty() {
        verdict.add(
            CheckKind::Body,
            format!("every line of {} somewhere in the body", path),
            format!("missing {} line(s): {:?}", missing.len(), missing),
        );
    }
}

fn check_cookies(response: &ResponseRecord, expectations: &ExpectationSet, substitutor: &VariableSubstitutor, verdict: &mut Verdict) {
    if expectations.cookies.is_empty() {
        return;
    }

    let cookies = extract(&response.headers);
    for expected in &expectations.cookies {
        let expected_value = expected.value.as_deref().map(|v| substitutor.substitute(v));
        let candidates: Vec<_> = cookies.iter().filter(|c| c.name == expected.name).collect();

        let found = match &expected_value {
            Some(value) => candidates.iter().any(|c| &c.value == value),
            None => !candidates.is_empty(),
        };
        if found {
            continue;
        }

        let expected_text = match &expected_value {
            Some(v) => format!("cookie {}={}", expected.name, v),
            None => format!("cookie {}", expected.name),
        };
        let actual = if candidates.is_empty() {
            format!("no cookie {} among [{}]", expected.name, cookies.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "))
        } else {
            candidates.iter().map(|c| format!("{}={}", c.name, c.value)).collect::<Vec<_>>().join(", ")
        };
        verdict.add(CheckKind::Cookie, expected_text, actual);
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim_end_matches('\n').to_string()
}

fn summarize(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        format!("{:?}", body)
    } else {
        format!("{:?}...", body.chars().take(MAX).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::expectation_set::CookieExpectation;
    use crate::configuration::run_configuration::RunConfiguration;
    use std::time::Duration;

    fn response(raw: &str) -> ResponseRecord {
        ResponseRecord::parse(raw.as_bytes().to_vec(), Duration::ZERO).unwrap()
    }

    fn substitutor() -> VariableSubstitutor {
        VariableSubstitutor::from_configuration(&RunConfiguration::for_target("tck.local", 8080))
    }

    fn goldens(path: &str, content: &str) -> HashMap<String, Vec<u8>> {
        HashMap::from([(path.to_string(), content.as_bytes().to_vec())])
    }

    #[test]
    fn test_default_status_range() {
        let expectations = ExpectationSet::default();
        let s = substitutor();
        let none = HashMap::new();
        assert!(!evaluate_with_goldens(&response("HTTP/1.1 302 Found\r\n\r\n"), &expectations, &s, &none).has_failed());
        assert!(evaluate_with_goldens(&response("HTTP/1.1 500 Oops\r\n\r\n"), &expectations, &s, &none).has_failed());

        let any = ExpectationSet {
            status: StatusExpectation::Any,
            ..Default::default()
        };
        assert!(!evaluate_with_goldens(&response("HTTP/1.1 500 Oops\r\n\r\n"), &any, &s, &none).has_failed());
    }

    #[test]
    fn test_status_mismatch_is_single_diagnostic_even_when_body_matches() {
        let expectations = ExpectationSet {
            status: StatusExpectation::Exact(200),
            body: vec![BodyExpectation::Golden("hello.txt".to_string())],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&response("HTTP/1.0 404 Not Found\r\n\r\nhello"), &expectations, &substitutor(), &goldens("hello.txt", "hello"));
        assert_eq!(verdict.diagnostics.len(), 1);
        assert_eq!(verdict.diagnostics[0].kind, CheckKind::Status);
        assert_eq!(verdict.diagnostics[0].expected, "200");
        assert_eq!(verdict.diagnostics[0].actual, "404");
    }

    #[test]
    fn test_status_message() {
        let expectations = ExpectationSet {
            status_message: Some("Not Found".to_string()),
            status: StatusExpectation::Exact(404),
            ..Default::default()
        };
        let s = substitutor();
        assert!(!evaluate_with_goldens(&response("HTTP/1.1 404 Not Found\r\n\r\n"), &expectations, &s, &HashMap::new()).has_failed());
        let verdict = evaluate_with_goldens(&response("HTTP/1.1 404 Missing\r\n\r\n"), &expectations, &s, &HashMap::new());
        assert_eq!(verdict.count(CheckKind::StatusMessage), 1);
    }

    #[test]
    fn test_expected_header_exact_and_substring() {
        let r = response("HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n");
        let mut expectations = ExpectationSet {
            expect_headers: vec![HeaderPredicate::parse("Content-Type:text/html").unwrap()],
            match_mode: MatchMode::Substring,
            ..Default::default()
        };
        assert!(!evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new()).has_failed());

        expectations.match_mode = MatchMode::Exact;
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new());
        assert_eq!(verdict.diagnostics.len(), 1);
        assert_eq!(verdict.diagnostics[0].kind, CheckKind::HeaderPresent);
    }

    #[test]
    fn test_expected_header_any_duplicate_may_match() {
        let r = response("HTTP/1.1 200 OK\r\nMyStrHeader: first\r\nmystrheader: second\r\n\r\n");
        let expectations = ExpectationSet {
            expect_headers: HeaderPredicate::parse_list("MyStrHeader:first|MyStrHeader:second").unwrap(),
            ..Default::default()
        };
        assert!(!evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new()).has_failed());
    }

    #[test]
    fn test_expected_header_values_are_substituted() {
        let r = response("HTTP/1.1 302 Found\r\nLocation: http://tck.local:8080/next\r\n\r\n");
        let expectations = ExpectationSet {
            expect_headers: vec![HeaderPredicate::parse("Location:http://${host}:${port}/next").unwrap()],
            ..Default::default()
        };
        assert!(!evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new()).has_failed());
    }

    #[test]
    fn test_unexpected_header_names_offender() {
        let r = response("HTTP/1.1 200 OK\r\nX-Debug: leaked\r\n\r\n");
        let expectations = ExpectationSet {
            unexpected_headers: vec![HeaderPredicate::parse("X-Debug:leaked").unwrap()],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new());
        assert_eq!(verdict.diagnostics.len(), 1);
        assert_eq!(verdict.diagnostics[0].kind, CheckKind::HeaderAbsent);
        assert_eq!(verdict.diagnostics[0].actual, "X-Debug: leaked");
    }

    #[test]
    fn test_presence_and_absence_are_complementary() {
        let responses = [
            "HTTP/1.1 200 OK\r\nX: Y\r\n\r\n",
            "HTTP/1.1 200 OK\r\nX: y-and-more\r\n\r\n",
            "HTTP/1.1 200 OK\r\nOther: Y\r\n\r\n",
            "HTTP/1.1 200 OK\r\nx: Z\r\nX: Y\r\n\r\n",
        ];
        for mode in [MatchMode::Exact, MatchMode::Substring] {
            for raw in responses {
                let r = response(raw);
                let present = ExpectationSet {
                    expect_headers: vec![HeaderPredicate::parse("X:Y").unwrap()],
                    match_mode: mode.clone(),
                    ..Default::default()
                };
                let absent = ExpectationSet {
                    unexpected_headers: vec![HeaderPredicate::parse("X:Y").unwrap()],
                    match_mode: mode.clone(),
                    ..Default::default()
                };
                let present_failed = evaluate_with_goldens(&r, &present, &substitutor(), &HashMap::new()).has_failed();
                let absent_failed = evaluate_with_goldens(&r, &absent, &substitutor(), &HashMap::new()).has_failed();
                assert_ne!(present_failed, absent_failed, "{:?} {:?}", mode, raw);
            }
        }
    }

    #[test]
    fn test_content_type_check() {
        let r = response("HTTP/1.1 200 OK\r\nContent-Type: text/html;charset=utf-8\r\n\r\n");
        let s = substitutor();
        let none = HashMap::new();

        let ok = ExpectationSet {
            content_type: ContentTypeExpectation::parse("text/html; charset=UTF-8").unwrap(),
            ..Default::default()
        };
        assert!(!evaluate_with_goldens(&r, &ok, &s, &none).has_failed());

        let wrong_charset = ExpectationSet {
            content_type: ContentTypeExpectation::parse("text/html; charset=ISO-8859-1").unwrap(),
            ..Default::default()
        };
        assert_eq!(evaluate_with_goldens(&r, &wrong_charset, &s, &none).count(CheckKind::ContentType), 1);

        let missing = response("HTTP/1.1 200 OK\r\n\r\n");
        let verdict = evaluate_with_goldens(&missing, &ok, &s, &none);
        assert_eq!(verdict.diagnostics[0].actual, "no Content-Type header");

        assert!(!evaluate_with_goldens(&missing, &ExpectationSet::default(), &s, &none).has_failed());
    }

    #[test]
    fn test_golden_exact_ignores_line_ending_differences() {
        let r = response("HTTP/1.1 200 OK\r\n\r\n<html>\r\n<p>tck.local:8080</p>\r\n</html>\r\n");
        let expectations = ExpectationSet {
            body: vec![BodyExpectation::Golden("page.html".to_string())],
            ..Default::default()
        };
        let g = goldens("page.html", "<html>\n<p>${host}:${port}</p>\n</html>\n\n");
        assert!(!evaluate_with_goldens(&r, &expectations, &substitutor(), &g).has_failed());
    }

    #[test]
    fn test_golden_exact_reports_first_differing_line() {
        let r = response("HTTP/1.1 200 OK\r\n\r\nline one\nline 2\nline three");
        let expectations = ExpectationSet {
            body: vec![BodyExpectation::Golden("g.txt".to_string())],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &goldens("g.txt", "line one\nline two\nline three"));
        assert_eq!(verdict.diagnostics.len(), 1);
        assert!(verdict.diagnostics[0].expected.contains("line 2: \"line two\""));
        assert!(verdict.diagnostics[0].actual.contains("line 2: \"line 2\""));
    }

    #[test]
    fn test_golden_compared_to_itself_passes() {
        let content = "<h1>${host}</h1>\r\nvalue |client.ip|\n";
        let s = substitutor();
        let body = s.substitute(content);
        let r = response(&format!("HTTP/1.1 200 OK\r\n\r\n{}", body));
        for mode in [MatchMode::Exact, MatchMode::Substring] {
            let expectations = ExpectationSet {
                body: vec![BodyExpectation::Golden("self.html".to_string())],
                match_mode: mode,
                ..Default::default()
            };
            assert!(!evaluate_with_goldens(&r, &expectations, &s, &goldens("self.html", content)).has_failed());
        }
    }

    #[test]
    fn test_golden_substring_is_order_independent() {
        let r = response("HTTP/1.1 200 OK\r\n\r\n<ul><li>b</li><li>a</li></ul>");
        let expectations = ExpectationSet {
            body: vec![BodyExpectation::Golden("list.html".to_string())],
            match_mode: MatchMode::Substring,
            ..Default::default()
        };
        let s = substitutor();
        assert!(!evaluate_with_goldens(&r, &expectations, &s, &goldens("list.html", "  <li>a</li>\n\n<li>b</li>\n")).has_failed());

        let verdict = evaluate_with_goldens(&r, &expectations, &s, &goldens("list.html", "<li>a</li>\n<li>c</li>\n"));
        assert_eq!(verdict.diagnostics.len(), 1);
        assert!(verdict.diagnostics[0].actual.contains("<li>c</li>"));
    }

    #[test]
    fn test_contains_and_excludes_lines() {
        let r = response("HTTP/1.1 200 OK\r\n\r\nRemoteHost: tck.local\nSecret: none");
        let expectations = ExpectationSet {
            body: vec![
                BodyExpectation::ContainsLines(vec!["RemoteHost: ${host}".to_string(), "Missing".to_string()]),
                BodyExpectation::ExcludesLines(vec!["Secret".to_string(), "Exception".to_string()]),
            ],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new());
        assert_eq!(verdict.count(CheckKind::Body), 2);
        assert!(verdict.diagnostics[0].expected.contains("Missing"));
        assert!(verdict.diagnostics[1].expected.contains("Secret"));
    }

    #[test]
    fn test_empty_body_expectation() {
        let expectations = ExpectationSet {
            body: vec![BodyExpectation::Empty],
            ..Default::default()
        };
        let s = substitutor();
        assert!(!evaluate_with_goldens(&response("HTTP/1.1 204 No Content\r\n\r\n"), &expectations, &s, &HashMap::new()).has_failed());
        assert!(evaluate_with_goldens(&response("HTTP/1.1 200 OK\r\n\r\nx"), &expectations, &s, &HashMap::new()).has_failed());
    }

    #[test]
    fn test_binary_golden_compared_by_bytes() {
        let raw = [b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n".as_slice(), &[0xffu8, 0x00, 0xfe][..]].concat();
        let r = ResponseRecord::parse(raw, Duration::ZERO).unwrap();
        let expectations = ExpectationSet {
            body: vec![BodyExpectation::Golden("blob.bin".to_string())],
            ..Default::default()
        };
        let same = HashMap::from([("blob.bin".to_string(), vec![0xff, 0x00, 0xfe])]);
        assert!(!evaluate_with_goldens(&r, &expectations, &substitutor(), &same).has_failed());
        let different = HashMap::from([("blob.bin".to_string(), vec![0xff, 0x01, 0xfe])]);
        assert!(evaluate_with_goldens(&r, &expectations, &substitutor(), &different).has_failed());
    }

    #[test]
    fn test_cookie_expectations() {
        let r = response("HTTP/1.1 200 OK\r\nSet-Cookie: a=1; Path=/\r\nSet-Cookie: b=2\r\n\r\n");
        let expectations = ExpectationSet {
            cookies: vec![
                CookieExpectation { name: "a".to_string(), value: Some("1".to_string()) },
                CookieExpectation { name: "b".to_string(), value: None },
                CookieExpectation { name: "b".to_string(), value: Some("3".to_string()) },
                CookieExpectation { name: "c".to_string(), value: None },
            ],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new());
        assert_eq!(verdict.count(CheckKind::Cookie), 2);
        assert_eq!(verdict.diagnostics[0].actual, "b=2");
        assert!(verdict.diagnostics[1].actual.contains("no cookie c among [a, b]"));
    }

    #[test]
    fn test_failures_accumulate() {
        let r = response("HTTP/1.1 500 Error\r\nX-Debug: on\r\n\r\nstack trace");
        let expectations = ExpectationSet {
            status: StatusExpectation::Exact(200),
            expect_headers: vec![HeaderPredicate::parse("X-Powered-By").unwrap()],
            unexpected_headers: vec![HeaderPredicate::parse("X-Debug").unwrap()],
            content_type: ContentTypeExpectation::parse("text/plain").unwrap(),
            body: vec![BodyExpectation::ExcludesLines(vec!["stack trace".to_string()])],
            cookies: vec![CookieExpectation { name: "JSESSIONID".to_string(), value: None }],
            ..Default::default()
        };
        let verdict = evaluate_with_goldens(&r, &expectations, &substitutor(), &HashMap::new());
        let kinds: Vec<CheckKind> = verdict.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![CheckKind::Status, CheckKind::HeaderPresent, CheckKind::HeaderAbsent, CheckKind::ContentType, CheckKind::Body, CheckKind::Cookie]
        );
    }

    #[tokio::test]
    async fn test_missing_golden_short_circuits() {
        let r = response("HTTP/1.1 500 Error\r\n\r\n");
        let expectations = ExpectationSet {
            status: StatusExpectation::Exact(200),
            body: vec![BodyExpectation::Golden("nope/missing.html".to_string())],
            ..Default::default()
        };
        let verdict = evaluate(&r, &expectations, &substitutor(), &GoldenResourceLoader::new("./no-such-resource-root")).await;
        assert_eq!(verdict.diagnostics.len(), 1);
        assert_eq!(verdict.diagnostics[0].kind, CheckKind::ResourceNotFound);
    }
}

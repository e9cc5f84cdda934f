use std::time::Duration;

use uuid::Uuid;

use crate::assertion::comparator::evaluate;
use crate::assertion::expectation_set::{BodyExpectation, ContentTypeExpectation, CookieExpectation, ExpectationSet, HeaderPredicate, MatchMode, StatusExpectation, parse_flag};
use crate::assertion::redirect::next_request;
use crate::assertion::verdict::Verdict;
use crate::configuration::run_configuration::RunConfiguration;
use crate::cookies::cookie::Cookie;
use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;
use crate::golden::golden_resource_loader::GoldenResourceLoader;
use crate::http::request_spec::RequestSpec;
use crate::http::response_record::ResponseRecord;
use crate::http::transport::{TransportOptions, send};
use crate::logging::syslog::{debug, info, trace};
use crate::substitution::variable_substitutor::VariableSubstitutor;

#[derive(Clone, Debug)]
enum RequestSource {
    /// Literal request text; placeholders are substituted before parsing.
    Text(String),
    Spec(RequestSpec),
}

/// One request and the response it must produce.
///
/// Built with the setters below, then consumed by [`HttpAssertion::run`]:
///
/// ```ignore
/// let verdict = create_assertion(&configuration)
///     .request("GET /servlet-tests/FooTest HTTP/1.0")
///     .expect_status(200)
///     .golden_resource("servlet/FooTest.html")
///     .run()
///     .await;
/// assert!(!verdict.has_failed(), "{}", verdict.report());
/// ```
#[derive(Clone, Debug)]
pub struct HttpAssertion {
    id: Uuid,
    description: Option<String>,
    configuration: RunConfiguration,
    request: Option<RequestSource>,
    cookies: Vec<Cookie>,
    expectations: ExpectationSet,
    read_timeout: Option<Duration>,
    setup_errors: Vec<String>,
}

/// Factory for an assertion bound to one run configuration.
pub fn create_assertion(configuration: &RunConfiguration) -> HttpAssertion {
    HttpAssertion::new(configuration.clone())
}

impl HttpAssertion {
    pub fn new(configuration: RunConfiguration) -> Self {
        HttpAssertion {
            id: Uuid::new_v4(),
            description: None,
            configuration,
            request: None,
            cookies: Vec::new(),
            expectations: ExpectationSet::default(),
            read_timeout: None,
            setup_errors: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn expectations(&self) -> &ExpectationSet {
        &self.expectations
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn request(mut self, raw: &str) -> Self {
        self.request = Some(RequestSource::Text(raw.to_string()));
        self
    }

    /// Use a prepared request as is; no substitution is applied to it.
    pub fn request_spec(mut self, spec: RequestSpec) -> Self {
        self.request = Some(RequestSource::Spec(spec));
        self
    }

    /// Send a cookie back to the server as a `Cookie:` header.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expectations.status = StatusExpectation::Exact(status);
        self
    }

    pub fn expect_any_status(mut self) -> Self {
        self.expectations.status = StatusExpectation::Any;
        self
    }

    pub fn expect_status_message(mut self, message: &str) -> Self {
        self.expectations.status_message = Some(message.to_string());
        self
    }

    /// `|`-separated `name:value` pairs that must all be present.
    pub fn expect_headers(mut self, predicates: &str) -> Self {
        match self.parse_header_predicates(predicates) {
            Ok(mut list) => self.expectations.expect_headers.append(&mut list),
            Err(e) => self.setup_errors.push(e),
        }
        self
    }

    /// `|`-separated `name:value` pairs none of which may be present.
    pub fn unexpected_headers(mut self, predicates: &str) -> Self {
        match self.parse_header_predicates(predicates) {
            Ok(mut list) => self.expectations.unexpected_headers.append(&mut list),
            Err(e) => self.setup_errors.push(e),
        }
        self
    }

    fn parse_header_predicates(&self, predicates: &str) -> Result<Vec<HeaderPredicate>, String> {
        let substitutor = VariableSubstitutor::from_configuration(&self.configuration);
        HeaderPredicate::parse_list_with(predicates, |name| substitutor.resolve(name).is_some())
    }

    pub fn expect_content_type(mut self, content_type: &str) -> Self {
        match ContentTypeExpectation::parse(content_type) {
            Ok(expectation) => self.expectations.content_type = expectation,
            Err(e) => self.setup_errors.push(e),
        }
        self
    }

    pub fn expected_content_type_is_any(mut self) -> Self {
        self.expectations.content_type = ContentTypeExpectation::Any;
        self
    }

    pub fn golden_resource(mut self, path: &str) -> Self {
        self.expectations.body.push(BodyExpectation::Golden(path.to_string()));
        self
    }

    pub fn expect_lines<S: AsRef<str>>(mut self, lines: &[S]) -> Self {
        self.expectations.body.push(BodyExpectation::ContainsLines(lines.iter().map(|l| l.as_ref().to_string()).collect()));
        self
    }

    pub fn unexpected_lines<S: AsRef<str>>(mut self, lines: &[S]) -> Self {
        self.expectations.body.push(BodyExpectation::ExcludesLines(lines.iter().map(|l| l.as_ref().to_string()).collect()));
        self
    }

    pub fn expect_empty_body(mut self) -> Self {
        self.expectations.body.push(BodyExpectation::Empty);
        self
    }

    pub fn exact_match(mut self, exact: bool) -> Self {
        self.expectations.match_mode = if exact { MatchMode::Exact } else { MatchMode::Substring };
        self
    }

    /// String form of [`HttpAssertion::exact_match`], validated here rather than at comparison time.
    pub fn exact_match_flag(mut self, flag: &str) -> Self {
        match parse_flag(flag) {
            Ok(exact) => self.exact_match(exact),
            Err(e) => {
                self.setup_errors.push(format!("exactMatch: {}", e));
                self
            }
        }
    }

    pub fn expect_cookie(mut self, name: &str, value: Option<&str>) -> Self {
        self.expectations.cookies.push(CookieExpectation {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
        self
    }

    pub fn charset(mut self, charset: &str) -> Self {
        self.expectations.charset_override = Some(charset.to_string());
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.expectations.follow_redirects = follow;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_expectations(mut self, expectations: ExpectationSet) -> Self {
        self.expectations = expectations;
        self
    }

    pub async fn run(self) -> Verdict {
        self.run_with_response().await.0
    }

    /// Send the request, follow redirects if asked to, and evaluate the final response.
    /// The response is returned as well when one was received.
    pub async fn run_with_response(self) -> (Verdict, Option<ResponseRecord>) {
        let label = match &self.description {
            Some(d) => format!("{} ({})", self.id, d),
            None => self.id.to_string(),
        };

        let (verdict, response) = match self.execute().await {
            Ok((verdict, response)) => (verdict, Some(response)),
            Err(e) => {
                debug(format!("Assertion {} stopped: {}", label, e));
                (Verdict::from_error(&e), None)
            }
        };

        if verdict.has_failed() {
            info(format!("Assertion {}: {}", label, verdict.report()));
        } else {
            trace(format!("Assertion {}: PASS", label));
        }

        (verdict, response)
    }

    async fn execute(&self) -> Result<(Verdict, ResponseRecord), AssertionError> {
        if !self.setup_errors.is_empty() {
            return Err(AssertionError::new(AssertionErrorKind::Configuration, self.setup_errors.join("; ")));
        }
        self.configuration
            .validate()
            .map_err(|errors| AssertionError::new(AssertionErrorKind::Configuration, errors.join("; ")))?;

        let substitutor = VariableSubstitutor::from_configuration(&self.configuration);
        let loader = GoldenResourceLoader::new(&self.configuration.resource_root);

        let mut request = match &self.request {
            Some(RequestSource::Text(raw)) => RequestSpec::parse(&substitutor.substitute(raw))?,
            Some(RequestSource::Spec(spec)) => spec.clone(),
            None => return Err(AssertionError::new(AssertionErrorKind::Configuration, "No request was configured".to_string())),
        };
        if request.is_verbatim() && !self.cookies.is_empty() {
            return Err(AssertionError::new(
                AssertionErrorKind::Configuration,
                format!("{} cookie(s) cannot be added to a verbatim request; put the Cookie header in the request bytes", self.cookies.len()),
            ));
        }
        for cookie in &self.cookies {
            request = request.with_cookie(cookie);
        }

        let mut options = TransportOptions::from_configuration(&self.configuration);
        if let Some(read_timeout) = self.read_timeout {
            options.read_timeout = read_timeout;
        }

        let mut host = self.configuration.host.clone();
        let mut port = self.configuration.port;
        let mut response = self.exchange(&host, port, &request, &options).await?;

        if self.expectations.follow_redirects {
            let mut hops = 0u8;
            while let Some(next) = next_request(&host, port, &request, &response) {
                let next = next?;
                if hops >= self.configuration.max_redirects {
                    return Err(AssertionError::new(
                        AssertionErrorKind::Redirect,
                        format!("Gave up after {} redirects, last Location led to {}:{}{}", hops, next.host, next.port, next.request.target()),
                    ));
                }
                hops += 1;
                debug(format!("Following redirect {} to {}:{}{}", hops, next.host, next.port, next.request.target()));
                host = next.host;
                port = next.port;
                request = next.request;
                response = self.exchange(&host, port, &request, &options).await?;
            }
        }

        let verdict = evaluate(&response, &self.expectations, &substitutor, &loader).await;
        Ok((verdict, response))
    }

    async fn exchange(&self, host: &str, port: u16, request: &RequestSpec, options: &TransportOptions) -> Result<ResponseRecord, AssertionError> {
        let exchange = send(host, port, request, options).await?;
        ResponseRecord::parse(exchange.bytes, exchange.elapsed)
    }
}

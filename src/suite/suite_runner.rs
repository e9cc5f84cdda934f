use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assertion::verdict::Verdict;
use crate::configuration::run_configuration::RunConfiguration;
use crate::logging::syslog::{info, warn};
use crate::suite::test_suite::TestSuite;

#[derive(Clone, Debug, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub verdict: Verdict,
    pub elapsed_ms: u128,
}

#[derive(Clone, Debug, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.verdict.has_failed()).count()
    }

    pub fn passed(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn has_failed(&self) -> bool {
        self.failed() > 0
    }

    pub fn render(&self) -> String {
        let mut out = format!("Suite {} started {}\n", self.suite, self.started_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        for result in &self.results {
            out.push_str(&format!("{} [{} ms] {}\n", result.name, result.elapsed_ms, result.verdict.report().replace('\n', "\n    ")));
        }
        out.push_str(&format!("{} total, {} passed, {} failed in {} ms\n", self.total(), self.passed(), self.failed(), self.elapsed_ms));
        out
    }
}

/// Run every case of a suite one after the other, each with its own assertion.
pub async fn run_suite(suite: &TestSuite, configuration: &RunConfiguration) -> SuiteReport {
    let started_at = Utc::now();
    let started = Instant::now();

    // Run configuration values win over suite defaults
    let mut configuration = configuration.clone();
    for (name, value) in &suite.variables {
        configuration.variables.entry(name.clone()).or_insert_with(|| value.clone());
    }

    info(format!("Running suite {} ({} cases) against {}", suite.name, suite.cases.len(), configuration.target_address()));

    let mut results = Vec::with_capacity(suite.cases.len());
    for case in &suite.cases {
        let case_started = Instant::now();
        let verdict = case.to_assertion(&configuration).run().await;
        if verdict.has_failed() {
            warn(format!("{} failed: {}", case.name, verdict.report()));
        }
        results.push(CaseResult {
            name: case.name.clone(),
            verdict,
            elapsed_ms: case_started.elapsed().as_millis(),
        });
    }

    let report = SuiteReport {
        suite: suite.name.clone(),
        started_at,
        elapsed_ms: started.elapsed().as_millis(),
        results,
    };
    info(format!("Suite {}: {} passed, {} failed", report.suite, report.passed(), report.failed()));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::verdict::CheckKind;

    fn report(verdicts: Vec<Verdict>) -> SuiteReport {
        SuiteReport {
            suite: "s".to_string(),
            started_at: Utc::now(),
            elapsed_ms: 3,
            results: verdicts
                .into_iter()
                .enumerate()
                .map(|(i, verdict)| CaseResult {
                    name: format!("case{}", i),
                    verdict,
                    elapsed_ms: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_report_counts() {
        let mut failing = Verdict::pass();
        failing.add(CheckKind::Status, "200", "500");
        let report = report(vec![Verdict::pass(), failing, Verdict::pass()]);

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failed());

        let text = report.render();
        assert!(text.contains("case1 [1 ms] FAIL (1 problem)"));
        assert!(text.contains("3 total, 2 passed, 1 failed"));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_every_case() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let suite = TestSuite::from_json(r#"{ "name": "down", "cases": [ { "name": "a", "request": "GET / HTTP/1.0" }, { "name": "b", "request": "GET /b HTTP/1.0" } ] }"#).unwrap();
        let report = run_suite(&suite, &RunConfiguration::for_target("127.0.0.1", port)).await;

        assert_eq!(report.failed(), 2);
        for result in &report.results {
            assert_eq!(result.verdict.diagnostics.len(), 1);
            assert_eq!(result.verdict.diagnostics[0].kind, CheckKind::Connection);
        }
    }
}

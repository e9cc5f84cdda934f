use std::collections::HashMap;
use std::path::PathBuf;

use http_assert::configuration::load_configuration::{ENV_HOST, ENV_PORT, ENV_RESOURCES, apply_environment, load_configuration_from_file};
use http_assert::configuration::run_configuration::RunConfiguration;
use http_assert::substitution::variable_substitutor::VariableSubstitutor;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources").join(name)
}

fn load_sanitized() -> RunConfiguration {
    let mut configuration = load_configuration_from_file(&resource("run_configuration.json")).unwrap();
    configuration.sanitize();
    configuration
}

#[test]
fn test_file_values_and_defaults() {
    let configuration = load_sanitized();

    assert_eq!(configuration.host, "server.test");
    assert_eq!(configuration.port, 8081);
    assert_eq!(configuration.connect_timeout_ms, 2000);
    assert_eq!(configuration.resource_root, "tests/resources");
    assert_eq!(configuration.log_level, "INFO");

    // Not in the file
    let defaults = RunConfiguration::new();
    assert_eq!(configuration.read_timeout_ms, defaults.read_timeout_ms);
    assert_eq!(configuration.max_redirects, defaults.max_redirects);
    assert_eq!(configuration.client_ip, defaults.client_ip);

    assert!(configuration.validate().is_ok());
}

#[test]
fn test_environment_wins_over_file() {
    let mut configuration = load_sanitized();
    let environment: HashMap<&str, &str> = HashMap::from([(ENV_HOST, "other.test"), (ENV_PORT, "9000"), (ENV_RESOURCES, "/srv/golden")]);

    apply_environment(&mut configuration, |name| environment.get(name).map(|v| v.to_string())).unwrap();

    assert_eq!(configuration.host, "other.test");
    assert_eq!(configuration.port, 9000);
    assert_eq!(configuration.resource_root, "/srv/golden");
    assert_eq!(configuration.variables.len(), 2);
}

#[test]
fn test_configured_variables_feed_substitution() {
    let configuration = load_sanitized();
    let substitutor = VariableSubstitutor::from_configuration(&configuration);

    assert_eq!(substitutor.substitute("GET ${context}/|servlet| HTTP/1.0\nHost: ${host}:${port}"), "GET /servlet-tests/GetHeaderTest HTTP/1.0\nHost: server.test:8081");
}

#[test]
fn test_invalid_file_is_reported() {
    let path = std::env::temp_dir().join(format!("http-assert-config-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, "{ \"port\": \"not a number\" }").unwrap();

    let result = load_configuration_from_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(result.is_err());
}

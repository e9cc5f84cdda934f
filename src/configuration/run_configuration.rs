use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::syslog::LogType;

/// Everything an assertion needs to know about the current test run: where the
/// server under test lives, which address the client speaks from, and where
/// golden resources are stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfiguration {
    pub host: String,
    pub port: u16,
    pub client_ip: String,
    pub client_host: String,
    pub bind_client_address: bool,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub resource_root: String,
    pub max_redirects: u8,
    pub log_level: String,
    pub variables: BTreeMap<String, String>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfiguration {
    pub fn new() -> Self {
        RunConfiguration {
            host: "localhost".to_string(),
            port: 8080,
            client_ip: "127.0.0.1".to_string(),
            client_host: "localhost".to_string(),
            bind_client_address: false,
            connect_timeout_ms: 5_000,
            read_timeout_ms: 30_000,
            resource_root: ".".to_string(),
            max_redirects: 5,
            log_level: "WARN".to_string(),
            variables: BTreeMap::new(),
        }
    }

    pub fn for_target(host: &str, port: u16) -> Self {
        RunConfiguration {
            host: host.to_string(),
            port,
            ..Self::new()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn target_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn sanitize(&mut self) {
        self.host = self.host.trim().to_string();
        self.client_ip = self.client_ip.trim().to_string();
        self.client_host = self.client_host.trim().to_string();
        self.resource_root = self.resource_root.trim().replace('\\', "/");
        while self.resource_root.len() > 1 && self.resource_root.ends_with('/') {
            self.resource_root.pop();
        }
        self.log_level = self.log_level.trim().to_ascii_uppercase();
        self.variables = std::mem::take(&mut self.variables).into_iter().map(|(k, v)| (k.trim().to_string(), v)).collect();
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Host cannot be empty".to_string());
        } else if self.host.contains(char::is_whitespace) || self.host.contains('/') {
            errors.push(format!("Invalid host: {}", self.host));
        }

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.bind_client_address && self.client_ip.parse::<std::net::IpAddr>().is_err() {
            errors.push(format!("Client IP must be a valid IP address when binding is enabled: {}", self.client_ip));
        }

        if self.connect_timeout_ms == 0 {
            errors.push("Connect timeout must be greater than 0".to_string());
        }
        if self.read_timeout_ms == 0 {
            errors.push("Read timeout must be greater than 0".to_string());
        }

        if self.resource_root.is_empty() {
            errors.push("Resource root cannot be empty".to_string());
        }

        if self.max_redirects == 0 {
            errors.push("Max redirects must be at least 1".to_string());
        }

        if LogType::parse(&self.log_level).is_none() {
            errors.push(format!("Unknown log level: {}", self.log_level));
        }

        for name in self.variables.keys() {
            if name.is_empty() {
                errors.push("Variable names cannot be empty".to_string());
            } else if name.contains(['$', '{', '}', '|']) {
                errors.push(format!("Variable name contains placeholder characters: {}", name));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(RunConfiguration::new().validate().is_ok());
    }

    #[test]
    fn test_sanitize_trims_and_normalizes() {
        let mut config = RunConfiguration::new();
        config.host = "  server.local ".to_string();
        config.resource_root = " golden\\files// ".to_string();
        config.log_level = "debug".to_string();
        config.sanitize();

        assert_eq!(config.host, "server.local");
        assert_eq!(config.resource_root, "golden/files");
        assert_eq!(config.log_level, "DEBUG");
    }

    #[test]
    fn test_validate_collects_every_error() {
        let mut config = RunConfiguration::new();
        config.host = "".to_string();
        config.port = 0;
        config.read_timeout_ms = 0;
        config.log_level = "LOUD".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("Host cannot be empty")));
        assert!(errors.iter().any(|e| e.contains("Port cannot be 0")));
        assert!(errors.iter().any(|e| e.contains("Read timeout")));
        assert!(errors.iter().any(|e| e.contains("Unknown log level")));
    }

    #[test]
    fn test_validate_bind_requires_ip() {
        let mut config = RunConfiguration::new();
        config.bind_client_address = true;
        config.client_ip = "not-an-ip".to_string();

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Client IP")));
    }

    #[test]
    fn test_validate_rejects_placeholder_variable_names() {
        let mut config = RunConfiguration::new();
        config.variables.insert("${bad}".to_string(), "x".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RunConfiguration = serde_json::from_str(r#"{ "host": "tck.example", "port": 9090 }"#).unwrap();
        assert_eq!(config.host, "tck.example");
        assert_eq!(config.port, 9090);
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.max_redirects, 5);
    }
}

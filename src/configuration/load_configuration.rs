use std::path::Path;

use crate::configuration::run_configuration::RunConfiguration;
use crate::logging::syslog::{debug, info};

pub const ENV_HOST: &str = "HTTP_ASSERT_HOST";
pub const ENV_PORT: &str = "HTTP_ASSERT_PORT";
pub const ENV_RESOURCES: &str = "HTTP_ASSERT_RESOURCES";
pub const ENV_CLIENT_IP: &str = "HTTP_ASSERT_CLIENT_IP";
pub const ENV_CLIENT_HOST: &str = "HTTP_ASSERT_CLIENT_HOST";

/// Read a run configuration from a JSON file. Missing fields take their defaults.
pub fn load_configuration_from_file(path: &Path) -> Result<RunConfiguration, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("Failed to read configuration file '{}': {}", path.display(), e))?;
    let configuration: RunConfiguration = serde_json::from_str(&content).map_err(|e| format!("Failed to parse configuration file '{}': {}", path.display(), e))?;
    info(format!("Loaded run configuration from {}", path.display()));
    Ok(configuration)
}

/// Override configuration values from environment-style lookups.
pub fn apply_environment<F>(configuration: &mut RunConfiguration, lookup: F) -> Result<(), Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();

    if let Some(host) = lookup(ENV_HOST) {
        debug(format!("{} overrides host with {}", ENV_HOST, host));
        configuration.host = host;
    }
    if let Some(port) = lookup(ENV_PORT) {
        match port.trim().parse::<u16>() {
            Ok(p) => configuration.port = p,
            Err(_) => errors.push(format!("{} is not a valid port: {}", ENV_PORT, port)),
        }
    }
    if let Some(resources) = lookup(ENV_RESOURCES) {
        configuration.resource_root = resources;
    }
    if let Some(client_ip) = lookup(ENV_CLIENT_IP) {
        configuration.client_ip = client_ip;
    }
    if let Some(client_host) = lookup(ENV_CLIENT_HOST) {
        configuration.client_host = client_host;
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Build the run configuration: file (if any), then process environment, then the caller's
/// overrides (command line), then sanitize and validate.
pub fn load_run_configuration<O>(path: Option<&Path>, overrides: O) -> Result<RunConfiguration, Vec<String>>
where
    O: FnOnce(&mut RunConfiguration),
{
    let mut configuration = match path {
        Some(p) => load_configuration_from_file(p).map_err(|e| vec![e])?,
        None => RunConfiguration::new(),
    };

    apply_environment(&mut configuration, |name| std::env::var(name).ok())?;
    overrides(&mut configuration);
    configuration.sanitize();
    configuration.validate()?;

    Ok(configuration)
}

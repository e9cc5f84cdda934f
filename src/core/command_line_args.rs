use std::{path::PathBuf, sync::OnceLock};

use clap::{Arg, ArgMatches, Command};

use crate::configuration::run_configuration::RunConfiguration;
use crate::logging::syslog::LogType;

pub fn build_command() -> Command {
    Command::new("http-assert")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a suite of raw HTTP assertions against a server")
        .arg(
            Arg::new("suite")
                .short('s')
                .long("suite")
                .help("Suite file (JSON) with the test cases to run")
                .required(true)
                .value_parser(validate_existing_file),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Run configuration file (JSON)")
                .value_parser(validate_existing_file),
        )
        .arg(Arg::new("host").long("host").help("Target host, overrides configuration and environment"))
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Target port, overrides configuration and environment")
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new("resources")
                .short('r')
                .long("resources")
                .help("Root directory of the golden resources")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .help("Log level (OFF, ERROR, WARN, INFO, DEBUG, TRACE or 0-5, any case)")
                .value_parser(validate_log_level),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log lines to this file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the suite report as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn load_command_line_args() -> ArgMatches {
    build_command().get_matches()
}

fn validate_existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("Path does not exist: {}", s));
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", s));
    }
    Ok(path)
}

/// Accepts any case and the numeric levels, normalized to the upper-case name.
fn validate_log_level(s: &str) -> Result<String, String> {
    LogType::parse(s).map(|level| level.to_string()).ok_or_else(|| format!("Unknown log level: {}", s))
}

pub fn cmd_get_suite_path(cli: &ArgMatches) -> Option<PathBuf> {
    cli.get_one::<PathBuf>("suite").cloned()
}

pub fn cmd_get_config_path(cli: &ArgMatches) -> Option<PathBuf> {
    cli.get_one::<PathBuf>("config").cloned()
}

pub fn cmd_get_log_file(cli: &ArgMatches) -> Option<PathBuf> {
    cli.get_one::<PathBuf>("log-file").cloned()
}

pub fn cmd_should_print_json(cli: &ArgMatches) -> bool {
    cli.get_flag("json")
}

/// Command line values are applied last and win over file and environment.
pub fn apply_command_line_overrides(cli: &ArgMatches, configuration: &mut RunConfiguration) {
    if let Some(host) = cli.get_one::<String>("host") {
        configuration.host = host.clone();
    }
    if let Some(port) = cli.get_one::<u16>("port") {
        configuration.port = *port;
    }
    if let Some(resources) = cli.get_one::<PathBuf>("resources") {
        configuration.resource_root = resources.to_string_lossy().to_string();
    }
    if let Some(level) = cli.get_one::<String>("log-level") {
        configuration.log_level = level.clone();
    }
}

static COMMAND_LINE_ARGS_SINGLETON: OnceLock<ArgMatches> = OnceLock::new();

pub fn get_command_line_args() -> &'static ArgMatches {
    COMMAND_LINE_ARGS_SINGLETON.get_or_init(load_command_line_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_file() -> String {
        // Cargo.toml is always present at the package root during tests
        format!("{}/Cargo.toml", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_suite_is_required() {
        assert!(build_command().try_get_matches_from(["http-assert"]).is_err());
    }

    #[test]
    fn test_missing_suite_file_is_rejected() {
        let result = build_command().try_get_matches_from(["http-assert", "--suite", "/definitely/not/here.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_applied() {
        let suite = existing_file();
        let cli = build_command()
            .try_get_matches_from(["http-assert", "--suite", &suite, "--host", "server.test", "-p", "9090", "--resources", "/srv/golden", "--log-level", "DEBUG", "--json"])
            .unwrap();

        let mut configuration = RunConfiguration::new();
        apply_command_line_overrides(&cli, &mut configuration);

        assert_eq!(configuration.host, "server.test");
        assert_eq!(configuration.port, 9090);
        assert_eq!(configuration.resource_root, "/srv/golden");
        assert_eq!(configuration.log_level, "DEBUG");
        assert!(cmd_should_print_json(&cli));
        assert_eq!(cmd_get_suite_path(&cli), Some(PathBuf::from(&suite)));
        assert_eq!(cmd_get_config_path(&cli), None);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let suite = existing_file();
        assert!(build_command().try_get_matches_from(["http-assert", "--suite", &suite, "--port", "0"]).is_err());
        assert!(build_command().try_get_matches_from(["http-assert", "--suite", &suite, "--port", "70000"]).is_err());
    }

    #[test]
    fn test_log_level_accepts_any_case_and_numbers() {
        let suite = existing_file();
        for (given, expected) in [("debug", "DEBUG"), ("Warn", "WARN"), ("4", "DEBUG"), ("0", "OFF"), ("TRACE", "TRACE")] {
            let cli = build_command().try_get_matches_from(["http-assert", "--suite", &suite, "--log-level", given]).unwrap();
            let mut configuration = RunConfiguration::new();
            apply_command_line_overrides(&cli, &mut configuration);
            assert_eq!(configuration.log_level, expected, "level {}", given);
        }

        assert!(build_command().try_get_matches_from(["http-assert", "--suite", &suite, "--log-level", "loud"]).is_err());
        assert!(build_command().try_get_matches_from(["http-assert", "--suite", &suite, "-l", "9"]).is_err());
    }

    #[test]
    fn test_no_overrides_keeps_configuration() {
        let suite = existing_file();
        let cli = build_command().try_get_matches_from(["http-assert", "--suite", &suite]).unwrap();
        let mut configuration = RunConfiguration::new();
        apply_command_line_overrides(&cli, &mut configuration);
        assert_eq!(configuration, RunConfiguration::new());
    }
}

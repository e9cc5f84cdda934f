use http_assert::configuration::load_configuration::load_run_configuration;
use http_assert::core::command_line_args::{apply_command_line_overrides, cmd_get_config_path, cmd_get_log_file, cmd_get_suite_path, cmd_should_print_json, get_command_line_args};
use http_assert::logging::syslog::{LogType, error, flush_logs, info, set_log_file, set_log_level, set_stdout_log_level};
use http_assert::suite::suite_runner::run_suite;
use http_assert::suite::test_suite::TestSuite;

fn main() {
    let cli = get_command_line_args();

    let configuration = match load_run_configuration(cmd_get_config_path(cli).as_deref(), |c| apply_command_line_overrides(cli, c)) {
        Ok(configuration) => configuration,
        Err(errors) => {
            for e in errors {
                error(format!("Configuration error: {}", e));
            }
            flush_logs();
            std::process::exit(2);
        }
    };

    // Validated above, so the level is known
    let log_level = LogType::parse(&configuration.log_level).unwrap_or(LogType::Warn);
    set_log_level(log_level);
    set_stdout_log_level(log_level);
    if let Some(path) = cmd_get_log_file(cli) {
        if let Err(e) = set_log_file(&path.to_string_lossy()) {
            error(format!("Failed to open log file: {}", e));
            std::process::exit(2);
        }
    }

    info(format!("Starting http-assert {}", env!("CARGO_PKG_VERSION")));

    let Some(suite_path) = cmd_get_suite_path(cli) else {
        error("No suite file given");
        std::process::exit(2);
    };
    let suite = match TestSuite::load(&suite_path) {
        Ok(suite) => suite,
        Err(e) => {
            error(format!("{}", e));
            flush_logs();
            std::process::exit(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error(format!("Failed to start async runtime: {}", e));
            std::process::exit(2);
        }
    };
    let report = runtime.block_on(run_suite(&suite, &configuration));

    if cmd_should_print_json(cli) {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error(format!("Failed to serialize report: {}", e)),
        }
    } else {
        print!("{}", report.render());
    }

    flush_logs();
    if report.has_failed() {
        std::process::exit(1);
    }
}

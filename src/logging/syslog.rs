use chrono::Utc;
use std::fmt;
use std::sync::{LazyLock, RwLock};

use crate::logging::buffered_log::BufferedLog;

pub struct SysLog {
    pub buffered_log: BufferedLog,
    // Log level for the log file
    log_level: LogType,
    // Log level for stdout
    stdout_log_level: LogType,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LogType {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogType::Error => write!(f, "ERROR"),
            LogType::Info => write!(f, "INFO"),
            LogType::Warn => write!(f, "WARN"),
            LogType::Debug => write!(f, "DEBUG"),
            LogType::Trace => write!(f, "TRACE"),
            LogType::Off => write!(f, "OFF"),
        }
    }
}

impl LogType {
    /// Parse a level name, also accepting the numeric debug levels older suites use ("0" = off .. "5" = trace).
    pub fn parse(level: &str) -> Option<LogType> {
        match level.trim().to_ascii_uppercase().as_str() {
            "OFF" | "0" => Some(LogType::Off),
            "ERROR" | "1" => Some(LogType::Error),
            "WARN" | "2" => Some(LogType::Warn),
            "INFO" | "3" => Some(LogType::Info),
            "DEBUG" | "4" => Some(LogType::Debug),
            "TRACE" | "5" => Some(LogType::Trace),
            _ => None,
        }
    }
}

impl SysLog {
    pub fn new(log_level: LogType, stdout_log_level: LogType) -> Self {
        SysLog {
            buffered_log: BufferedLog::new("syslog".to_string()),
            log_level,
            stdout_log_level,
        }
    }

    fn is_enabled(level: LogType, entry_type: LogType) -> bool {
        entry_type != LogType::Off && level as u8 >= entry_type as u8
    }

    pub fn add_log(&self, log_type: LogType, log: String) {
        let to_file = Self::is_enabled(self.log_level, log_type);
        let to_stdout = Self::is_enabled(self.stdout_log_level, log_type);
        if !to_file && !to_stdout {
            return;
        }

        let ts = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
        let log_entry = format!("{} - [{}] {}", &ts, &log_type, &log);

        if to_stdout {
            println!("{}", &log_entry);
        }
        if to_file {
            self.buffered_log.add_log(log_entry);
        }
    }
}

pub static SYS_LOG: LazyLock<RwLock<SysLog>> = LazyLock::new(|| RwLock::new(SysLog::new(LogType::Info, LogType::Warn)));

pub fn set_log_level(new_log_level: LogType) {
    if let Ok(mut sys_log) = SYS_LOG.write() {
        sys_log.buffered_log.consider_flush(true);
        sys_log.log_level = new_log_level;
    }
}

pub fn set_stdout_log_level(new_log_level: LogType) {
    if let Ok(mut sys_log) = SYS_LOG.write() {
        sys_log.stdout_log_level = new_log_level;
    }
}

pub fn set_log_file(full_file_path: &str) -> Result<(), String> {
    let mut sys_log = SYS_LOG.write().map_err(|e| format!("Failed to acquire log write lock: {}", e))?;
    sys_log
        .buffered_log
        .set_log_file(full_file_path.to_string())
        .map_err(|e| format!("Failed to create log file '{}': {}", full_file_path, e))
}

pub fn flush_logs() {
    if let Ok(sys_log) = SYS_LOG.read() {
        sys_log.buffered_log.consider_flush(true);
    }
}

fn add_log(log_type: LogType, log: String) {
    if let Ok(sys_log) = SYS_LOG.read() {
        sys_log.add_log(log_type, log);
    }
}

pub fn error<S: Into<String>>(log: S) {
    add_log(LogType::Error, log.into());
}

pub fn warn<S: Into<String>>(log: S) {
    add_log(LogType::Warn, log.into());
}

pub fn info<S: Into<String>>(log: S) {
    add_log(LogType::Info, log.into());
}

pub fn debug<S: Into<String>>(log: S) {
    add_log(LogType::Debug, log.into());
}

pub fn trace<S: Into<String>>(log: S) {
    add_log(LogType::Trace, log.into());
}

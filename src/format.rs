use chrono::{DateTime, Local};
use log::{Level, Record};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const FG_RED: &str = "\x1b[31m";
const UNDERLINE: &str = "\x1b[4m";

pub const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S";
pub const FILE_TIME_FORMAT: &str = "%m/%d %H:%M:%S";

/// Colored marker placed in front of console lines for warnings and errors.
/// Every other level is printed without escape codes.
pub fn level_prefix(level: Level) -> Option<String> {
    match level {
        Level::Warn => Some(format!("{FG_RED}WARNING{RESET}")),
        Level::Error => Some(format!("{UNDERLINE}{FG_RED}ERROR{RESET}")),
        Level::Info | Level::Debug | Level::Trace => None,
    }
}

pub fn console_line(record: &Record, now: &DateTime<Local>) -> String {
    let body = body(record, now, CONSOLE_TIME_FORMAT);
    match level_prefix(record.level()) {
        Some(prefix) => format!("{prefix} {body}"),
        None => body,
    }
}

pub fn file_line(record: &Record, now: &DateTime<Local>) -> String {
    body(record, now, FILE_TIME_FORMAT)
}

fn body(record: &Record, now: &DateTime<Local>, time_format: &str) -> String {
    format!(
        "{} {}:{:>4}: {}",
        now.format(time_format),
        source_file_name(record.file()),
        record.line().unwrap_or(0),
        record.args()
    )
}

fn source_file_name(file: Option<&str>) -> &str {
    file.and_then(|f| Path::new(f).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
}

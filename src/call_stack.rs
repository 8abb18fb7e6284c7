use std::backtrace::Backtrace;
use std::fmt;
use std::fs;
use std::panic::Location;
use std::path::PathBuf;

use crate::logger::trace;

/// Symbols that belong to the runtime or to this crate's own setup path.
const SKIPPED_FUNCTIONS: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "<std::",
    "<core::",
    "<alloc::",
    "test::",
    "<F as ",
    "__rust",
    "_start",
    "__libc_start",
    "script_utils::call_stack::",
    "script_utils::setup::common_setup",
];

const SKIPPED_FILE_PREFIXES: &[&str] = &["/rustc/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: Option<String>,
    pub file: PathBuf,
    pub line: u32,
}

impl Frame {
    fn from_location(location: &Location<'_>) -> Self {
        Self {
            function: None,
            file: resolve(PathBuf::from(location.file())),
            line: location.line(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, line {}", self.file.display(), self.line)
    }
}

/// Frames leading to `caller`, outermost first.
///
/// Relies on debug info; when the backtrace has no usable frames the result is
/// just the caller's own location.
pub fn capture(caller: &Location<'_>) -> Vec<Frame> {
    let backtrace = Backtrace::force_capture();
    let mut frames = parse(&backtrace.to_string());
    trace!("call_stack: {} user frame(s) resolved", frames.len());
    if frames.is_empty() {
        frames.push(Frame::from_location(caller));
    }
    frames
}

pub fn render(frames: &[Frame]) -> String {
    frames
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the textual form of a std backtrace:
///
/// ```text
///    3: train::main
///              at ./src/main.rs:12:5
/// ```
fn parse(text: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut function: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            let Some(name) = function.take() else {
                continue;
            };
            if let Some((file, line_no)) = split_location(location) {
                if keep(&name, &file) {
                    frames.push(Frame {
                        function: Some(name),
                        file: resolve(PathBuf::from(file)),
                        line: line_no,
                    });
                }
            }
        } else if !line.is_empty() {
            let name = match line.split_once(": ") {
                Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => rest,
                _ => line,
            };
            function = Some(name.to_string());
        }
    }

    frames.reverse();
    frames
}

/// Splits `path:line:column` (column optional).
fn split_location(location: &str) -> Option<(String, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;
    match (parts.next(), middle.parse::<u32>()) {
        (Some(file), Ok(line)) if last.parse::<u32>().is_ok() => Some((file.to_string(), line)),
        _ => {
            let line = last.parse::<u32>().ok()?;
            let file = location.rsplit_once(':')?.0;
            Some((file.to_string(), line))
        }
    }
}

fn keep(function: &str, file: &str) -> bool {
    !SKIPPED_FUNCTIONS
        .iter()
        .any(|prefix| function.starts_with(prefix))
        && !SKIPPED_FILE_PREFIXES
            .iter()
            .any(|prefix| file.starts_with(prefix))
}

fn resolve(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

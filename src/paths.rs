use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Format used for the timestamp suffix, e.g. `Oct17-09-05-03`.
pub const TIMESTAMP_FORMAT: &str = "%b%d-%H-%M-%S";

const LOG_EXTENSION: &str = "log";
const GIT_STATE_EXTENSION: &str = "git-state";
const FALLBACK_NAME: &str = "script";

/// Appends the current local time to the file stem, keeping the extension.
///
/// `out/train.log` becomes `out/train_Oct17-09-05-03.log`.
pub fn add_time_to_path(path: impl AsRef<Path>) -> PathBuf {
    add_time_to_path_at(path, Local::now())
}

pub fn add_time_to_path_at(path: impl AsRef<Path>, now: DateTime<Local>) -> PathBuf {
    let path = path.as_ref();
    let mut name: OsString = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_");
    name.push(now.format(TIMESTAMP_FORMAT).to_string());
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Turns a script identifier (a bare name or a path such as `file!()`) into a
/// log file name. Only the final component is kept and `.log` is appended unless
/// the name already ends with it.
pub fn log_file_name(identifier: impl AsRef<Path>) -> String {
    let name = identifier
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    if name.rsplit('.').next() == Some(LOG_EXTENSION) {
        name
    } else {
        format!("{name}.{LOG_EXTENSION}")
    }
}

/// Location of the version-control snapshot that accompanies a log file.
pub fn git_state_path(log_file: impl AsRef<Path>) -> PathBuf {
    log_file.as_ref().with_extension(GIT_STATE_EXTENSION)
}

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::logger::{debug, warn};

pub const SCRIPT_NAME: &str = "save_git_state.sh";

/// Overrides the directory that holds [`SCRIPT_NAME`].
pub const GIT_STATE_DIR_ENV: &str = "SCRIPT_UTILS_GIT_STATE_DIR";

/// `$SCRIPT_UTILS_GIT_STATE_DIR`, else the crate's `git-state/` directory, whose
/// location is fixed at build time.
pub fn default_script_dir() -> PathBuf {
    env::var_os(GIT_STATE_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("git-state"))
}

/// Runs `<script_dir>/save_git_state.sh <destination>`.
///
/// Best effort: neither a failed spawn nor a non-zero exit is reported to the
/// caller.
pub fn save_git_state(script_dir: &Path, destination: &Path) {
    let script = script_dir.join(SCRIPT_NAME);
    debug!(
        "save_git_state: running {} {}",
        script.display(),
        destination.display()
    );
    match Command::new(&script).arg(destination).status() {
        Ok(status) if status.success() => {}
        Ok(status) => debug!("save_git_state: {} exited with {}", script.display(), status),
        Err(err) => warn!("could not run {}: {}", script.display(), err),
    }
}

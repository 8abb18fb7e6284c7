use std::env;
use std::fmt::Debug;
use std::panic::Location;
use std::path::{Path, PathBuf};

use crate::call_stack;
use crate::error::Result;
use crate::git_state::{default_script_dir, save_git_state};
use crate::logger::{debug, info, setup_logging, FileLogger, LogOptions};
use crate::paths::{add_time_to_path, git_state_path, log_file_name};

#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub log: LogOptions,
    /// Run the git-state script next to the log file.
    pub save_git_state: bool,
    /// Directory holding `save_git_state.sh`.
    pub git_state_dir: PathBuf,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            log: LogOptions::default(),
            save_git_state: true,
            git_state_dir: default_script_dir(),
        }
    }
}

/// Common setup for programs that write their results into a directory.
///
/// Logs to the console and to `<output_dir>/<name>_<timestamp>.log`, records
/// where it was called from, optionally snapshots the git state next to the log
/// file, and dumps `args` plus the full command line.
///
/// ```no_run
/// use script_utils::{common_setup, SetupOptions};
///
/// # fn main() -> script_utils::Result<()> {
/// let file_logger = common_setup(file!(), "out", None, &SetupOptions::default())?;
/// file_logger.info("only in the log file");
/// # Ok(())
/// # }
/// ```
#[track_caller]
pub fn common_setup(
    identifier: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    args: Option<&dyn Debug>,
    options: &SetupOptions,
) -> Result<FileLogger> {
    let caller = Location::caller();
    let log_file = add_time_to_path(output_dir.as_ref().join(log_file_name(identifier)));
    let file_logger = setup_logging(&log_file, &options.log)?;

    let frames = call_stack::capture(caller);
    info!("Called common_setup from:\n{}", call_stack::render(&frames));

    if options.save_git_state {
        save_git_state(&options.git_state_dir, &git_state_path(&log_file));
    }

    if let Some(args) = args {
        info!("Args:\n{:#?}", args);
        debug!("Full command:\n{}", format_command_line(env::args()));
    }

    Ok(file_logger)
}

/// Joins argv into a copy-pasteable command, starting a new shell line before
/// every flag.
pub fn format_command_line<I, S>(argv: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    argv.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.starts_with('-') {
                format!("\\\n{arg}")
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

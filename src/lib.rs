#![doc = include_str!("../README.md")]

pub mod call_stack;
pub mod cli;
pub mod error;
pub mod format;
pub mod git_state;
pub mod logger;
pub mod paths;
pub mod setup;

pub use error::{Error, Result};
pub use git_state::save_git_state;
pub use logger::{
    setup_logging, ColorChoice, ConsoleStream, FileLogger, LogOptions, LogScope, FILE_ONLY_TARGET,
};
pub use paths::{add_time_to_path, git_state_path, log_file_name};
pub use setup::{common_setup, format_command_line, SetupOptions};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, SetupArgs};
use log::Log;
use std::io::{self, Write};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

pub fn run_with_cli(cli: Cli) -> Result<()> {
    match &cli.cmd {
        Commands::Stamp(opts) => {
            println!("{}", add_time_to_path(&opts.path).display());
            Ok(())
        }
        Commands::Setup(opts) => run_setup(&cli, opts),
        Commands::Completions(opts) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(opts.shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_setup(cli: &Cli, opts: &SetupArgs) -> Result<()> {
    let options = SetupOptions {
        log: LogOptions {
            console_level: opts.console_level,
            file_level: opts.file_level,
            color: opts.color.into(),
            ..LogOptions::default()
        },
        save_git_state: !opts.no_git_state,
        git_state_dir: opts
            .git_state_dir
            .clone()
            .unwrap_or_else(git_state::default_script_dir),
    };

    let file_logger = common_setup(&opts.name, &opts.output_dir, Some(cli), &options)?;
    for message in &opts.message {
        logger::info!("{}", message);
    }
    log::logger().flush();

    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "{}", file_logger.path().display());
    let _ = stdout.flush();
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    static GLOBAL_LOGGER: Mutex<()> = Mutex::new(());

    /// Serializes tests that reconfigure the process-wide logger.
    pub(crate) fn global_logger_lock() -> MutexGuard<'static, ()> {
        GLOBAL_LOGGER.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StampOptions;

    #[test]
    fn stamp_command_succeeds() {
        let cli = Cli {
            cmd: Commands::Stamp(StampOptions {
                path: "out/run.log".into(),
            }),
        };
        assert!(run_with_cli(cli).is_ok());
    }

    #[test]
    fn setup_command_reports_missing_output_dir() {
        let _lock = test_support::global_logger_lock();
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "script-utils",
            "setup",
            "--output-dir",
            dir.path().join("absent").to_str().unwrap(),
            "--no-git-state",
        ]);
        assert!(matches!(run_with_cli(cli), Err(Error::Io { .. })));
    }
}

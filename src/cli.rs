use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::LevelFilter;
use std::path::PathBuf;

use crate::logger::ColorChoice;

#[derive(Parser, Debug)]
#[command(
    name = "script-utils",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a path with the current time appended to its stem
    Stamp(StampOptions),
    /// Create a timestamped log file, log the invocation and print its path
    Setup(SetupArgs),
    /// Generate shell completions
    Completions(CompletionsOptions),
}

#[derive(Args, Debug)]
pub struct StampOptions {
    /// Path to stamp (e.g. out/train.log)
    #[arg(name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Directory that receives the log file (must exist)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Script name or path used to name the log file
    #[arg(short, long, default_value = "script")]
    pub name: String,

    /// Skip running save_git_state.sh
    #[arg(long)]
    pub no_git_state: bool,

    /// Directory containing save_git_state.sh
    #[arg(long, value_name = "DIR")]
    pub git_state_dir: Option<PathBuf>,

    /// Minimum level shown on the console
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub console_level: LevelFilter,

    /// Minimum level written to the log file
    #[arg(long, value_name = "LEVEL", default_value = "debug")]
    pub file_level: LevelFilter,

    /// When to color warnings and errors on the console
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Message to log after setup (repeatable)
    #[arg(short, long, value_name = "MSG")]
    pub message: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsOptions {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from<I, T>(items: I) -> Cli
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::parse_from(items)
    }

    #[test]
    fn parse_stamp_with_path() {
        let cli = parse_from(["script-utils", "stamp", "out/train.log"]);
        match cli.cmd {
            Commands::Stamp(opts) => assert_eq!(opts.path, PathBuf::from("out/train.log")),
            other => panic!("expected stamp command, got {:?}", other),
        }
    }

    #[test]
    fn parse_setup_defaults() {
        let cli = parse_from(["script-utils", "setup", "--output-dir", "runs"]);
        match cli.cmd {
            Commands::Setup(opts) => {
                assert_eq!(opts.output_dir, PathBuf::from("runs"));
                assert_eq!(opts.name, "script");
                assert!(!opts.no_git_state);
                assert_eq!(opts.console_level, LevelFilter::Info);
                assert_eq!(opts.file_level, LevelFilter::Debug);
                assert_eq!(opts.color, ColorArg::Auto);
                assert!(opts.message.is_empty());
            }
            other => panic!("expected setup command, got {:?}", other),
        }
    }

    #[test]
    fn parse_setup_with_levels_and_messages() {
        let cli = parse_from([
            "script-utils",
            "setup",
            "-o",
            "runs",
            "--name",
            "train.sh",
            "--no-git-state",
            "--console-level",
            "warn",
            "--file-level",
            "trace",
            "--color",
            "always",
            "-m",
            "first",
            "--message",
            "second",
        ]);
        match cli.cmd {
            Commands::Setup(opts) => {
                assert_eq!(opts.name, "train.sh");
                assert!(opts.no_git_state);
                assert_eq!(opts.console_level, LevelFilter::Warn);
                assert_eq!(opts.file_level, LevelFilter::Trace);
                assert_eq!(opts.color, ColorArg::Always);
                assert_eq!(opts.message, vec!["first", "second"]);
            }
            other => panic!("expected setup command, got {:?}", other),
        }
    }
}

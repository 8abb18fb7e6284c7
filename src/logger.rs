//! Process-wide logging to the console and a log file.
//!
//! A single dispatcher is registered with the `log` facade the first time
//! [`setup_logging`] runs. Every later call swaps the dispatcher's sinks, so the
//! console and the file each receive one copy of a record no matter how often
//! setup happens.

use chrono::Local;
use env_logger::{Builder, Env, Logger, Target, WriteStyle};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{Error, Result};
use crate::format;

/// Records with this target are written to the log file only.
pub const FILE_ONLY_TARGET: &str = "script_utils::file_only";

/// Filter directives (env_logger syntax) that refine the console sink.
pub const CONSOLE_FILTER_ENV: &str = "SCRIPT_UTILS_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogScope {
    /// Every record reaches the log file.
    #[default]
    Global,
    /// Only records whose target starts with the prefix reach the log file.
    /// The console still shows everything.
    Target(String),
}

impl LogScope {
    fn includes(&self, target: &str) -> bool {
        match self {
            LogScope::Global => true,
            LogScope::Target(prefix) => target.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for WriteStyle {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => WriteStyle::Auto,
            ColorChoice::Always => WriteStyle::Always,
            ColorChoice::Never => WriteStyle::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stderr,
    Stdout,
}

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub console_level: LevelFilter,
    pub file_level: LevelFilter,
    pub scope: LogScope,
    pub color: ColorChoice,
    pub console_stream: ConsoleStream,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: LevelFilter::Debug,
            scope: LogScope::Global,
            color: ColorChoice::Auto,
            console_stream: ConsoleStream::Stderr,
        }
    }
}

struct Sinks {
    console: Logger,
    file: Arc<Logger>,
    scope: LogScope,
}

impl Sinks {
    fn routes_to_file(&self, target: &str) -> bool {
        target == FILE_ONLY_TARGET || self.scope.includes(target)
    }
}

struct Dispatcher {
    sinks: RwLock<Option<Sinks>>,
}

static DISPATCHER: Dispatcher = Dispatcher {
    sinks: RwLock::new(None),
};

static INSTALLED: Mutex<bool> = Mutex::new(false);

impl Log for Dispatcher {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let guard = self.sinks.read().unwrap_or_else(|err| err.into_inner());
        let Some(sinks) = guard.as_ref() else {
            return false;
        };
        let to_file = sinks.routes_to_file(metadata.target()) && sinks.file.enabled(metadata);
        let to_console = metadata.target() != FILE_ONLY_TARGET && sinks.console.enabled(metadata);
        to_file || to_console
    }

    fn log(&self, record: &Record) {
        let guard = self.sinks.read().unwrap_or_else(|err| err.into_inner());
        let Some(sinks) = guard.as_ref() else {
            return;
        };
        if sinks.routes_to_file(record.target()) {
            sinks.file.log(record);
        }
        if record.target() != FILE_ONLY_TARGET {
            sinks.console.log(record);
        }
    }

    fn flush(&self) {
        let guard = self.sinks.read().unwrap_or_else(|err| err.into_inner());
        if let Some(sinks) = guard.as_ref() {
            sinks.console.flush();
            sinks.file.flush();
        }
    }
}

/// Routes all `log` records to the console and to `log_file`.
///
/// The file is created (or truncated). Previous sinks are dropped rather than
/// merged, so calling this repeatedly never duplicates output. Returns a
/// [`FileLogger`] whose records skip the console.
pub fn setup_logging(log_file: impl AsRef<Path>, options: &LogOptions) -> Result<FileLogger> {
    let target = match options.console_stream {
        ConsoleStream::Stderr => Target::Stderr,
        ConsoleStream::Stdout => Target::Stdout,
    };
    setup_logging_to(log_file.as_ref(), options, target)
}

pub(crate) fn setup_logging_to(
    log_file: &Path,
    options: &LogOptions,
    console_target: Target,
) -> Result<FileLogger> {
    let file = File::create(log_file).map_err(|source| Error::Io {
        path: log_file.to_path_buf(),
        source,
    })?;

    install()?;

    let console = console_sink(options, console_target);
    let file = Arc::new(file_sink(options, file));
    let max_level = console.filter().max(file.filter());

    {
        let mut guard = DISPATCHER
            .sinks
            .write()
            .unwrap_or_else(|err| err.into_inner());
        if let Some(previous) = guard.take() {
            previous.console.flush();
            previous.file.flush();
        }
        *guard = Some(Sinks {
            console,
            file: Arc::clone(&file),
            scope: options.scope.clone(),
        });
    }
    log::set_max_level(max_level);

    log::info!("Writing log file to {}", log_file.display());
    Ok(FileLogger {
        path: log_file.to_path_buf(),
        sink: file,
    })
}

fn install() -> Result<()> {
    let mut installed = INSTALLED.lock().unwrap_or_else(|err| err.into_inner());
    if !*installed {
        log::set_logger(&DISPATCHER)?;
        *installed = true;
    }
    Ok(())
}

fn console_sink(options: &LogOptions, target: Target) -> Logger {
    let mut builder = Builder::new();
    builder
        .filter_level(options.console_level)
        .parse_env(Env::new().filter(CONSOLE_FILTER_ENV))
        .write_style(options.color.into())
        .target(target)
        .format(|buf, record| writeln!(buf, "{}", format::console_line(record, &Local::now())));
    builder.build()
}

fn file_sink(options: &LogOptions, file: File) -> Logger {
    let mut builder = Builder::new();
    builder
        .filter_level(options.file_level)
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| writeln!(buf, "{}", format::file_line(record, &Local::now())));
    builder.build()
}

/// Handle for messages that belong in the log file but not on the console,
/// such as large diffs or dumps. The file level still applies.
///
/// The handle stays bound to the file it was created for, even after a later
/// setup points the global logger elsewhere.
#[derive(Clone)]
pub struct FileLogger {
    path: PathBuf,
    sink: Arc<Logger>,
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileLogger {
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments) {
        let caller = Location::caller();
        self.sink.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(FILE_ONLY_TARGET)
                .module_path_static(Some(module_path!()))
                .file(Some(caller.file()))
                .line(Some(caller.line()))
                .build(),
        );
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, format_args!("{message}"));
    }

    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, format_args!("{message}"));
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, format_args!("{message}"));
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, format_args!("{message}"));
    }

    #[track_caller]
    pub fn trace(&self, message: impl Display) {
        self.log(Level::Trace, format_args!("{message}"));
    }
}

/// Re-export logging macros
#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};

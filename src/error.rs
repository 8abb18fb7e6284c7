use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open log file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("another global logger is already installed: {0}")]
    LoggerInstalled(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;

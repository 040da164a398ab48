use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0} must be provided")]
    MissingField(&'static str),
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

impl AdapterError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AdapterError::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bundle input {} does not exist", .0.display())]
    MissingInput(PathBuf),
    #[error("bundler command is empty")]
    EmptyCommand,
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("failed to prepare bundle output: {0}")]
    Output(#[source] io::Error),
}

use std::io;
use std::path::PathBuf;

/// Errors that can occur during npm-runner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to find script: '{0}'")]
    ScriptNotFound(String),

    #[error("No scripts are defined")]
    NoScripts,

    #[error("No directories found to run 'npm {0}'")]
    NoDirectories(String),

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send {signal} to process {pid}: {message}")]
    Signal {
        pid: u32,
        signal: String,
        message: String,
    },

    #[error("Process {0} is not tracked")]
    UnknownProcess(u32),

    #[error("Killing is only supported when the setting 'run_in_terminal' is 'false'")]
    TerminalMode,

    #[error("Invalid installed-module report: {0}")]
    Report(#[source] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for npm-runner operations
pub type Result<T> = std::result::Result<T, Error>;

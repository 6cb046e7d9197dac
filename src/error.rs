use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockerGenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid project directory '{path}': {reason}")]
    InvalidProject { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed entry '{entry}' in {source_name}: expected KEY=VALUE")]
    MalformedEntry { source_name: String, entry: String },

    #[error("Cannot read env file {path}: {reason}")]
    UnreadableEnvFile { path: PathBuf, reason: String },

    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Configuration parsing failed: {0}")]
    ParsingFailed(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("environment variable {var} is not set")]
    MissingApiKey { var: String },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("response contained no completion text")]
    EmptyCompletion,

    #[error("response is missing the {0} section")]
    MissingArtifact(String),
}

impl DockerGenError {
    /// Process exit code for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            DockerGenError::Config(_) => 2,
            DockerGenError::Auth(_) => 3,
            DockerGenError::Api(_) => 4,
            DockerGenError::Timeout { .. } => 5,
            DockerGenError::Io(_)
            | DockerGenError::Output { .. }
            | DockerGenError::InvalidProject { .. } => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, DockerGenError>;

use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Upstream answered with a non-success HTTP status.
    Upstream { status: u16 },
    Transport(String),
    Timeout(String),
    Internal(String),
    ConfigError(String),
    IoError(String),
}

impl AppError {
    /// Upstream status code, only for `Upstream`.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upstream { status } => {
                write!(f, "Upstream error: HTTP status {}", status)
            }
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

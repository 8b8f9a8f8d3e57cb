use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::core::config::ConfigError;
use crate::core::credentials::CredentialError;
use crate::core::mode::{InvalidModeError, TemplateError};

/// Conditions that end the process before or outside the chat loop.
#[derive(Debug)]
pub enum StartupError {
    Credentials(CredentialError),
    Config(ConfigError),
    InvalidMode(InvalidModeError),
    Template(TemplateError),
    Client(reqwest::Error),
    Io(io::Error),
}

impl StartupError {
    pub fn quick_fixes(&self) -> &'static [&'static str] {
        match self {
            StartupError::Credentials(err) => err.quick_fixes(),
            _ => &[],
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Credentials(err) => write!(f, "{err}"),
            StartupError::Config(err) => write!(f, "{err}"),
            StartupError::InvalidMode(err) => write!(f, "{err}"),
            StartupError::Template(err) => write!(f, "{err}"),
            StartupError::Client(err) => write!(f, "Failed to build HTTP client: {err}"),
            StartupError::Io(err) => write!(f, "Terminal I/O failed: {err}"),
        }
    }
}

impl StdError for StartupError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StartupError::Credentials(err) => Some(err),
            StartupError::Config(err) => Some(err),
            StartupError::InvalidMode(err) => Some(err),
            StartupError::Template(err) => Some(err),
            StartupError::Client(err) => Some(err),
            StartupError::Io(err) => Some(err),
        }
    }
}

impl From<CredentialError> for StartupError {
    fn from(err: CredentialError) -> Self {
        StartupError::Credentials(err)
    }
}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        StartupError::Config(err)
    }
}

impl From<InvalidModeError> for StartupError {
    fn from(err: InvalidModeError) -> Self {
        StartupError::InvalidMode(err)
    }
}

impl From<TemplateError> for StartupError {
    fn from(err: TemplateError) -> Self {
        StartupError::Template(err)
    }
}

impl From<reqwest::Error> for StartupError {
    fn from(err: reqwest::Error) -> Self {
        StartupError::Client(err)
    }
}

impl From<io::Error> for StartupError {
    fn from(err: io::Error) -> Self {
        StartupError::Io(err)
    }
}

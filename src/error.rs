// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Errors surfaced by the crate.
///
/// The tracking engine itself never errors at runtime: degenerate inputs
/// (invalid duration, absent element, missing content id) are ordinary
/// boundary conditions handled by predicates. `Error` exists for the
/// configuration layer, where file I/O and TOML parsing can fail.
#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use std::time::SystemTimeError;

use thiserror::Error;

use crate::profile::{ProfileField, ProfileId};

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<ProfileField> },
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("Profile {0} not found")]
    NotFound(ProfileId),
    #[error("Profile {0} already exists")]
    DuplicateId(ProfileId),
    #[error("Coordinates must be two finite numbers")]
    InvalidCoordinates,
    #[error("Another edit is still being saved")]
    SessionBusy,
    #[error("No profile is being edited")]
    NoActiveSession,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of a single address lookup.
///
/// Both variants are recoverable: the edit session goes back to
/// editing with the draft untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("No location matches address {0:?}")]
    NoMatch(String),
    #[error("Geocoding request failed: {0}")]
    Transport(String),
}

fn join_fields(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport(format!("malformed response: {}", e))
    }
}

impl From<toml::de::Error> for DirectoryError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<url::ParseError> for DirectoryError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid endpoint: {}", e))
    }
}

impl From<SystemTimeError> for DirectoryError {
    fn from(value: SystemTimeError) -> Self {
        Self::Other(anyhow::anyhow!(value.to_string()))
    }
}

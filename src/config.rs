use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DirectoryError, Result};

pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
pub const DEFAULT_ENDPOINT: &str =
    "https://api.mapbox.com/geocoding/v5/mapbox.places";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings of the geocoding service.
///
/// Read from a TOML file such as
///
/// ```toml
/// access_token = "pk.123"
/// endpoint = "https://api.mapbox.com/geocoding/v5/mapbox.places"
/// timeout_secs = 5
/// ```
///
/// Only `access_token` is required. A configuration without a token is
/// rejected when it is loaded, never at lookup time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl GeocoderConfig {
    pub fn new<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
            endpoint: default_endpoint(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GeocoderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from a TOML file. The token may be left
    /// out of the file and supplied through the environment instead.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let mut config: GeocoderConfig = toml::from_str(&content)?;
        if config.access_token.trim().is_empty() {
            if let Ok(token) = env::var(ACCESS_TOKEN_ENV) {
                config.access_token = token;
            }
        }
        config.validate()?;

        log::info!(
            "geocoder configured from {}",
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Configuration with the default endpoint and the token taken from
    /// `MAPBOX_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let token = env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            DirectoryError::Config(format!("{} is not set", ACCESS_TOKEN_ENV))
        })?;
        let config = Self::new(token);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(DirectoryError::Config(
                "geocoding access token is missing".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(DirectoryError::Config(
                "timeout_secs must be positive".to_owned(),
            ));
        }
        self.endpoint_url()?;
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)?;
        if url.cannot_be_a_base() {
            return Err(DirectoryError::Config(format!(
                "endpoint {} cannot hold a path",
                self.endpoint
            )));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_defaults_fill_optional_keys() {
        let config =
            GeocoderConfig::from_toml_str("access_token = \"pk.test\"")
                .unwrap();
        assert_eq!(config, GeocoderConfig::new("pk.test"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = GeocoderConfig::from_toml_str("timeout_secs = 3")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));

        let err = GeocoderConfig::from_toml_str("access_token = \"  \"")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn test_bad_endpoint_is_rejected() {
        let err = GeocoderConfig::from_toml_str(
            "access_token = \"pk\"\nendpoint = \"not a url\"",
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = GeocoderConfig::from_toml_str(
            "access_token = \"pk\"\ntimeout_secs = 0",
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let path = temp_dir.path().join("geocoder.toml");
        fs::write(
            &path,
            "access_token = \"pk.file\"\nendpoint = \"http://localhost:9000/geo\"\ntimeout_secs = 2\n",
        )
        .unwrap();

        let config = GeocoderConfig::load(&path).unwrap();
        assert_eq!(config.access_token, "pk.file");
        assert_eq!(config.endpoint, "http://localhost:9000/geo");
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let err =
            GeocoderConfig::load(temp_dir.path().join("absent.toml"))
                .unwrap_err();
        match err {
            DirectoryError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

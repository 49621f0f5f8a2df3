use std::future::Future;

use reqwest::header::HeaderValue;
use serde::Deserialize;
use url::Url;

use crate::config::GeocoderConfig;
use crate::profile::Coordinates;
use crate::{DirectoryError, GeocodeError, Result};

const LOG_PREFIX: &str = "[geocoder]";
const USER_AGENT: &str =
    concat!("profile-directory/", env!("CARGO_PKG_VERSION"));

/// Turns a free-text address into coordinates.
pub trait Geocoder {
    fn resolve(
        &self,
        address: &str,
    ) -> impl Future<Output = std::result::Result<Coordinates, GeocodeError>>
           + Send;
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    center: Coordinates,
}

/// Pick the first candidate of a forward-geocoding response body.
pub fn parse_response(
    address: &str,
    body: &str,
) -> std::result::Result<Coordinates, GeocodeError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(address.to_owned()))?;

    if !feature.center.is_valid() {
        return Err(GeocodeError::Transport(
            "malformed response: center is not finite".to_owned(),
        ));
    }
    Ok(feature.center)
}

/// Client of the Mapbox forward-geocoding API.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    endpoint: Url,
    access_token: String,
}

impl MapboxGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        config.validate()?;

        let mut header = reqwest::header::HeaderMap::new();
        header.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        let client = reqwest::Client::builder()
            .default_headers(header)
            .timeout(config.timeout())
            .build()
            .map_err(|e| DirectoryError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
            access_token: config.access_token.clone(),
        })
    }

    /// `{endpoint}/{address}.json?access_token=...` with the address
    /// percent-encoded as a single path segment.
    pub fn request_url(
        &self,
        address: &str,
    ) -> std::result::Result<Url, GeocodeError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GeocodeError::Transport(format!(
                    "endpoint {} cannot hold a path",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push(&format!("{}.json", address));
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }
}

impl Geocoder for MapboxGeocoder {
    async fn resolve(
        &self,
        address: &str,
    ) -> std::result::Result<Coordinates, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::NoMatch(String::new()));
        }

        let url = self.request_url(address)?;
        log::debug!("{} resolving {:?}", LOG_PREFIX, address);

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let result = parse_response(address, &body);
        match &result {
            Ok(coordinates) => log::debug!(
                "{} {:?} resolved to {}",
                LOG_PREFIX,
                address,
                coordinates
            ),
            Err(e) => log::warn!("{} {}", LOG_PREFIX, e),
        }
        result
    }
}

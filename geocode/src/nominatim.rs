use std::time::Duration;

use log::debug;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};

use crate::{Address, GeocodeError, ReverseGeocoder};

/// Settings for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance, without the `/reverse` path.
    pub endpoint: String,
    /// User agent sent with every request. Public instances reject anonymous clients.
    pub user_agent: String,
    /// Preferred language for place names (`accept-language`).
    pub language: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_owned(),
            user_agent: concat!(
                "venuekit / ",
                env!("CARGO_PKG_VERSION"),
                " (Rust; https://github.com/water-rs/venuekit)"
            )
            .to_owned(),
            language: None,
            timeout_secs: 10,
        }
    }
}

/// Reverse geocoder backed by a Nominatim `/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
}

impl NominatimGeocoder {
    /// Builds the HTTP client for the given configuration.
    ///
    /// # Errors
    /// Returns [`GeocodeError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Parses a `format=jsonv2` reverse response.
    ///
    /// Nominatim reports "nothing here" as a 200 with an `error` field, which
    /// maps to an empty list.
    ///
    /// # Errors
    /// Returns [`GeocodeError::Decode`] if the body is not a reverse response.
    pub fn parse_response(body: &[u8]) -> Result<Vec<Address>, GeocodeError> {
        let response: ReverseResponse = serde_json::from_slice(body)?;
        if let Some(error) = response.error {
            debug!("nominatim has no address here: {error}");
            return Ok(Vec::new());
        }
        let Some(address) = response.address else {
            return Ok(Vec::new());
        };

        Ok(vec![Address {
            city: first_of([
                address.city,
                address.town,
                address.village,
                address.municipality,
            ]),
            district: first_of([address.city_district, address.suburb, address.borough]),
            subregion: first_of([address.county, address.state_district]),
            name: first_of([response.name]),
            postal_code: first_of([address.postcode]),
            region: first_of([address.state]),
            country: first_of([address.country]),
        }])
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Address>, GeocodeError> {
        let url = format!("{}/reverse", self.config.endpoint.trim_end_matches('/'));
        let mut request = self.client.get(url).query(&[
            ("format", "jsonv2".to_owned()),
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("addressdetails", "1".to_owned()),
        ]);
        if let Some(language) = &self.config.language {
            request = request.header(header::ACCEPT_LANGUAGE, language);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }
        Self::parse_response(&response.bytes().await?)
    }
}

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    city_district: Option<String>,
    suburb: Option<String>,
    borough: Option<String>,
    county: Option<String>,
    state_district: Option<String>,
    postcode: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

fn first_of<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

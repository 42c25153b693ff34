use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

/// Reverse-geocoding client for a Nominatim-compatible endpoint.
///
/// The request timeout bounds the whole call; callers fall back to a
/// coordinate string when this returns an error.
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: ReverseAddress,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl GeocodingClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent("ember-matchmaking")
            .build()
            .map_err(|e| format!("failed to build geocoding client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, String> {
        let url = format!("{}/reverse", self.base_url);
        let response = self.client
            .get(&url)
            .query(&[("format", "jsonv2")])
            .query(&[("lat", latitude), ("lon", longitude)])
            .send()
            .await
            .map_err(|e| format!("reverse geocoding request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("reverse geocoding API error: {}", response.status()));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| format!("reverse geocoding response invalid: {e}"))?;

        let city = body.address.city
            .or(body.address.town)
            .or(body.address.village)
            .or(body.display_name);

        match city {
            Some(name) if !name.trim().is_empty() => {
                tracing::debug!(latitude, longitude, city = %name, "coordinates resolved");
                Ok(name)
            }
            _ => Err("reverse geocoding returned no place name".to_string()),
        }
    }
}

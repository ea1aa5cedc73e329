use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocoderSettings;
use crate::models::CitySuggestion;

/// Germany, as a lon/lat bounding box for the upstream query.
const GERMANY_BBOX: &str = "5.866,47.270,15.042,55.099";

/// Errors that can occur when querying the geocoding upstream
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Upstream returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Photon geocoding client for city-name suggestions on the signup form.
pub struct GeocoderClient {
    base_url: String,
    limit: u8,
    client: Client,
}

impl GeocoderClient {
    pub fn new(base_url: String, limit: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            limit,
            client,
        }
    }

    pub fn from_settings(settings: &GeocoderSettings) -> Self {
        Self::new(settings.base_url.clone(), settings.limit)
    }

    /// German city suggestions for a partial name.
    pub async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, GeocoderError> {
        let url = format!(
            "{}?q={}&limit={}&lang=de&osm_tag=place:city&layer=city&bbox={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            self.limit,
            GERMANY_BBOX
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocoderError::ApiError(format!(
                "suggestion query failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let features = json
            .get("features")
            .and_then(|f| f.as_array())
            .ok_or_else(|| GeocoderError::InvalidResponse("Missing features array".into()))?;

        let suggestions = features
            .iter()
            .filter_map(|feature| {
                let properties = feature.get("properties")?;
                let coordinates = feature
                    .get("geometry")
                    .and_then(|g| g.get("coordinates"))
                    .and_then(|c| c.as_array())?;

                Some(CitySuggestion {
                    name: properties.get("name")?.as_str()?.to_string(),
                    state: properties
                        .get("state")
                        .and_then(|s| s.as_str())
                        .unwrap_or("")
                        .to_string(),
                    country: properties
                        .get("country")
                        .and_then(|c| c.as_str())
                        .unwrap_or("Germany")
                        .to_string(),
                    osm_id: properties.get("osm_id").and_then(|i| i.as_i64())?,
                    coordinates: [
                        coordinates.first()?.as_f64()?,
                        coordinates.get(1)?.as_f64()?,
                    ],
                })
            })
            .collect();

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn suggestions_are_parsed_from_geojson() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"features":[
                    {"properties":{"name":"Berlin","state":"Berlin","country":"Deutschland","osm_id":62422},
                     "geometry":{"coordinates":[13.3888599,52.5170365]}},
                    {"properties":{"name":"Bernau","osm_id":62340},
                     "geometry":{"coordinates":[13.5871,52.6796]}}
                ]}"#,
            )
            .create_async()
            .await;

        let geocoder = GeocoderClient::new(server.url(), 5);
        let suggestions = geocoder.suggest_cities("Ber").await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Berlin");
        assert_eq!(suggestions[0].state, "Berlin");
        assert_eq!(suggestions[1].country, "Germany"); // default when absent
    }

    #[tokio::test]
    async fn upstream_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let geocoder = GeocoderClient::new(server.url(), 5);
        let result = geocoder.suggest_cities("Ber").await;

        assert!(matches!(result, Err(GeocoderError::ApiError(_))));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GeocodeOutcome, Geocoder};
use crate::core::config::GeocoderConfig;
use crate::shared::geo::Coordinates;

/// Nominatim search result (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Geocoder backed by the Nominatim free-form search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    city_qualifier: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            city_qualifier: config.city_qualifier.clone(),
        })
    }

    /// Append the city so that "Indiranagar" resolves locally and not elsewhere
    pub fn qualified_query(&self, address: &str) -> String {
        let address = address.trim();
        if self.city_qualifier.is_empty() {
            address.to_string()
        } else {
            format!("{}, {}", address, self.city_qualifier)
        }
    }

    /// Classify the (at most one) result returned for a query
    pub fn first_match(places: Vec<NominatimPlace>) -> GeocodeOutcome {
        let Some(place) = places.into_iter().next() else {
            return GeocodeOutcome::NotFound;
        };

        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => {
                tracing::debug!("Geocoded to '{}' ({}, {})", place.display_name, lat, lon);
                GeocodeOutcome::Found(Coordinates::new(lat, lon))
            }
            _ => GeocodeOutcome::Failed(format!(
                "Unparseable coordinates in Nominatim result: lat={}, lon={}",
                place.lat, place.lon
            )),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<NominatimPlace>, String> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        tracing::debug!("Geocoding (free-form): {} -> {}", query, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Nominatim request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Nominatim returned status: {}", response.status()));
        }

        response
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|e| format!("Failed to parse Nominatim response: {}", e))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> GeocodeOutcome {
        let query = self.qualified_query(address);

        let outcome = match self.search(&query).await {
            Ok(places) => Self::first_match(places),
            Err(reason) => GeocodeOutcome::Failed(reason),
        };

        match &outcome {
            GeocodeOutcome::Found(_) => {}
            GeocodeOutcome::NotFound => tracing::info!("No geocoding match for '{}'", query),
            GeocodeOutcome::Failed(reason) => {
                tracing::warn!("Geocoding failed for '{}': {}", query, reason)
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use std::collections::HashMap;
    use std::time::Duration;

    fn place(lat: &str, lon: &str) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: "Indiranagar, Bengaluru".to_string(),
        }
    }

    fn config(base_url: String) -> GeocoderConfig {
        GeocoderConfig {
            base_url,
            user_agent: "parkpal-tests".to_string(),
            city_qualifier: "Bangalore".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_qualified_query_appends_city() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig::default()).unwrap();
        assert_eq!(
            geocoder.qualified_query("Indiranagar"),
            "Indiranagar, Bangalore"
        );
        assert_eq!(geocoder.qualified_query("  MG Road "), "MG Road, Bangalore");
    }

    #[test]
    fn test_qualified_query_without_city() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            city_qualifier: String::new(),
            ..GeocoderConfig::default()
        })
        .unwrap();
        assert_eq!(geocoder.qualified_query("MG Road"), "MG Road");
    }

    #[test]
    fn test_first_match_parses_string_coordinates() {
        let outcome = NominatimGeocoder::first_match(vec![place("12.9784", "77.6408")]);
        assert_eq!(
            outcome,
            GeocodeOutcome::Found(Coordinates::new(12.9784, 77.6408))
        );
    }

    #[test]
    fn test_first_match_empty_is_not_found() {
        assert_eq!(
            NominatimGeocoder::first_match(vec![]),
            GeocodeOutcome::NotFound
        );
    }

    #[test]
    fn test_first_match_garbage_is_failure() {
        let outcome = NominatimGeocoder::first_match(vec![place("north", "77.6")]);
        assert!(matches!(outcome, GeocodeOutcome::Failed(_)));
    }

    async fn fake_search(
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<serde_json::Value>, StatusCode> {
        match params.get("q").map(String::as_str) {
            Some("Indiranagar, Bangalore") => Ok(Json(serde_json::json!([
                { "lat": "12.9784", "lon": "77.6408", "display_name": "Indiranagar" }
            ]))),
            Some("boom, Bangalore") => Err(StatusCode::SERVICE_UNAVAILABLE),
            _ => Ok(Json(serde_json::json!([]))),
        }
    }

    async fn spawn_fake_nominatim() -> String {
        let app = Router::new().route("/search", get(fake_search));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_geocode_distinguishes_miss_from_failure() {
        let base_url = spawn_fake_nominatim().await;
        let geocoder = NominatimGeocoder::new(&config(base_url)).unwrap();

        assert_eq!(
            geocoder.geocode("Indiranagar").await,
            GeocodeOutcome::Found(Coordinates::new(12.9784, 77.6408))
        );
        assert_eq!(
            geocoder.geocode("Unknownplace123").await,
            GeocodeOutcome::NotFound
        );
        assert!(matches!(
            geocoder.geocode("boom").await,
            GeocodeOutcome::Failed(_)
        ));
    }
}

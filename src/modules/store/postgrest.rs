use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{BookingOutcome, NewSpot, SpotRow, SpotStore, StoreError};
use crate::core::config::PostgrestConfig;
use crate::shared::constants::SPOTS_TABLE;

/// Client for a Supabase project's PostgREST endpoint (`{url}/rest/v1/{table}`)
pub struct PostgrestSpotStore {
    http_client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl PostgrestSpotStore {
    pub fn new(config: &PostgrestConfig) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: SPOTS_TABLE.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Attach the project key both as `apikey` and as a bearer token
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, StoreError> {
        let response = self.authed(request).send().await.map_err(|e| {
            tracing::error!("PostgREST {} request failed: {}", action, e);
            StoreError::Connection(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("PostgREST {} error: HTTP {} - {}", action, status, body);
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse PostgREST response: {}", e);
            StoreError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl SpotStore for PostgrestSpotStore {
    async fn select_all(&self) -> Result<Vec<SpotRow>, StoreError> {
        let request = self
            .http_client
            .get(self.table_url())
            .query(&[("select", "*")]);

        let response = self.send(request, "select").await?;
        let values: Vec<serde_json::Value> = Self::decode(response).await?;
        let fetched = values.len();

        // One malformed row must not hide the rest of the table
        let rows: Vec<SpotRow> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SpotRow>(value) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!("Skipping undecodable {} row: {}", self.table, e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Fetched {} rows from {} ({} skipped)",
            rows.len(),
            self.table,
            fetched - rows.len()
        );
        Ok(rows)
    }

    async fn insert(&self, spot: &NewSpot) -> Result<SpotRow, StoreError> {
        let request = self
            .http_client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(spot);

        let response = self.send(request, "insert").await?;
        let rows: Vec<SpotRow> = Self::decode(response).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn mark_booked(&self, id: i64) -> Result<BookingOutcome, StoreError> {
        let id_filter = format!("eq.{}", id);

        // Conditional update: only rows that are still available match
        let request = self
            .http_client
            .patch(self.table_url())
            .query(&[("id", id_filter.as_str()), ("is_available", "eq.true")])
            .header("Prefer", "return=representation")
            .json(&json!({ "is_available": false }));

        let response = self.send(request, "update").await?;
        let updated: Vec<SpotRow> = Self::decode(response).await?;

        if let Some(row) = updated.into_iter().next() {
            return Ok(BookingOutcome::Booked(row));
        }

        // Nothing matched: tell a lost race apart from an unknown id
        let request = self
            .http_client
            .get(self.table_url())
            .query(&[("select", "id"), ("id", id_filter.as_str())]);

        let response = self.send(request, "lookup").await?;
        let existing: Vec<serde_json::Value> = Self::decode(response).await?;

        if existing.is_empty() {
            Ok(BookingOutcome::NotFound)
        } else {
            Ok(BookingOutcome::AlreadyBooked)
        }
    }

    fn backend_name(&self) -> &'static str {
        "postgrest"
    }
}

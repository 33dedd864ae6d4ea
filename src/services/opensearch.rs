use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Artist, Dataset, Studio};

const TARGET_NAME: &str = "opensearch";
const BULK_CHUNK_SIZE: usize = 500;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct OpenSearchService {
    client: Client,
    endpoint: String,
    artist_index: String,
    studio_index: String,
}

impl OpenSearchService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.opensearch_endpoint.trim_end_matches('/').to_string(),
            artist_index: config.opensearch_artist_index.clone(),
            studio_index: config.opensearch_studio_index.clone(),
        })
    }

    pub fn artist_index(&self) -> &str {
        &self.artist_index
    }

    pub fn studio_index(&self) -> &str {
        &self.studio_index
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;

        if !status.is_success() {
            return Err(AppError::unavailable(
                TARGET_NAME,
                format!("{} failed ({}): {}", action, status, body),
            ));
        }

        if body.trim().is_empty() {
            Ok(json!({}))
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    /// Delete an index; returns false if it did not exist.
    pub async fn delete_index(&self, index: &str) -> Result<bool> {
        let response = self
            .client
            .delete(self.url(index))
            .send()
            .await
            .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::check(response, &format!("Deleting index {}", index)).await?;
        Ok(true)
    }

    /// Drop and recreate an index with the given mappings.
    pub async fn reset_index(&self, index: &str, mappings: Value) -> Result<()> {
        self.delete_index(index).await?;

        let response = self
            .client
            .put(self.url(index))
            .json(&json!({ "mappings": mappings }))
            .send()
            .await
            .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;

        Self::check(response, &format!("Creating index {}", index)).await?;
        tracing::debug!(index, "Search index recreated");
        Ok(())
    }

    /// Index documents through the bulk API. A bulk response reporting item
    /// errors counts as a rejected write.
    pub async fn bulk_index(&self, index: &str, documents: &[(String, Value)]) -> Result<usize> {
        for chunk in documents.chunks(BULK_CHUNK_SIZE) {
            let mut body = String::new();
            for (id, document) in chunk {
                body.push_str(&json!({ "index": { "_index": index, "_id": id } }).to_string());
                body.push('\n');
                body.push_str(&document.to_string());
                body.push('\n');
            }

            let response = self
                .client
                .post(self.url("_bulk"))
                .header("Content-Type", "application/x-ndjson")
                .body(body)
                .send()
                .await
                .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;

            let result = Self::check(response, "Bulk indexing").await?;

            if result["errors"].as_bool().unwrap_or(false) {
                let reason = first_bulk_error(&result).unwrap_or_else(|| "unknown".to_string());
                return Err(AppError::unavailable(
                    TARGET_NAME,
                    format!("Bulk indexing into {} rejected documents: {}", index, reason),
                ));
            }
        }

        Ok(documents.len())
    }

    pub async fn refresh(&self, index: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("{}/_refresh", index)))
            .send()
            .await
            .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;
        Self::check(response, &format!("Refreshing index {}", index)).await?;
        Ok(())
    }

    /// Document count of an index; a missing index counts as empty.
    pub async fn count(&self, index: &str) -> Result<usize> {
        let response = self
            .client
            .get(self.url(&format!("{}/_count", index)))
            .send()
            .await
            .map_err(|e| AppError::unavailable(TARGET_NAME, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }

        let body = Self::check(response, &format!("Counting index {}", index)).await?;
        Ok(body["count"].as_u64().unwrap_or(0) as usize)
    }

    /// Recreate both indices and fill them with `dataset`.
    pub async fn replace_dataset(&self, dataset: &Dataset) -> Result<usize> {
        self.reset_index(&self.artist_index, artist_mappings()).await?;
        self.reset_index(&self.studio_index, studio_mappings()).await?;

        let artists: Vec<(String, Value)> = dataset
            .artists
            .iter()
            .map(|a| (a.artist_id.clone(), artist_document(a)))
            .collect();
        let studios: Vec<(String, Value)> = dataset
            .studios
            .iter()
            .map(|s| (s.studio_id.clone(), studio_document(s)))
            .collect();

        let mut written = self.bulk_index(&self.artist_index, &artists).await?;
        written += self.bulk_index(&self.studio_index, &studios).await?;

        self.refresh(&self.artist_index).await?;
        self.refresh(&self.studio_index).await?;

        Ok(written)
    }

    pub async fn reset(&self) -> Result<()> {
        self.delete_index(&self.artist_index).await?;
        self.delete_index(&self.studio_index).await?;
        Ok(())
    }
}

fn first_bulk_error(result: &Value) -> Option<String> {
    result["items"].as_array()?.iter().find_map(|item| {
        let error = &item["index"]["error"];
        if error.is_null() {
            None
        } else {
            Some(
                error["reason"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            )
        }
    })
}

pub fn artist_mappings() -> Value {
    json!({
        "properties": {
            "artistId": { "type": "keyword" },
            "artistName": { "type": "text", "fields": { "raw": { "type": "keyword" } } },
            "studioId": { "type": "keyword" },
            "studioName": { "type": "text" },
            "styles": { "type": "keyword" },
            "rating": { "type": "float" },
            "reviewCount": { "type": "integer" },
            "availability": { "type": "keyword" },
            "hourlyRate": { "type": "integer" },
            "city": { "type": "keyword" },
            "location": { "type": "geo_point" },
            "bio": { "type": "text" }
        }
    })
}

pub fn studio_mappings() -> Value {
    json!({
        "properties": {
            "studioId": { "type": "keyword" },
            "studioName": { "type": "text", "fields": { "raw": { "type": "keyword" } } },
            "specialties": { "type": "keyword" },
            "rating": { "type": "float" },
            "city": { "type": "keyword" },
            "postcode": { "type": "keyword" },
            "location": { "type": "geo_point" },
            "artistCount": { "type": "integer" }
        }
    })
}

/// Flattened search document for an artist
pub fn artist_document(artist: &Artist) -> Value {
    json!({
        "artistId": artist.artist_id,
        "artistName": artist.artist_name,
        "studioId": artist.studio_id,
        "studioName": artist.studio_name,
        "styles": artist.styles,
        "rating": artist.rating,
        "reviewCount": artist.review_count,
        "availability": artist.availability,
        "hourlyRate": artist.pricing.hourly_rate,
        "city": artist.location.city,
        "location": {
            "lat": artist.location.coordinates.latitude,
            "lon": artist.location.coordinates.longitude
        },
        "bio": artist.bio
    })
}

pub fn studio_document(studio: &Studio) -> Value {
    json!({
        "studioId": studio.studio_id,
        "studioName": studio.studio_name,
        "specialties": studio.specialties,
        "rating": studio.rating,
        "city": studio.address.city,
        "postcode": studio.address.postcode,
        "location": {
            "lat": studio.coordinates.latitude,
            "lon": studio.coordinates.longitude
        },
        "artistCount": studio.artist_count
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bulk_error_extracts_reason() {
        let result = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 201 } },
                { "index": { "_id": "b", "status": 400, "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [location]" } } }
            ]
        });
        assert_eq!(
            first_bulk_error(&result).as_deref(),
            Some("failed to parse field [location]")
        );
    }

    #[test]
    fn test_first_bulk_error_none_when_clean() {
        let result = json!({ "errors": false, "items": [{ "index": { "_id": "a", "status": 201 } }] });
        assert_eq!(first_bulk_error(&result), None);
    }
}

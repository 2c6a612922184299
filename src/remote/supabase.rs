//! Hosted backend client: PostgREST for the table, Storage for the bucket.

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{ListingTable, ObjectBucket};
use crate::config::SupabaseConfig;
use crate::errors::AppError;
use crate::models::{Listing, NewListing};

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    key: String,
    table: String,
    bucket: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, table: &str, bucket: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            table: table.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

/// Turn a non-2xx answer into the service's own message.
async fn check(resp: Response) -> Result<Response, String> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(error_message(status.as_u16(), &body))
}

fn error_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match message {
        Some(m) => m,
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl ListingTable for SupabaseClient {
    async fn list_newest_first(&self) -> Result<Vec<Listing>, AppError> {
        let resp = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "id.desc")])
            .send()
            .await?;

        let resp = check(resp).await.map_err(AppError::Database)?;
        let rows: Vec<Listing> = resp.json().await?;
        tracing::debug!(count = rows.len(), table = %self.table, "Fetched listings");
        Ok(rows)
    }

    async fn insert(&self, listing: &NewListing) -> Result<(), AppError> {
        let resp = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&[listing])
            .send()
            .await?;

        check(resp).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let filter = format!("eq.{}", id);
        let resp = self
            .authorized(self.client.delete(self.table_url()))
            .query(&[("id", filter.as_str())])
            .send()
            .await?;

        check(resp).await.map_err(AppError::Database)?;
        Ok(())
    }
}

#[async_trait]
impl ObjectBucket for SupabaseClient {
    async fn upload(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        let resp = self
            .authorized(self.client.post(self.object_url(key)))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        check(resp).await.map_err(AppError::Upload)?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(key)
        )
    }
}

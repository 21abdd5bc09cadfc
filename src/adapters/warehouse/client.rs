//! Warehouse REST client
//!
//! Tables land in the warehouse under
//! `/v1/projects/{project}/datasets/{dataset}/tables/{table}`. A `PUT` of
//! NDJSON rows replaces the table's entire prior content
//! (truncate-then-insert, independently per table). Rows are rendered
//! from arrow record batches, whose timestamps are timezone-free by
//! construction — the destination format does not support timezone-aware
//! timestamps.
//!
//! No retry logic lives here: any failure surfaces to the loader, which
//! decides whether to fall back.

use crate::config::schema::WarehouseConfig;
use crate::domain::errors::WarehouseError;
use crate::domain::warehouse::NamedBatch;
use arrow::json::LineDelimitedWriter;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// REST client for the analytical warehouse.
pub struct WarehouseClient {
    /// HTTP client for making requests
    http: Client,

    /// Warehouse configuration
    config: WarehouseConfig,
}

impl WarehouseClient {
    /// Create a new warehouse client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// The dataset URL this client writes under.
    fn dataset_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/datasets/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.dataset_id
        )
    }

    /// Apply bearer auth when an API key is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key.expose_secret().as_ref()),
            None => request,
        }
    }

    /// Ensure the target dataset exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be created or accessed.
    pub async fn ensure_dataset_exists(&self) -> Result<(), WarehouseError> {
        let response = self
            .authorize(self.http.put(self.dataset_url()))
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        if response.status().is_success() {
            tracing::debug!(dataset = %self.config.dataset_id, "Dataset ensured");
            Ok(())
        } else {
            Err(WarehouseError::DatasetCreationFailed {
                dataset: self.config.dataset_id.clone(),
                message: response_detail(response).await,
            })
        }
    }

    /// Replace one table's entire content with the given rows.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails, the endpoint is unreachable,
    /// or the warehouse rejects the write.
    pub async fn replace_table(&self, table: &NamedBatch) -> Result<(), WarehouseError> {
        let body = encode_ndjson(table)?;
        let url = format!("{}/tables/{}", self.dataset_url(), table.name);

        let response = self
            .authorize(self.http.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                table = table.name,
                rows = table.rows(),
                "Replaced warehouse table"
            );
            Ok(())
        } else {
            Err(WarehouseError::WriteFailed {
                table: table.name.to_string(),
                status: status.as_u16(),
                message: response_detail(response).await,
            })
        }
    }
}

/// Render a record batch as newline-delimited JSON rows.
fn encode_ndjson(table: &NamedBatch) -> Result<Vec<u8>, WarehouseError> {
    let mut writer = LineDelimitedWriter::new(Vec::new());
    writer
        .write_batches(&[&table.batch])
        .map_err(|e| WarehouseError::Encoding(format!("table '{}': {e}", table.name)))?;
    writer
        .finish()
        .map_err(|e| WarehouseError::Encoding(format!("table '{}': {e}", table.name)))?;
    Ok(writer.into_inner())
}

/// Best-effort body text for error reporting.
async fn response_detail(response: reqwest::Response) -> String {
    let status: StatusCode = response.status();
    match response.text().await {
        Ok(body) if !body.is_empty() => body,
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::warehouse::WarehouseTables;

    fn client(base_url: &str) -> WarehouseClient {
        WarehouseClient::new(WarehouseConfig {
            base_url: base_url.to_string(),
            project_id: "analytics".to_string(),
            dataset_id: "healthcare".to_string(),
            api_key: None,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_dataset_url_shape() {
        let client = client("http://warehouse.local/");
        assert_eq!(
            client.dataset_url(),
            "http://warehouse.local/v1/projects/analytics/datasets/healthcare"
        );
    }

    #[test]
    fn test_encode_ndjson_one_line_per_row() {
        let tables = WarehouseTables {
            dim_conditions: vec![
                crate::domain::dimensions::DimCondition {
                    condition_key: "E11".to_string(),
                    code: "E11".to_string(),
                    description: Some("Type 2 diabetes".to_string()),
                },
                crate::domain::dimensions::DimCondition {
                    condition_key: "I10".to_string(),
                    code: "I10".to_string(),
                    description: None,
                },
            ],
            ..Default::default()
        };
        let batches = tables.to_record_batches().unwrap();
        let conditions = batches.iter().find(|b| b.name == "dim_conditions").unwrap();

        let body = encode_ndjson(conditions).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.trim_end().lines().count(), 2);
        assert!(text.contains("\"condition_key\":\"E11\""));
    }
}

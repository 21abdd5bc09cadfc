//! Integration tests for the load contract
//!
//! Drives the loader against a mock warehouse endpoint and a temporary
//! fallback directory: primary success, primary failure with Parquet
//! fallback, fallback-only runs, and per-table load idempotence.

use lodestar::adapters::parquet::ParquetSink;
use lodestar::adapters::warehouse::WarehouseClient;
use lodestar::config::schema::WarehouseConfig;
use lodestar::core::load::{LoadDestination, Loader};
use lodestar::domain::dimensions::DimCondition;
use lodestar::domain::warehouse::{NamedBatch, WarehouseTables};
use mockito::Matcher;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;

fn warehouse_client(base_url: &str) -> WarehouseClient {
    WarehouseClient::new(WarehouseConfig {
        base_url: base_url.to_string(),
        project_id: "analytics".to_string(),
        dataset_id: "healthcare".to_string(),
        api_key: None,
        timeout_seconds: 5,
    })
    .unwrap()
}

fn sample_batches() -> Vec<NamedBatch> {
    let tables = WarehouseTables {
        dim_conditions: vec![
            DimCondition {
                condition_key: "E11".to_string(),
                code: "E11".to_string(),
                description: Some("Type 2 diabetes".to_string()),
            },
            DimCondition {
                condition_key: "I10".to_string(),
                code: "I10".to_string(),
                description: Some("Essential hypertension".to_string()),
            },
        ],
        ..Default::default()
    };
    tables.to_record_batches().unwrap()
}

fn parquet_row_count(path: &std::path::Path) -> usize {
    let file = File::open(path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    reader.map(|batch| batch.unwrap().num_rows()).sum()
}

#[tokio::test]
async fn test_primary_success_skips_fallback() {
    let mut server = mockito::Server::new_async().await;
    let dataset_mock = server
        .mock("PUT", "/v1/projects/analytics/datasets/healthcare")
        .with_status(200)
        .create_async()
        .await;
    let table_mock = server
        .mock(
            "PUT",
            Matcher::Regex(r"^/v1/projects/analytics/datasets/healthcare/tables/.+$".to_string()),
        )
        .with_status(200)
        .expect(9)
        .create_async()
        .await;

    let fallback_dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(
        Some(warehouse_client(&server.url())),
        ParquetSink::new(fallback_dir.path().join("warehouse")),
    );

    let destination = loader.load_all(&sample_batches()).await.unwrap();

    assert_eq!(destination, LoadDestination::Warehouse);
    dataset_mock.assert_async().await;
    table_mock.assert_async().await;
    // fallback directory untouched
    assert!(!fallback_dir.path().join("warehouse").exists());
}

#[tokio::test]
async fn test_primary_failure_falls_back_to_parquet() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/v1/projects/analytics/datasets/healthcare")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock(
            "PUT",
            Matcher::Regex(r"^/v1/projects/analytics/datasets/healthcare/tables/.+$".to_string()),
        )
        .with_status(503)
        .with_body("warehouse unavailable")
        .create_async()
        .await;

    let fallback_dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(
        Some(warehouse_client(&server.url())),
        ParquetSink::new(fallback_dir.path()),
    );

    let destination = loader.load_all(&sample_batches()).await.unwrap();

    assert_eq!(destination, LoadDestination::LocalParquet);

    // every table landed locally, not just the one that failed
    let files: Vec<String> = std::fs::read_dir(fallback_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 9);
    assert!(files.contains(&"dim_conditions.parquet".to_string()));
    assert!(files.contains(&"mart_appointment_analytics.parquet".to_string()));
}

#[tokio::test]
async fn test_unreachable_primary_falls_back() {
    // nothing is listening on this port
    let fallback_dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(
        Some(warehouse_client("http://127.0.0.1:9")),
        ParquetSink::new(fallback_dir.path()),
    );

    let destination = loader.load_all(&sample_batches()).await.unwrap();
    assert_eq!(destination, LoadDestination::LocalParquet);
}

#[tokio::test]
async fn test_table_put_carries_ndjson_rows() {
    let mut server = mockito::Server::new_async().await;
    let table_mock = server
        .mock(
            "PUT",
            "/v1/projects/analytics/datasets/healthcare/tables/dim_conditions",
        )
        .match_header("content-type", "application/x-ndjson")
        .match_body(Matcher::Regex("\"condition_key\":\"E11\"".to_string()))
        .with_status(200)
        .create_async()
        .await;

    let client = warehouse_client(&server.url());
    let batches = sample_batches();
    let conditions = batches.iter().find(|b| b.name == "dim_conditions").unwrap();

    client.replace_table(conditions).await.unwrap();
    table_mock.assert_async().await;
}

#[tokio::test]
async fn test_fallback_only_load_is_idempotent() {
    let fallback_dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(None, ParquetSink::new(fallback_dir.path()));
    let batches = sample_batches();

    // loading the same set twice leaves exactly one copy of the final
    // state per table
    assert_eq!(
        loader.load_all(&batches).await.unwrap(),
        LoadDestination::LocalParquet
    );
    assert_eq!(
        loader.load_all(&batches).await.unwrap(),
        LoadDestination::LocalParquet
    );

    let conditions_path = fallback_dir.path().join("dim_conditions.parquet");
    assert_eq!(parquet_row_count(&conditions_path), 2);

    let file_count = std::fs::read_dir(fallback_dir.path()).unwrap().count();
    assert_eq!(file_count, 9);
}

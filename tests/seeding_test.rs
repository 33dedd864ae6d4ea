//! Integration tests for the seeding orchestrator
//!
//! Covers:
//! - Independent settlement of target writes
//! - Idempotent re-seeding
//! - DynamoDB and OpenSearch wire traffic against mock servers
//! - File exports

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tattoo_devtools::config::Config;
use tattoo_devtools::models::EntityKind;
use tattoo_devtools::seeding::{
    FileExportTarget, FrontendExportTarget, KeyValueTarget, SearchIndexTarget, SeedTarget,
    Seeder, SetupOptions, TargetKind, TargetOutcome,
};
use tattoo_devtools::services::{DynamoDbService, OpenSearchService};
use tattoo_devtools::test_utils::*;

fn dynamo_target(op: &str) -> (&'static str, String) {
    ("x-amz-target", format!("DynamoDB_20120810.{}", op))
}

async fn mount_dynamo(server: &MockServer, op: &str, body: Value) {
    let (name, value) = dynamo_target(op);
    Mock::given(method("POST"))
        .and(header(name, value.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_empty_dynamo(server: &MockServer) {
    mount_dynamo(server, "DescribeTable", json!({ "Table": { "TableStatus": "ACTIVE" } })).await;
    mount_dynamo(server, "Scan", json!({ "Items": [], "Count": 0 })).await;
    mount_dynamo(server, "BatchWriteItem", json!({ "UnprocessedItems": {} })).await;
}

async fn mount_opensearch(server: &MockServer, bulk_response: Value) {
    for index in ["artists-local", "studios-local"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/{}", index)))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "index_not_found_exception" })))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/{}", index)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/{}/_refresh", index)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(header("content-type", "application/x-ndjson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_response))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unreachable_target_does_not_block_others() {
    let config = test_config();
    let targets: Vec<Arc<dyn SeedTarget>> = vec![
        // test_config points DynamoDB at a closed port
        Arc::new(KeyValueTarget::new(DynamoDbService::new(&config).await.unwrap())),
        Arc::new(MemoryStore::new(TargetKind::SearchIndex)),
        Arc::new(FrontendExportTarget::new(config.frontend_export_path.clone())),
    ];
    let seeder = Seeder::new(&config, targets).with_seed(3);

    let summary = seeder.seed_scenario("minimal").await.unwrap();

    assert!(matches!(
        summary.outcome(TargetKind::KeyValue),
        Some(TargetOutcome::Failed { .. })
    ));
    assert!(matches!(
        summary.outcome(TargetKind::SearchIndex),
        Some(TargetOutcome::Succeeded { records: 5, .. })
    ));
    assert!(matches!(
        summary.outcome(TargetKind::FrontendExport),
        Some(TargetOutcome::Succeeded { records: 5, .. })
    ));
    assert!(!summary.is_success());
    assert_eq!(summary.exit_code(), 1);
    assert!(config.frontend_export_path.exists());
}

#[tokio::test]
async fn test_reseeding_overwrites_instead_of_adding() {
    let config = test_config();
    let store = Arc::new(MemoryStore::new(TargetKind::KeyValue));
    let targets: Vec<Arc<dyn SeedTarget>> = vec![store.clone()];
    let seeder = Seeder::new(&config, targets);

    let first = seeder.seed_scenario("minimal").await.unwrap();
    let after_first = store.record_count().await;
    let second = seeder.seed_scenario("minimal").await.unwrap();
    let after_second = store.record_count().await;

    assert!(first.is_success() && second.is_success());
    assert_eq!(after_first, 5);
    assert_eq!(after_second, after_first);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn test_unknown_scenario_fails_before_writing() {
    let config = test_config();
    let store = Arc::new(MemoryStore::new(TargetKind::KeyValue));
    let targets: Vec<Arc<dyn SeedTarget>> = vec![store.clone()];
    let seeder = Seeder::new(&config, targets);

    assert!(seeder.seed_scenario("does-not-exist").await.is_err());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_dynamodb_seed_writes_in_batches() {
    let server = MockServer::start().await;
    mount_empty_dynamo(&server).await;

    let config = Config {
        dynamodb_endpoint: server.uri(),
        ..test_config()
    };
    let targets: Vec<Arc<dyn SeedTarget>> = vec![Arc::new(KeyValueTarget::new(
        DynamoDbService::new(&config).await.unwrap(),
    ))];
    let summary = Seeder::new(&config, targets)
        .with_seed(8)
        .seed_scenario("performance-test")
        .await
        .unwrap();

    assert!(summary.is_success(), "{:?}", summary);
    assert!(matches!(
        summary.outcome(TargetKind::KeyValue),
        Some(TargetOutcome::Succeeded { records: 120, .. })
    ));

    let requests = server.received_requests().await.unwrap();
    let batches: Vec<Value> = requests
        .iter()
        .filter(|r| {
            r.headers
                .get("x-amz-target")
                .map(|v| v.as_bytes() == b"DynamoDB_20120810.BatchWriteItem")
                .unwrap_or(false)
        })
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();

    // 20 studios in one batch, 100 artists in four
    assert_eq!(batches.len(), 5);
    for batch in &batches {
        let items = batch["RequestItems"]["tattoo-directory-local"].as_array().unwrap();
        assert!(items.len() <= 25);
        let item = &items[0]["PutRequest"]["Item"];
        assert_eq!(item["SK"], json!({ "S": "PROFILE" }));
        assert!(item["PK"]["S"].as_str().unwrap().contains('#'));
    }

    assert!(requests.iter().all(|r| r.headers.contains_key("authorization")));
}

#[tokio::test]
async fn test_dynamodb_creates_missing_table() {
    let server = MockServer::start().await;
    let (name, value) = dynamo_target("DescribeTable");
    Mock::given(method("POST"))
        .and(header(name, value.as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
            "message": "Cannot do operations on a non-existent table"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_dynamo(&server, "CreateTable", json!({ "TableDescription": {} })).await;
    mount_dynamo(&server, "DescribeTable", json!({ "Table": { "TableStatus": "ACTIVE" } })).await;

    let config = Config {
        dynamodb_endpoint: server.uri(),
        ..test_config()
    };
    DynamoDbService::new(&config)
        .await
        .unwrap()
        .ensure_table()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let created: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(created["TableName"], "tattoo-directory-local");
    assert_eq!(created["KeySchema"][0]["AttributeName"], "PK");

    // Returns only once the table is ACTIVE
    let operations: Vec<_> = requests
        .iter()
        .map(|r| r.headers["x-amz-target"].to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        operations,
        vec![
            "DynamoDB_20120810.DescribeTable",
            "DynamoDB_20120810.CreateTable",
            "DynamoDB_20120810.DescribeTable",
        ]
    );
}

#[tokio::test]
async fn test_dynamodb_scan_follows_pages() {
    let server = MockServer::start().await;
    let (name, value) = dynamo_target("Scan");
    let item = |id: &str| {
        json!({
            "PK": { "S": format!("STUDIO#{}", id) },
            "SK": { "S": "PROFILE" },
            "entityType": { "S": "studio" },
            "studioId": { "S": id },
            "artistCount": { "N": "0" }
        })
    };

    Mock::given(method("POST"))
        .and(header(name, value.as_str()))
        .and(body_partial_json(json!({ "ExclusiveStartKey": { "PK": { "S": "STUDIO#studio-1" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Items": [item("studio-2")] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header(name, value.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [item("studio-1")],
            "LastEvaluatedKey": { "PK": { "S": "STUDIO#studio-1" }, "SK": { "S": "PROFILE" } }
        })))
        .mount(&server)
        .await;

    let config = Config {
        dynamodb_endpoint: server.uri(),
        ..test_config()
    };
    let records = DynamoDbService::new(&config)
        .await
        .unwrap()
        .load_records(EntityKind::Studio)
        .await
        .unwrap();

    let ids: Vec<_> = records.iter().map(|r| r["studioId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["studio-1", "studio-2"]);
    for record in &records {
        assert_eq!(record["artistCount"].as_f64(), Some(0.0));
        assert!(record.get("PK").is_none());
        assert!(record.get("entityType").is_none());
    }
}

#[tokio::test]
async fn test_search_index_seed() {
    let server = MockServer::start().await;
    mount_opensearch(&server, json!({ "errors": false, "items": [] })).await;

    let config = Config {
        opensearch_endpoint: server.uri(),
        ..test_config()
    };
    let targets: Vec<Arc<dyn SeedTarget>> = vec![Arc::new(SearchIndexTarget::new(
        OpenSearchService::new(&config).unwrap(),
    ))];
    let summary = Seeder::new(&config, targets)
        .with_seed(2)
        .seed_scenario("minimal")
        .await
        .unwrap();

    assert!(summary.is_success(), "{:?}", summary);

    let requests = server.received_requests().await.unwrap();
    let bulk_bodies: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == "/_bulk")
        .map(|r| String::from_utf8(r.body.clone()).unwrap())
        .collect();
    let lines: usize = bulk_bodies.iter().map(|b| b.lines().count()).sum();
    // action + document per record
    assert_eq!(lines, 10);

    let mappings: Value = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT" && r.url.path() == "/artists-local")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(mappings["mappings"]["properties"]["location"]["type"], "geo_point");
}

#[tokio::test]
async fn test_rejected_bulk_write_fails_target() {
    let server = MockServer::start().await;
    mount_opensearch(
        &server,
        json!({
            "errors": true,
            "items": [{ "index": { "_id": "x", "status": 400, "error": { "reason": "mapper_parsing_exception" } } }]
        }),
    )
    .await;

    let config = Config {
        opensearch_endpoint: server.uri(),
        ..test_config()
    };
    let targets: Vec<Arc<dyn SeedTarget>> = vec![Arc::new(SearchIndexTarget::new(
        OpenSearchService::new(&config).unwrap(),
    ))];
    let summary = Seeder::new(&config, targets)
        .seed_scenario("minimal")
        .await
        .unwrap();

    match summary.outcome(TargetKind::SearchIndex) {
        Some(TargetOutcome::Failed { error }) => assert!(error.contains("mapper_parsing_exception")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_export_writes_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        frontend_export_path: dir.path().join("frontend/mockArtistData.json"),
        export_dir: dir.path().join("output"),
        ..test_config()
    };
    let targets: Vec<Arc<dyn SeedTarget>> = vec![
        Arc::new(FrontendExportTarget::new(config.frontend_export_path.clone())),
        Arc::new(FileExportTarget::new(config.export_dir.clone())),
    ];

    let summary = Seeder::new(&config, targets)
        .setup_data(&SetupOptions {
            scenario: Some("search-basic".to_string()),
            export: true,
            ..SetupOptions::default()
        })
        .await
        .unwrap();

    assert!(summary.is_success());
    for file in ["dataset.json", "artists.json", "studios.json"] {
        assert!(dir.path().join("output").join(file).exists(), "{} missing", file);
    }

    let dataset: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("output/dataset.json")).unwrap())
            .unwrap();
    assert_eq!(dataset["metadata"]["scenario"], "search-basic");
    assert_eq!(dataset["metadata"]["artistCount"], 5);
    assert_eq!(dataset["metadata"]["studioCount"], 3);
    assert_eq!(dataset["metadata"]["totalSize"], 8);
}

#[tokio::test]
async fn test_reset_and_status_on_memory_stores() {
    let config = test_config();
    let store = Arc::new(MemoryStore::new(TargetKind::KeyValue));
    let targets: Vec<Arc<dyn SeedTarget>> = vec![
        store.clone(),
        Arc::new(FrontendExportTarget::new(config.frontend_export_path.clone())),
    ];
    let seeder = Seeder::new(&config, targets);

    seeder.seed_scenario("minimal").await.unwrap();

    let status = seeder.data_status().await;
    assert_eq!(status.len(), 2);
    assert_eq!(status[0].counts.get("artists"), Some(&3));
    assert_eq!(status[0].counts.get("studios"), Some(&2));
    assert_eq!(status[1].counts.get("studios"), Some(&2));

    let reports = seeder.reset_data().await;
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        TargetOutcome::Succeeded { records: 5, .. }
    ));
    assert_eq!(store.record_count().await, 0);
}

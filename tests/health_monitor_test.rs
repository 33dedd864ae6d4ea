//! Integration tests for the health monitor
//!
//! Tests validation of stored records end to end, from a record source
//! and the frontend export through to the report and troubleshooting
//! guidance.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use tattoo_devtools::health::{HealthMonitor, IssueCategory, ValidationTarget};
use tattoo_devtools::seeding::{FrontendExportTarget, SeedTarget, Seeder, TargetKind};
use tattoo_devtools::test_utils::*;

fn monitor(store: MemoryStore, frontend: Option<PathBuf>) -> HealthMonitor {
    HealthMonitor::new(Arc::new(store), frontend)
}

fn linked_pair() -> (Vec<Value>, Vec<Value>) {
    (
        vec![valid_studio_json("studio-1", &["artist-1"])],
        vec![valid_artist_json("artist-1", Some("studio-1"))],
    )
}

#[tokio::test]
async fn test_missing_postcode_is_a_single_address_error() {
    let mut studio = valid_studio_json("studio-7", &[]);
    studio["address"]
        .as_object_mut()
        .unwrap()
        .remove("postcode");

    let report = monitor(MemoryStore::with_records(vec![studio], vec![]), None)
        .validate(ValidationTarget::Studios)
        .await
        .unwrap();

    let errors: Vec<_> = report.issues().filter(|i| i.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field.as_deref(), Some("postcode"));
    assert_eq!(errors[0].entity_id, "studio-7");
    assert_eq!(errors[0].category, IssueCategory::Address);
    assert_eq!(report.address_errors.len(), 1);

    let stats = report.statistics.studios.as_ref().unwrap();
    assert_eq!((stats.total, stats.valid), (1, 0));
    assert!(report.statistics.artists.is_none());
}

#[tokio::test]
async fn test_broken_links_are_relationship_errors() {
    let studios = vec![valid_studio_json("studio-1", &["artist-1", "artist-ghost"])];
    let artists = vec![
        valid_artist_json("artist-1", Some("studio-1")),
        valid_artist_json("artist-2", Some("studio-missing")),
    ];

    let report = monitor(MemoryStore::with_records(studios, artists), None)
        .validate(ValidationTarget::All)
        .await
        .unwrap();

    assert!(report.has_errors());
    assert!(report.has_code("orphaned_artist_reference"));
    assert!(report.has_code("unknown_artist_reference"));
    assert!(report
        .relationship_errors
        .iter()
        .any(|i| i.entity_id == "artist-2"));

    let artists = report.statistics.artists.as_ref().unwrap();
    assert_eq!((artists.total, artists.valid), (2, 1));
    assert_eq!(artists.validation_rate, 50.0);
}

#[tokio::test]
async fn test_frontend_count_mismatch_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let frontend = dir.path().join("mockArtistData.json");
    std::fs::write(
        &frontend,
        serde_json::to_vec(&json!({ "metadata": {}, "artists": [], "studios": [{}, {}, {}] })).unwrap(),
    )
    .unwrap();

    let (studios, artists) = linked_pair();
    let report = monitor(MemoryStore::with_records(studios, artists), Some(frontend))
        .validate(ValidationTarget::Studios)
        .await
        .unwrap();

    let mismatch = report
        .issues()
        .find(|i| i.code == "frontend_count_mismatch")
        .expect("mismatch reported");
    assert!(!mismatch.is_error());
    assert_eq!(mismatch.entity_id, "frontend-export");
    assert!(!report.has_errors());
}

#[tokio::test]
async fn test_missing_frontend_export_is_not_an_issue() {
    let dir = tempfile::tempdir().unwrap();
    let (studios, artists) = linked_pair();

    let report = monitor(
        MemoryStore::with_records(studios, artists),
        Some(dir.path().join("absent.json")),
    )
    .validate(ValidationTarget::All)
    .await
    .unwrap();

    assert!(!report.has_code("frontend_count_mismatch"));
    assert_eq!(report.statistics.error_count, 0);
}

#[tokio::test]
async fn test_corrupt_frontend_export_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let frontend = dir.path().join("mockArtistData.json");
    std::fs::write(&frontend, "{ not json").unwrap();

    let (studios, artists) = linked_pair();
    let report = monitor(MemoryStore::with_records(studios, artists), Some(frontend))
        .validate(ValidationTarget::All)
        .await
        .unwrap();

    let unreadable = report
        .issues()
        .find(|i| i.code == "frontend_export_unreadable")
        .expect("unreadable export reported");
    assert!(!unreadable.is_error());
    assert!(!report.has_errors());
    assert_eq!(report.statistics.warning_count, 1);
    assert!(!report.has_code("frontend_count_mismatch"));
}

#[tokio::test]
async fn test_empty_store_is_fully_valid() {
    let report = monitor(MemoryStore::with_records(vec![], vec![]), None)
        .validate(ValidationTarget::All)
        .await
        .unwrap();

    assert!(!report.has_errors());
    assert_eq!(report.statistics.studios.as_ref().unwrap().validation_rate, 100.0);
    assert_eq!(report.statistics.artists.as_ref().unwrap().validation_rate, 100.0);
}

#[tokio::test]
async fn test_seeded_data_passes_validation() {
    let config = test_config();
    let store = Arc::new(MemoryStore::new(TargetKind::KeyValue));
    let targets: Vec<Arc<dyn SeedTarget>> = vec![
        store.clone(),
        Arc::new(FrontendExportTarget::new(config.frontend_export_path.clone())),
    ];

    let summary = Seeder::new(&config, targets)
        .with_seed(21)
        .seed_scenario("full-dataset")
        .await
        .unwrap();
    assert!(summary.is_success());

    let monitor = HealthMonitor::new(store, Some(config.frontend_export_path.clone()));
    let report = monitor.validate(ValidationTarget::All).await.unwrap();

    assert!(
        !report.has_errors(),
        "{}",
        serde_json::to_string_pretty(&report).unwrap()
    );
    assert!(!report.has_code("frontend_count_mismatch"));
    assert_eq!(report.statistics.studios.as_ref().unwrap().total, 5);
    assert_eq!(report.statistics.artists.as_ref().unwrap().valid, 10);
}

#[tokio::test]
async fn test_studio_health_suggests_fixes() {
    let mut studio = valid_studio_json("studio-1", &["artist-1"]);
    studio["images"] = json!([{ "url": "not a url", "kind": "exterior" }]);
    let artists = vec![valid_artist_json("artist-1", Some("studio-1"))];

    let health = monitor(MemoryStore::with_records(vec![studio], artists), None)
        .studio_health()
        .await
        .unwrap();

    assert!(health.report.has_errors());
    assert_eq!(health.report.bucket(IssueCategory::Image).len(), 1);

    let ids: Vec<&str> = health.guidance.iter().map(|r| r.id).collect();
    assert!(ids.contains(&"image-errors"));
    assert!(ids.contains(&"low-validation-rate"));

    let json = serde_json::to_value(&health).unwrap();
    assert_eq!(json["report"]["target"], "studios");
    assert!(json["guidance"][0]["suggestions"].is_array());
}

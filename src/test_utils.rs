//! Test utilities for tattoo-devtools
//!
//! Provides helpers for isolated test environments:
//! - Config pointing at unique temporary paths
//! - An in-memory store usable as both seed target and record source
//! - Well-formed studio and artist records for validation tests

use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::Result,
    health::RecordSource,
    models::{Dataset, DatasetMetadata, EntityKind},
    seeding::{RecordCounts, SeedTarget, TargetKind},
};

/// Unique scratch directory for one test
pub fn test_dir() -> PathBuf {
    std::env::temp_dir().join(format!("tattoo-devtools-test-{}", uuid::Uuid::new_v4()))
}

/// Config with unreachable service endpoints and private export paths
pub fn test_config() -> Config {
    let dir = test_dir();
    Config {
        dynamodb_endpoint: "http://127.0.0.1:1".to_string(),
        opensearch_endpoint: "http://127.0.0.1:1".to_string(),
        frontend_export_path: dir.join("mockArtistData.json"),
        export_dir: dir.join("output"),
        image_base_url: "http://localhost:4566/test-images".to_string(),
        request_timeout_secs: 2,
        write_rate_per_second: 1000,
        ..Config::default()
    }
}

/// In-memory record store.
///
/// Acts as a [`SeedTarget`] of any kind and as a [`RecordSource`] for the
/// health monitor.
pub struct MemoryStore {
    kind: TargetKind,
    records: RwLock<HashMap<EntityKind, Vec<Value>>>,
    writes: AtomicUsize,
    loads: AtomicUsize,
}

impl MemoryStore {
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            records: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    /// Store preloaded with raw records
    pub fn with_records(studios: Vec<Value>, artists: Vec<Value>) -> Self {
        let mut records = HashMap::new();
        records.insert(EntityKind::Studio, studios);
        records.insert(EntityKind::Artist, artists);
        Self {
            kind: TargetKind::KeyValue,
            records: RwLock::new(records),
            writes: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `load_records` calls served
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait::async_trait]
impl SeedTarget for MemoryStore {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    async fn write(&self, _metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize> {
        let mut records = self.records.write().await;
        records.clear();
        for kind in [EntityKind::Studio, EntityKind::Artist] {
            let values = dataset
                .records(kind)?
                .into_iter()
                .map(|(_, value)| value)
                .collect();
            records.insert(kind, values);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(dataset.total_size())
    }

    async fn reset(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let removed = records.values().map(Vec::len).sum();
        records.clear();
        Ok(removed)
    }

    async fn counts(&self) -> Result<RecordCounts> {
        let records = self.records.read().await;
        let mut counts = RecordCounts::new();
        counts.insert("artists", records.get(&EntityKind::Artist).map_or(0, Vec::len));
        counts.insert("studios", records.get(&EntityKind::Studio).map_or(0, Vec::len));
        Ok(counts)
    }
}

#[async_trait::async_trait]
impl RecordSource for MemoryStore {
    async fn load_records(&self, kind: EntityKind) -> Result<Vec<Value>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.read().await.get(&kind).cloned().unwrap_or_default())
    }
}

/// A studio record that passes every field check
pub fn valid_studio_json(studio_id: &str, artist_ids: &[&str]) -> Value {
    json!({
        "studioId": studio_id,
        "studioName": "Black Anchor Tattoo",
        "address": {
            "street": "12 Brick Lane",
            "city": "London",
            "postcode": "E1 6RF"
        },
        "coordinates": { "latitude": 51.5205, "longitude": -0.0717 },
        "contactInfo": {
            "email": "info@black-anchor-tattoo.co.uk",
            "phone": "020 7946 0123",
            "website": "https://www.black-anchor-tattoo.co.uk",
            "instagram": "@black_anchor_tattoo"
        },
        "openingHours": {
            "monday": "closed",
            "tuesday": "10:00-18:00",
            "wednesday": "10:00-18:00",
            "thursday": "10:00-20:00",
            "friday": "10:00-20:00",
            "saturday": "11:00-18:00",
            "sunday": "12:00-17:00"
        },
        "specialties": ["traditional", "blackwork"],
        "rating": 4.6,
        "reviewCount": 128,
        "established": 2011,
        "images": [
            { "url": "http://localhost:4566/test-images/studios/exterior-1.webp", "kind": "exterior" },
            { "url": "http://localhost:4566/test-images/studios/interior-1.webp", "kind": "interior" }
        ],
        "artists": artist_ids,
        "artistCount": artist_ids.len()
    })
}

/// An artist record that passes every field check
pub fn valid_artist_json(artist_id: &str, studio_id: Option<&str>) -> Value {
    json!({
        "artistId": artist_id,
        "artistName": "Sam Hollis",
        "studioId": studio_id,
        "studioName": studio_id.map(|_| "Black Anchor Tattoo"),
        "styles": ["traditional"],
        "portfolioImages": [
            {
                "url": format!("http://localhost:4566/test-images/artists/{}/traditional/1.webp", artist_id),
                "style": "traditional",
                "description": "a swallow in traditional style"
            }
        ],
        "rating": 4.4,
        "reviewCount": 52,
        "pricing": { "hourlyRate": 120, "minimumCharge": 80, "currency": "GBP" },
        "availability": "available",
        "location": {
            "city": "London",
            "coordinates": { "latitude": 51.5205, "longitude": -0.0717 }
        },
        "instagramHandle": "@samhollis_ink",
        "bio": "Sam specialises in traditional work.",
        "yearsExperience": 9
    })
}

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{Dataset, DatasetMetadata, EntityKind};
use crate::services::{export, DynamoDbService, OpenSearchService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    KeyValue,
    SearchIndex,
    FrontendExport,
    FileExport,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyValue => "key-value",
            Self::SearchIndex => "search-index",
            Self::FrontendExport => "frontend-export",
            Self::FileExport => "file-export",
        }
    }

    /// Backing stores hold seeded records beyond the current run and can be reset
    pub fn is_store(&self) -> bool {
        matches!(self, Self::KeyValue | Self::SearchIndex)
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labelled record counts reported by a target
pub type RecordCounts = BTreeMap<&'static str, usize>;

/// A destination for generated data.
///
/// `write` replaces whatever the target held before; writing the same
/// dataset twice leaves the same records behind.
#[async_trait::async_trait]
pub trait SeedTarget: Send + Sync {
    fn kind(&self) -> TargetKind;

    async fn write(&self, metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize>;

    /// Remove seeded records; returns how many were removed when known.
    async fn reset(&self) -> Result<usize> {
        Ok(0)
    }

    async fn counts(&self) -> Result<RecordCounts> {
        Ok(RecordCounts::new())
    }
}

pub struct KeyValueTarget {
    service: DynamoDbService,
}

impl KeyValueTarget {
    pub fn new(service: DynamoDbService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl SeedTarget for KeyValueTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::KeyValue
    }

    async fn write(&self, _metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize> {
        self.service.replace_dataset(dataset).await
    }

    async fn reset(&self) -> Result<usize> {
        self.service.reset().await
    }

    async fn counts(&self) -> Result<RecordCounts> {
        let mut counts = RecordCounts::new();
        counts.insert("artists", self.service.count_records(EntityKind::Artist).await?);
        counts.insert("studios", self.service.count_records(EntityKind::Studio).await?);
        Ok(counts)
    }
}

pub struct SearchIndexTarget {
    service: OpenSearchService,
}

impl SearchIndexTarget {
    pub fn new(service: OpenSearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl SeedTarget for SearchIndexTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::SearchIndex
    }

    async fn write(&self, _metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize> {
        self.service.replace_dataset(dataset).await
    }

    async fn reset(&self) -> Result<usize> {
        let artists = self.service.count(self.service.artist_index()).await?;
        let studios = self.service.count(self.service.studio_index()).await?;
        self.service.reset().await?;
        Ok(artists + studios)
    }

    async fn counts(&self) -> Result<RecordCounts> {
        let mut counts = RecordCounts::new();
        counts.insert("artists", self.service.count(self.service.artist_index()).await?);
        counts.insert("studios", self.service.count(self.service.studio_index()).await?);
        Ok(counts)
    }
}

pub struct FrontendExportTarget {
    path: PathBuf,
}

impl FrontendExportTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SeedTarget for FrontendExportTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::FrontendExport
    }

    async fn write(&self, metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize> {
        export::write_frontend_export(&self.path, metadata, dataset).await
    }

    async fn counts(&self) -> Result<RecordCounts> {
        let mut counts = RecordCounts::new();
        if let Some(studios) = export::read_frontend_studio_count(&self.path).await? {
            counts.insert("studios", studios);
        }
        Ok(counts)
    }
}

pub struct FileExportTarget {
    dir: PathBuf,
}

impl FileExportTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl SeedTarget for FileExportTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::FileExport
    }

    async fn write(&self, metadata: &DatasetMetadata, dataset: &Dataset) -> Result<usize> {
        let paths = export::write_bundle(&self.dir, metadata, dataset).await?;
        tracing::info!(dir = %self.dir.display(), files = paths.len(), "Dataset exported");
        Ok(dataset.total_size())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{artist::Artist, enums::EntityKind, studio::Studio};

/// A generated batch of artists and studios.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub artists: Vec<Artist>,
    pub studios: Vec<Studio>,
}

impl Dataset {
    pub fn total_size(&self) -> usize {
        self.artists.len() + self.studios.len()
    }

    pub fn studio(&self, studio_id: &str) -> Option<&Studio> {
        self.studios.iter().find(|s| s.studio_id == studio_id)
    }

    /// Records of one kind as JSON documents, in storage field naming.
    pub fn records(&self, kind: EntityKind) -> serde_json::Result<Vec<(String, serde_json::Value)>> {
        match kind {
            EntityKind::Artist => self
                .artists
                .iter()
                .map(|a| Ok((a.artist_id.clone(), serde_json::to_value(a)?)))
                .collect(),
            EntityKind::Studio => self
                .studios
                .iter()
                .map(|s| Ok((s.studio_id.clone(), serde_json::to_value(s)?)))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub generated_at: DateTime<Utc>,
    pub scenario: String,
    pub total_size: usize,
    pub artist_count: usize,
    pub studio_count: usize,
}

impl DatasetMetadata {
    pub fn for_dataset(scenario: &str, dataset: &Dataset) -> Self {
        Self {
            generated_at: Utc::now(),
            scenario: scenario.to_string(),
            total_size: dataset.total_size(),
            artist_count: dataset.artists.len(),
            studio_count: dataset.studios.len(),
        }
    }
}

/// On-disk layout of the frontend mock data and `dataset.json` exports.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: DatasetMetadata,
    pub artists: Vec<Artist>,
    pub studios: Vec<Studio>,
}

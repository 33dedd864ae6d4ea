//! Seeding orchestration.
//!
//! A run resolves a scenario into generation parameters, generates one
//! dataset and writes it to every selected target concurrently. Targets
//! settle independently: one failing target is reported in the
//! [`SeedSummary`] without stopping the others.

pub mod targets;

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ServicePhase};
use crate::error::Result;
use crate::generators::{DataGenerator, GenerationParams};
use crate::models::{Dataset, DatasetMetadata};
use crate::scenarios::{self, DEFAULT_SCENARIO};
use crate::services::{DynamoDbService, OpenSearchService};
pub use targets::{
    FileExportTarget, FrontendExportTarget, KeyValueTarget, RecordCounts, SearchIndexTarget,
    SeedTarget, TargetKind,
};

/// Above this many artists LocalStack needs a generous memory limit
pub const LARGE_DATASET_ARTISTS: usize = 500;
pub const RECOMMENDED_MEMORY_MB: u64 = 2048;

/// Artists per studio when only a count is given
const ARTISTS_PER_STUDIO: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupOptions {
    pub scenario: Option<String>,
    /// Overrides the scenario's artist count
    pub count: Option<usize>,
    pub frontend_only: bool,
    pub export: bool,
}

impl SetupOptions {
    pub fn scenario(name: impl Into<String>) -> Self {
        Self {
            scenario: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Resolved parameters of a run, fixed before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub scenario: String,
    pub params: GenerationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TargetOutcome {
    Succeeded {
        records: usize,
        #[serde(rename = "elapsedMs")]
        elapsed_ms: u64,
    },
    Failed {
        error: String,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    pub target: TargetKind,
    #[serde(flatten)]
    pub outcome: TargetOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub scenario: String,
    pub artist_count: usize,
    pub studio_count: usize,
    pub targets: Vec<TargetReport>,
}

impl SeedSummary {
    pub fn is_success(&self) -> bool {
        !self
            .targets
            .iter()
            .any(|t| matches!(t.outcome, TargetOutcome::Failed { .. }))
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn outcome(&self, target: TargetKind) -> Option<&TargetOutcome> {
        self.targets
            .iter()
            .find(|t| t.target == target)
            .map(|t| &t.outcome)
    }
}

/// Per-store record counts; `error` is set when the store could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStatus {
    pub target: TargetKind,
    pub counts: RecordCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

enum Selection {
    Run,
    Skip(String),
    Omit,
}

pub struct Seeder {
    targets: Vec<Arc<dyn SeedTarget>>,
    service_phase: ServicePhase,
    image_base_url: String,
    memory_limit_mb: Option<u64>,
    seed: Option<u64>,
}

impl Seeder {
    pub fn new(config: &Config, targets: Vec<Arc<dyn SeedTarget>>) -> Self {
        Self {
            targets,
            service_phase: config.service_phase,
            image_base_url: config.image_base_url.clone(),
            memory_limit_mb: config.memory_limit_mb(),
            seed: None,
        }
    }

    /// Seeder writing to DynamoDB, OpenSearch and the export files.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let targets: Vec<Arc<dyn SeedTarget>> = vec![
            Arc::new(KeyValueTarget::new(DynamoDbService::new(config).await?)),
            Arc::new(SearchIndexTarget::new(OpenSearchService::new(config)?)),
            Arc::new(FrontendExportTarget::new(config.frontend_export_path.clone())),
            Arc::new(FileExportTarget::new(config.export_dir.clone())),
        ];
        Ok(Self::new(config, targets))
    }

    /// Fix the random seed so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn plan(&self, options: &SetupOptions) -> Result<SeedPlan> {
        let name = options.scenario.as_deref().unwrap_or(DEFAULT_SCENARIO);
        let scenario = scenarios::resolve(name)?;
        let mut params = GenerationParams::from_scenario(scenario, &self.image_base_url);

        if let Some(count) = options.count {
            params.artist_count = count;
            if options.scenario.is_none() {
                params.studio_count = count.div_ceil(ARTISTS_PER_STUDIO).max(1);
            }
        }

        params.validate()?;

        Ok(SeedPlan {
            scenario: scenario.name.to_string(),
            params,
        })
    }

    fn generate(&self, params: &GenerationParams) -> Result<Dataset> {
        match self.seed {
            Some(seed) => DataGenerator::with_seed(seed).generate_dataset(params),
            None => DataGenerator::new().generate_dataset(params),
        }
    }

    fn select(&self, kind: TargetKind, options: &SetupOptions) -> Selection {
        match kind {
            TargetKind::FileExport if !options.export => Selection::Omit,
            TargetKind::FileExport | TargetKind::FrontendExport => Selection::Run,
            TargetKind::KeyValue | TargetKind::SearchIndex if options.frontend_only => {
                Selection::Skip("frontend-only run".to_string())
            }
            TargetKind::SearchIndex if !self.service_phase.search_enabled() => Selection::Skip(
                format!("disabled in service phase {}", self.service_phase.as_str()),
            ),
            TargetKind::KeyValue | TargetKind::SearchIndex => Selection::Run,
        }
    }

    fn warn_if_memory_constrained(&self, params: &GenerationParams) {
        if params.artist_count <= LARGE_DATASET_ARTISTS {
            return;
        }
        if let Some(limit) = self.memory_limit_mb.filter(|mb| *mb < RECOMMENDED_MEMORY_MB) {
            tracing::warn!(
                artists = params.artist_count,
                memory_limit_mb = limit,
                recommended_mb = RECOMMENDED_MEMORY_MB,
                "Large dataset with a low LocalStack memory limit; seeding may fail or be slow"
            );
        }
    }

    /// Generate one dataset and write it to every selected target.
    pub async fn setup_data(&self, options: &SetupOptions) -> Result<SeedSummary> {
        let plan = self.plan(options)?;
        let dataset = self.generate(&plan.params)?;
        let metadata = DatasetMetadata::for_dataset(&plan.scenario, &dataset);

        self.warn_if_memory_constrained(&plan.params);

        tracing::info!(
            scenario = %plan.scenario,
            artists = dataset.artists.len(),
            studios = dataset.studios.len(),
            "Seeding dataset"
        );

        let mut reports = Vec::new();
        let mut pending = Vec::new();
        for target in &self.targets {
            match self.select(target.kind(), options) {
                Selection::Run => pending.push(target.clone()),
                Selection::Skip(reason) => {
                    tracing::info!(store = target.kind().as_str(), %reason, "Skipping target");
                    reports.push(TargetReport {
                        target: target.kind(),
                        outcome: TargetOutcome::Skipped { reason },
                    });
                }
                Selection::Omit => {}
            }
        }

        let writes = pending.iter().map(|target| {
            let metadata = &metadata;
            let dataset = &dataset;
            let scenario = plan.scenario.as_str();
            async move {
                let started = Instant::now();
                let outcome = match target.write(metadata, dataset).await {
                    Ok(records) => {
                        let elapsed_ms = started.elapsed().as_millis() as u64;
                        tracing::info!(
                            store = target.kind().as_str(),
                            scenario,
                            records,
                            elapsed_ms,
                            "Target seeded"
                        );
                        TargetOutcome::Succeeded {
                            records,
                            elapsed_ms,
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            store = target.kind().as_str(),
                            scenario,
                            error = %e,
                            "Seeding target failed"
                        );
                        TargetOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                TargetReport {
                    target: target.kind(),
                    outcome,
                }
            }
        });

        reports.extend(join_all(writes).await);
        reports.sort_by_key(|r| r.target);

        Ok(SeedSummary {
            scenario: plan.scenario,
            artist_count: dataset.artists.len(),
            studio_count: dataset.studios.len(),
            targets: reports,
        })
    }

    pub async fn seed_scenario(&self, name: &str) -> Result<SeedSummary> {
        self.setup_data(&SetupOptions::scenario(name)).await
    }

    fn store_targets(&self) -> impl Iterator<Item = &Arc<dyn SeedTarget>> {
        self.targets.iter().filter(|t| t.kind().is_store())
    }

    /// Purge seeded records from the backing stores, best-effort per store.
    pub async fn reset_data(&self) -> Vec<TargetReport> {
        let resets = self.store_targets().map(|target| async move {
            if target.kind() == TargetKind::SearchIndex && !self.service_phase.search_enabled() {
                return TargetReport {
                    target: target.kind(),
                    outcome: TargetOutcome::Skipped {
                        reason: format!("disabled in service phase {}", self.service_phase.as_str()),
                    },
                };
            }

            let started = Instant::now();
            let outcome = match target.reset().await {
                Ok(records) => TargetOutcome::Succeeded {
                    records,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                },
                Err(e) => {
                    tracing::error!(store = target.kind().as_str(), error = %e, "Reset failed");
                    TargetOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            TargetReport {
                target: target.kind(),
                outcome,
            }
        });

        join_all(resets).await
    }

    /// Record counts per store, best-effort.
    pub async fn data_status(&self) -> Vec<StoreStatus> {
        let statuses = self
            .targets
            .iter()
            .filter(|t| t.kind() != TargetKind::FileExport)
            .map(|target| async move {
                match target.counts().await {
                    Ok(counts) => StoreStatus {
                        target: target.kind(),
                        counts,
                        error: None,
                    },
                    Err(e) => StoreStatus {
                        target: target.kind(),
                        counts: RecordCounts::new(),
                        error: Some(e.to_string()),
                    },
                }
            });

        join_all(statuses).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_config, MemoryStore};

    fn seeder(config: &Config) -> Seeder {
        Seeder::new(
            config,
            vec![
                Arc::new(MemoryStore::new(TargetKind::KeyValue)),
                Arc::new(MemoryStore::new(TargetKind::SearchIndex)),
                Arc::new(MemoryStore::new(TargetKind::FrontendExport)),
                Arc::new(MemoryStore::new(TargetKind::FileExport)),
            ],
        )
        .with_seed(1)
    }

    #[test]
    fn test_plan_defaults_to_full_dataset() {
        let config = test_config();
        let plan = seeder(&config).plan(&SetupOptions::default()).unwrap();
        assert_eq!(plan.scenario, DEFAULT_SCENARIO);
        assert_eq!(plan.params.artist_count, 10);
    }

    #[test]
    fn test_count_without_scenario_scales_studios() {
        let config = test_config();
        let seeder = seeder(&config);

        let plan = seeder
            .plan(&SetupOptions {
                count: Some(12),
                ..SetupOptions::default()
            })
            .unwrap();
        assert_eq!(plan.params.artist_count, 12);
        assert_eq!(plan.params.studio_count, 3);

        let plan = seeder
            .plan(&SetupOptions {
                count: Some(0),
                ..SetupOptions::default()
            })
            .unwrap();
        assert_eq!(plan.params.studio_count, 1);
    }

    #[test]
    fn test_count_with_scenario_keeps_studios() {
        let config = test_config();
        let plan = seeder(&config)
            .plan(&SetupOptions {
                scenario: Some("minimal".to_string()),
                count: Some(7),
                ..SetupOptions::default()
            })
            .unwrap();
        assert_eq!(plan.params.artist_count, 7);
        assert_eq!(plan.params.studio_count, 2);
    }

    #[test]
    fn test_plan_rejects_unknown_scenario_and_oversize() {
        let config = test_config();
        let seeder = seeder(&config);
        assert!(matches!(
            seeder.plan(&SetupOptions::scenario("nope")),
            Err(crate::error::AppError::UnknownScenario(_))
        ));
        assert!(matches!(
            seeder.plan(&SetupOptions {
                count: Some(1_000_000),
                ..SetupOptions::default()
            }),
            Err(crate::error::AppError::InvalidParameters(_))
        ));
    }

    #[tokio::test]
    async fn test_frontend_only_skips_stores() {
        let config = test_config();
        let summary = seeder(&config)
            .setup_data(&SetupOptions {
                frontend_only: true,
                ..SetupOptions::default()
            })
            .await
            .unwrap();

        assert!(summary.is_success());
        assert!(matches!(
            summary.outcome(TargetKind::KeyValue),
            Some(TargetOutcome::Skipped { .. })
        ));
        assert!(matches!(
            summary.outcome(TargetKind::FrontendExport),
            Some(TargetOutcome::Succeeded { .. })
        ));
        assert_eq!(summary.outcome(TargetKind::FileExport), None);
    }

    #[tokio::test]
    async fn test_core_phase_skips_search() {
        let mut config = test_config();
        config.service_phase = ServicePhase::Core;
        let summary = seeder(&config).seed_scenario("minimal").await.unwrap();

        assert!(matches!(
            summary.outcome(TargetKind::SearchIndex),
            Some(TargetOutcome::Skipped { .. })
        ));
        assert!(matches!(
            summary.outcome(TargetKind::KeyValue),
            Some(TargetOutcome::Succeeded { records: 5, .. })
        ));
    }

    #[test]
    fn test_outcome_serialization() {
        let report = TargetReport {
            target: TargetKind::KeyValue,
            outcome: TargetOutcome::Succeeded {
                records: 5,
                elapsed_ms: 12,
            },
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "target": "key-value", "status": "succeeded", "records": 5, "elapsedMs": 12 })
        );
    }
}

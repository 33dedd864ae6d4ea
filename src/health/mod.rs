//! Read-only validation of seeded data.
//!
//! The monitor loads raw records from a [`RecordSource`], runs field,
//! relationship and cross-store checks and produces a [`ValidationReport`].
//! Nothing here mutates stored data.

pub mod checks;
pub mod relationships;
pub mod report;
pub mod troubleshooting;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::models::EntityKind;
use crate::services::{export, DynamoDbService};
pub use report::{EntityStats, IssueCategory, Severity, ValidationIssue, ValidationReport};
pub use troubleshooting::TroubleshootingRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidationTarget {
    Studios,
    Artists,
    All,
}

impl ValidationTarget {
    pub fn includes(&self, kind: EntityKind) -> bool {
        matches!(
            (self, kind),
            (Self::All, _) | (Self::Studios, EntityKind::Studio) | (Self::Artists, EntityKind::Artist)
        )
    }
}

/// Where the monitor reads stored records from.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn load_records(&self, kind: EntityKind) -> Result<Vec<Value>>;
}

#[async_trait::async_trait]
impl RecordSource for DynamoDbService {
    async fn load_records(&self, kind: EntityKind) -> Result<Vec<Value>> {
        DynamoDbService::load_records(self, kind).await
    }
}

/// Studio validation together with the guidance that applies to it.
#[derive(Debug, Serialize)]
pub struct StudioHealth {
    pub report: ValidationReport,
    pub guidance: Vec<&'static TroubleshootingRule>,
}

pub struct HealthMonitor {
    source: Arc<dyn RecordSource>,
    frontend_export_path: Option<PathBuf>,
}

impl HealthMonitor {
    pub fn new(source: Arc<dyn RecordSource>, frontend_export_path: Option<PathBuf>) -> Self {
        Self {
            source,
            frontend_export_path,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let dynamodb = DynamoDbService::new(config).await?;
        Ok(Self::new(
            Arc::new(dynamodb),
            Some(config.frontend_export_path.clone()),
        ))
    }

    pub async fn validate(&self, target: ValidationTarget) -> Result<ValidationReport> {
        // Relationship checks need both sides regardless of target
        let studios = self.source.load_records(EntityKind::Studio).await?;
        let artists = self.source.load_records(EntityKind::Artist).await?;

        let mut unreadable_export = None;
        let frontend_studios = match (&self.frontend_export_path, target.includes(EntityKind::Studio)) {
            (Some(path), true) => match export::read_frontend_studio_count(path).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Frontend export is unreadable");
                    unreadable_export = Some(relationships::frontend_export_unreadable(path, &e.to_string()));
                    None
                }
            },
            _ => None,
        };

        let mut report = validate_records(target, &studios, &artists, frontend_studios);
        report.extend(unreadable_export);

        tracing::info!(
            validation_target = ?target,
            studios = studios.len(),
            artists = artists.len(),
            errors = report.statistics.error_count,
            warnings = report.statistics.warning_count,
            "Validation finished"
        );

        Ok(report)
    }

    pub async fn studio_health(&self) -> Result<StudioHealth> {
        let report = self.validate(ValidationTarget::Studios).await?;
        let guidance = troubleshooting::guidance(&report);
        Ok(StudioHealth { report, guidance })
    }
}

fn check_kind(
    report: &mut ValidationReport,
    kind: EntityKind,
    records: &[Value],
    relationship_issues: &[ValidationIssue],
) -> EntityStats {
    let related_errors: HashSet<&str> = relationship_issues
        .iter()
        .filter(|i| i.entity_type == kind && i.is_error())
        .map(|i| i.entity_id.as_str())
        .collect();

    let mut valid = 0;
    for (index, record) in records.iter().enumerate() {
        let issues = match kind {
            EntityKind::Studio => checks::check_studio(record, index),
            EntityKind::Artist => checks::check_artist(record, index),
        };
        let id = checks::entity_id(record, kind, index);
        if !issues.iter().any(ValidationIssue::is_error) && !related_errors.contains(id.as_str()) {
            valid += 1;
        }
        report.extend(issues);
    }
    EntityStats::new(records.len(), valid)
}

/// Validate already-loaded records.
///
/// An entity counts as valid when neither its field checks nor the
/// relationship checks raised an error against it.
pub fn validate_records(
    target: ValidationTarget,
    studios: &[Value],
    artists: &[Value],
    frontend_studios: Option<usize>,
) -> ValidationReport {
    let mut report = ValidationReport::new(target);
    let relationship_issues = relationships::check_relationships(studios, artists);

    if target.includes(EntityKind::Studio) {
        let stats = check_kind(&mut report, EntityKind::Studio, studios, &relationship_issues);
        report.statistics.studios = Some(stats);
    }
    if target.includes(EntityKind::Artist) {
        let stats = check_kind(&mut report, EntityKind::Artist, artists, &relationship_issues);
        report.statistics.artists = Some(stats);
    }

    report.extend(relationship_issues);

    if let Some(frontend) = frontend_studios.filter(|_| target.includes(EntityKind::Studio)) {
        report.extend(relationships::check_frontend_count(frontend, studios.len()));
    }

    report
}

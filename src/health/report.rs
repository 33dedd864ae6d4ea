use chrono::{DateTime, Utc};
use serde::{ser::SerializeMap, Serialize, Serializer};

use super::ValidationTarget;
use crate::models::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Which bucket of the report an issue lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Validation,
    Relationship,
    Address,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub code: String,
    pub entity_type: EntityKind,
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    pub total: usize,
    pub valid: usize,
    pub validation_rate: f64,
}

impl EntityStats {
    pub fn new(total: usize, valid: usize) -> Self {
        let validation_rate = if total == 0 {
            100.0
        } else {
            round1(valid as f64 / total as f64 * 100.0)
        };
        Self {
            total,
            valid,
            validation_rate,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Serialized flat: `totalStudios`, `validStudios`, `validationRate` for
/// studios and `totalArtists`, `validArtists`, `artistValidationRate` for
/// artists, each present only when that kind was validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportStatistics {
    pub studios: Option<EntityStats>,
    pub artists: Option<EntityStats>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl Serialize for ReportStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(studios) = &self.studios {
            map.serialize_entry("totalStudios", &studios.total)?;
            map.serialize_entry("validStudios", &studios.valid)?;
            map.serialize_entry("validationRate", &studios.validation_rate)?;
        }
        if let Some(artists) = &self.artists {
            map.serialize_entry("totalArtists", &artists.total)?;
            map.serialize_entry("validArtists", &artists.valid)?;
            map.serialize_entry("artistValidationRate", &artists.validation_rate)?;
        }
        map.serialize_entry("errorCount", &self.error_count)?;
        map.serialize_entry("warningCount", &self.warning_count)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub target: ValidationTarget,
    pub checked_at: DateTime<Utc>,
    pub validation_errors: Vec<ValidationIssue>,
    pub relationship_errors: Vec<ValidationIssue>,
    pub address_errors: Vec<ValidationIssue>,
    pub image_errors: Vec<ValidationIssue>,
    pub statistics: ReportStatistics,
}

impl ValidationReport {
    pub fn new(target: ValidationTarget) -> Self {
        Self {
            target,
            checked_at: Utc::now(),
            validation_errors: Vec::new(),
            relationship_errors: Vec::new(),
            address_errors: Vec::new(),
            image_errors: Vec::new(),
            statistics: ReportStatistics::default(),
        }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.statistics.error_count += 1,
            Severity::Warning => self.statistics.warning_count += 1,
        }
        match issue.category {
            IssueCategory::Validation => self.validation_errors.push(issue),
            IssueCategory::Relationship => self.relationship_errors.push(issue),
            IssueCategory::Address => self.address_errors.push(issue),
            IssueCategory::Image => self.image_errors.push(issue),
        }
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.validation_errors
            .iter()
            .chain(&self.relationship_errors)
            .chain(&self.address_errors)
            .chain(&self.image_errors)
    }

    pub fn has_errors(&self) -> bool {
        self.statistics.error_count > 0
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues().any(|i| i.code == code)
    }

    pub fn bucket(&self, category: IssueCategory) -> &[ValidationIssue] {
        match category {
            IssueCategory::Validation => &self.validation_errors,
            IssueCategory::Relationship => &self.relationship_errors,
            IssueCategory::Address => &self.address_errors,
            IssueCategory::Image => &self.image_errors,
        }
    }

    /// Lowest validation rate over the entity kinds that were validated
    pub fn lowest_validation_rate(&self) -> Option<f64> {
        [&self.statistics.studios, &self.statistics.artists]
            .into_iter()
            .flatten()
            .map(|s| s.validation_rate)
            .reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, category: IssueCategory) -> ValidationIssue {
        ValidationIssue {
            severity,
            category,
            code: "test".to_string(),
            entity_type: EntityKind::Studio,
            entity_id: "studio-1".to_string(),
            field: None,
            message: String::new(),
        }
    }

    #[test]
    fn test_validation_rate_rounding() {
        assert_eq!(EntityStats::new(3, 2).validation_rate, 66.7);
        assert_eq!(EntityStats::new(8, 7).validation_rate, 87.5);
        assert_eq!(EntityStats::new(4, 4).validation_rate, 100.0);
    }

    #[test]
    fn test_empty_total_is_fully_valid() {
        assert_eq!(EntityStats::new(0, 0).validation_rate, 100.0);
    }

    #[test]
    fn test_push_routes_into_buckets() {
        let mut report = ValidationReport::new(ValidationTarget::All);
        report.push(issue(Severity::Warning, IssueCategory::Image));
        assert!(!report.has_errors());

        report.push(issue(Severity::Error, IssueCategory::Address));
        assert!(report.has_errors());
        assert_eq!(report.address_errors.len(), 1);
        assert_eq!(report.image_errors.len(), 1);
        assert_eq!(report.issues().count(), 2);
        assert_eq!(report.statistics.error_count, 1);
        assert_eq!(report.statistics.warning_count, 1);
    }

    #[test]
    fn test_serializes_bucket_names() {
        let report = ValidationReport::new(ValidationTarget::Studios);
        let json = serde_json::to_value(&report).unwrap();
        for key in ["validationErrors", "relationshipErrors", "addressErrors", "imageErrors"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["target"], "studios");
    }

    #[test]
    fn test_serializes_flat_statistics() {
        let mut report = ValidationReport::new(ValidationTarget::Studios);
        report.statistics.studios = Some(EntityStats::new(3, 2));
        report.push(issue(Severity::Error, IssueCategory::Address));

        let stats = serde_json::to_value(&report).unwrap()["statistics"].clone();
        assert_eq!(stats["totalStudios"], 3);
        assert_eq!(stats["validStudios"], 2);
        assert_eq!(stats["validationRate"], 66.7);
        assert_eq!(stats["errorCount"], 1);
        assert_eq!(stats["warningCount"], 0);
        assert!(stats.get("totalArtists").is_none());

        report.statistics.artists = Some(EntityStats::new(4, 4));
        let stats = serde_json::to_value(&report).unwrap()["statistics"].clone();
        assert_eq!(stats["totalArtists"], 4);
        assert_eq!(stats["validArtists"], 4);
        assert_eq!(stats["artistValidationRate"], 100.0);
    }
}

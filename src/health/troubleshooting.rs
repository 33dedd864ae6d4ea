use serde::Serialize;

use super::report::{IssueCategory, ValidationIssue, ValidationReport};

/// Validation rate (percent) below which the low-rate guidance applies
pub const LOW_VALIDATION_RATE: f64 = 90.0;

#[derive(Debug, Serialize)]
pub struct TroubleshootingRule {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip)]
    applies: fn(&ValidationReport) -> bool,
    pub suggestions: &'static [&'static str],
}

impl TroubleshootingRule {
    pub fn applies_to(&self, report: &ValidationReport) -> bool {
        (self.applies)(report)
    }
}

fn low_validation_rate(report: &ValidationReport) -> bool {
    report
        .lowest_validation_rate()
        .map(|rate| rate < LOW_VALIDATION_RATE)
        .unwrap_or(false)
}

fn relationship_errors(report: &ValidationReport) -> bool {
    report
        .bucket(IssueCategory::Relationship)
        .iter()
        .any(ValidationIssue::is_error)
}

fn address_errors(report: &ValidationReport) -> bool {
    !report.bucket(IssueCategory::Address).is_empty()
}

fn image_errors(report: &ValidationReport) -> bool {
    !report.bucket(IssueCategory::Image).is_empty()
}

fn count_mismatch(report: &ValidationReport) -> bool {
    report.has_code("frontend_count_mismatch") || report.has_code("artist_count_mismatch")
}

pub static RULES: &[TroubleshootingRule] = &[
    TroubleshootingRule {
        id: "low-validation-rate",
        title: "Low validation rate",
        applies: low_validation_rate,
        suggestions: &[
            "Re-seed from a known-good preset: tattoo-devtools seed-scenario full-dataset",
            "Run validate-data --type all to see every failing field",
            "Check for records edited by hand in the key-value store",
        ],
    },
    TroubleshootingRule {
        id: "relationship-errors",
        title: "Broken artist/studio relationships",
        applies: relationship_errors,
        suggestions: &[
            "Reset and re-seed so both sides of each relationship are written together: tattoo-devtools reset-data && tattoo-devtools setup-data",
            "Make sure no other process is writing artists or studios to the same table",
        ],
    },
    TroubleshootingRule {
        id: "address-errors",
        title: "Invalid studio addresses",
        applies: address_errors,
        suggestions: &[
            "Postcodes must follow the UK format, e.g. SW1A 1AA",
            "Coordinates must fall inside the UK (lat 49.8 to 60.9, lon -8.7 to 1.8)",
            "Regenerate the data if the address fields were imported from elsewhere",
        ],
    },
    TroubleshootingRule {
        id: "image-errors",
        title: "Image problems",
        applies: image_errors,
        suggestions: &[
            "Check IMAGE_BASE_URL points at the LocalStack image bucket",
            "Image URLs must be absolute http(s) URLs",
        ],
    },
    TroubleshootingRule {
        id: "count-mismatch",
        title: "Record counts disagree",
        applies: count_mismatch,
        suggestions: &[
            "Re-run setup-data without --frontend-only so every store receives the same dataset",
            "Use data-status to compare record counts per store",
        ],
    },
];

/// Rules that apply to `report`, in table order.
pub fn guidance(report: &ValidationReport) -> Vec<&'static TroubleshootingRule> {
    RULES.iter().filter(|rule| rule.applies_to(report)).collect()
}

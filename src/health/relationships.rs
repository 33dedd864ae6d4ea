use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::checks::entity_id;
use super::report::{IssueCategory, Severity, ValidationIssue};
use crate::models::EntityKind;

fn issue(
    severity: Severity,
    code: &str,
    entity_type: EntityKind,
    entity_id: &str,
    field: &str,
    message: String,
) -> ValidationIssue {
    ValidationIssue {
        severity,
        category: IssueCategory::Relationship,
        code: code.to_string(),
        entity_type,
        entity_id: entity_id.to_string(),
        field: Some(field.to_string()),
        message,
    }
}

fn artist_ids(studio: &Value) -> Vec<&str> {
    studio
        .get("artists")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Check that artist→studio references and studio artist lists agree.
pub fn check_relationships(studios: &[Value], artists: &[Value]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let studio_artists: HashMap<String, Vec<&str>> = studios
        .iter()
        .enumerate()
        .map(|(i, s)| (entity_id(s, EntityKind::Studio, i), artist_ids(s)))
        .collect();

    // artist id -> referenced studio id
    let artist_studio: HashMap<String, Option<&str>> = artists
        .iter()
        .enumerate()
        .map(|(i, a)| {
            (
                entity_id(a, EntityKind::Artist, i),
                a.get("studioId").and_then(Value::as_str).filter(|s| !s.is_empty()),
            )
        })
        .collect();

    for (index, artist) in artists.iter().enumerate() {
        let artist_id = entity_id(artist, EntityKind::Artist, index);
        let Some(studio_id) = artist.get("studioId").and_then(Value::as_str).filter(|s| !s.is_empty())
        else {
            continue;
        };

        match studio_artists.get(studio_id) {
            None => issues.push(issue(
                Severity::Error,
                "orphaned_artist_reference",
                EntityKind::Artist,
                &artist_id,
                "studioId",
                format!("Artist references studio {} which does not exist", studio_id),
            )),
            Some(listed) if !listed.contains(&artist_id.as_str()) => issues.push(issue(
                Severity::Error,
                "missing_inverse_reference",
                EntityKind::Artist,
                &artist_id,
                "studioId",
                format!("Studio {} does not list this artist", studio_id),
            )),
            Some(_) => {}
        }
    }

    for (index, studio) in studios.iter().enumerate() {
        let studio_id = entity_id(studio, EntityKind::Studio, index);
        let listed = artist_ids(studio);

        for artist_id in &listed {
            match artist_studio.get(*artist_id) {
                None => issues.push(issue(
                    Severity::Error,
                    "unknown_artist_reference",
                    EntityKind::Studio,
                    &studio_id,
                    "artists",
                    format!("Studio lists artist {} which does not exist", artist_id),
                )),
                Some(points_to) if *points_to != Some(studio_id.as_str()) => {
                    issues.push(issue(
                        Severity::Error,
                        "mismatched_studio_reference",
                        EntityKind::Studio,
                        &studio_id,
                        "artists",
                        format!(
                            "Artist {} points at {} instead of this studio",
                            artist_id,
                            points_to.unwrap_or("no studio")
                        ),
                    ))
                }
                Some(_) => {}
            }
        }

        if let Some(count) = studio.get("artistCount").and_then(Value::as_u64) {
            if count as usize != listed.len() {
                issues.push(issue(
                    Severity::Warning,
                    "artist_count_mismatch",
                    EntityKind::Studio,
                    &studio_id,
                    "artistCount",
                    format!("artistCount is {} but {} artists are listed", count, listed.len()),
                ));
            }
        }
    }

    issues
}

/// Compare the frontend mock data against the key-value store.
pub fn check_frontend_count(frontend_studios: usize, stored_studios: usize) -> Option<ValidationIssue> {
    (frontend_studios != stored_studios).then(|| ValidationIssue {
        severity: Severity::Warning,
        category: IssueCategory::Validation,
        code: "frontend_count_mismatch".to_string(),
        entity_type: EntityKind::Studio,
        entity_id: "frontend-export".to_string(),
        field: None,
        message: format!(
            "Frontend mock data has {} studios, the key-value store has {}",
            frontend_studios, stored_studios
        ),
    })
}

/// The frontend export exists but could not be read or parsed.
pub fn frontend_export_unreadable(path: &Path, reason: &str) -> ValidationIssue {
    ValidationIssue {
        severity: Severity::Warning,
        category: IssueCategory::Validation,
        code: "frontend_export_unreadable".to_string(),
        entity_type: EntityKind::Studio,
        entity_id: "frontend-export".to_string(),
        field: None,
        message: format!(
            "Frontend mock data at {} could not be read, so its studio count was not compared: {}",
            path.display(),
            reason
        ),
    }
}

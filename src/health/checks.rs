//! Field-level checks for stored studio and artist records.
//!
//! Records are checked as loosely typed JSON so that hand-edited or stale
//! data can be reported on instead of failing to deserialize.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde_json::Value;

use super::report::{IssueCategory, Severity, ValidationIssue};
use crate::models::{EntityKind, TattooStyle, WEEKDAYS};

pub static UK_POSTCODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").expect("valid postcode regex")
});

static UK_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+44\s?|0)\d{2,4}(?:\s?\d{3,4}){2}$").expect("valid phone regex")
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static INSTAGRAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?[A-Za-z0-9._]{1,30}$").expect("valid instagram regex"));

static OPENING_HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)-([01]\d|2[0-3]):([0-5]\d)$")
        .expect("valid opening hours regex")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UkBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl UkBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

pub const UK_BOUNDS: UkBounds = UkBounds {
    min_latitude: 49.8,
    max_latitude: 60.9,
    min_longitude: -8.7,
    max_longitude: 1.8,
};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

pub fn is_uk_phone(phone: &str) -> bool {
    UK_PHONE.is_match(phone.trim())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_instagram(handle: &str) -> bool {
    INSTAGRAM.is_match(handle)
}

/// Absolute http(s) URL
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// `HH:MM-HH:MM` with closing after opening, or `closed`.
pub fn is_valid_opening_hours(hours: &str) -> bool {
    if hours.eq_ignore_ascii_case("closed") {
        return true;
    }
    let Some(caps) = OPENING_HOURS.captures(hours) else {
        return false;
    };
    let minutes = |h: usize, m: usize| -> u32 {
        caps[h].parse::<u32>().unwrap_or(0) * 60 + caps[m].parse::<u32>().unwrap_or(0)
    };
    minutes(3, 4) > minutes(1, 2)
}

/// Identifier used in issues; records without one get a positional label.
pub fn entity_id(record: &Value, kind: EntityKind, index: usize) -> String {
    non_empty_str(record.get(kind.id_field()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("<record {}>", index))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn category_for(field: &str) -> IssueCategory {
    match field {
        "street" | "city" | "postcode" | "coordinates" => IssueCategory::Address,
        f if f.starts_with("images") || f.starts_with("portfolioImages") => IssueCategory::Image,
        _ => IssueCategory::Validation,
    }
}

/// Collects the issues of a single record.
struct RecordChecker {
    kind: EntityKind,
    id: String,
    issues: Vec<ValidationIssue>,
}

impl RecordChecker {
    fn new(record: &Value, kind: EntityKind, index: usize) -> Self {
        Self {
            kind,
            id: entity_id(record, kind, index),
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, severity: Severity, code: &str, field: &str, message: String) {
        self.issues.push(ValidationIssue {
            severity,
            category: category_for(field),
            code: code.to_string(),
            entity_type: self.kind,
            entity_id: self.id.clone(),
            field: Some(field.to_string()),
            message,
        });
    }

    fn error(&mut self, code: &str, field: &str, message: String) {
        self.issue(Severity::Error, code, field, message);
    }

    fn warning(&mut self, code: &str, field: &str, message: String) {
        self.issue(Severity::Warning, code, field, message);
    }

    /// Reports a missing field and returns the value when present.
    fn require<'v>(&mut self, value: Option<&'v Value>, field: &str) -> Option<&'v Value> {
        if is_missing(value) {
            self.error(
                "missing_required_field",
                field,
                format!("Required field '{}' is missing", field),
            );
            None
        } else {
            value
        }
    }

    fn require_str<'v>(&mut self, value: Option<&'v Value>, field: &str) -> Option<&'v str> {
        let value = self.require(value, field)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.error(
                    "invalid_field_type",
                    field,
                    format!("Field '{}' must be a string", field),
                );
                None
            }
        }
    }

    fn check_rating(&mut self, record: &Value) {
        let Some(value) = self.require(record.get("rating"), "rating") else {
            return;
        };
        match value.as_f64() {
            Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => {}
            Some(rating) => self.error(
                "rating_out_of_range",
                "rating",
                format!("Rating {} is outside {}-{}", rating, MIN_RATING, MAX_RATING),
            ),
            None => self.error(
                "invalid_field_type",
                "rating",
                "Rating must be a number".to_string(),
            ),
        }
    }

    fn check_styles(&mut self, styles: &[Value], field: &str, code: &str) {
        for style in styles {
            let known = style.as_str().and_then(TattooStyle::from_str).is_some();
            if !known {
                self.error(code, field, format!("Unknown tattoo style {}", style));
            }
        }
    }

    fn check_image_urls(&mut self, images: &[Value], field: &str) {
        for (i, image) in images.iter().enumerate() {
            let url = image.get("url").and_then(Value::as_str).unwrap_or_default();
            if !is_valid_url(url) {
                self.error(
                    "invalid_image_url",
                    &format!("{}[{}].url", field, i),
                    format!("Image URL '{}' is not a valid http(s) URL", url),
                );
            }
        }
    }
}

/// Field checks for one studio record.
pub fn check_studio(record: &Value, index: usize) -> Vec<ValidationIssue> {
    let mut c = RecordChecker::new(record, EntityKind::Studio, index);

    c.require_str(record.get("studioId"), "studioId");
    c.require_str(record.get("studioName"), "studioName");

    let address = record.get("address");
    c.require_str(address.and_then(|a| a.get("street")), "street");
    c.require_str(address.and_then(|a| a.get("city")), "city");
    if let Some(postcode) = c.require_str(address.and_then(|a| a.get("postcode")), "postcode") {
        if !UK_POSTCODE.is_match(postcode.trim()) {
            c.error(
                "invalid_postcode",
                "postcode",
                format!("'{}' is not a valid UK postcode", postcode),
            );
        }
    }

    if let Some(coordinates) = c.require(record.get("coordinates"), "coordinates") {
        let latitude = coordinates.get("latitude").and_then(Value::as_f64);
        let longitude = coordinates.get("longitude").and_then(Value::as_f64);
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if UK_BOUNDS.contains(lat, lon) => {}
            (Some(lat), Some(lon)) => c.error(
                "coordinates_out_of_bounds",
                "coordinates",
                format!("({}, {}) lies outside the UK", lat, lon),
            ),
            _ => c.error(
                "invalid_field_type",
                "coordinates",
                "Coordinates need numeric latitude and longitude".to_string(),
            ),
        }
    }

    let contact = record.get("contactInfo");
    if let Some(email) = c.require_str(contact.and_then(|ci| ci.get("email")), "email") {
        if !is_valid_email(email) {
            c.error("invalid_email", "email", format!("'{}' is not a valid email", email));
        }
    }
    if let Some(phone) = c.require_str(contact.and_then(|ci| ci.get("phone")), "phone") {
        if !is_uk_phone(phone) {
            c.warning(
                "invalid_phone",
                "phone",
                format!("'{}' does not look like a UK phone number", phone),
            );
        }
    }
    if let Some(website) = non_empty_str(contact.and_then(|ci| ci.get("website"))) {
        if !is_valid_url(website) {
            c.warning("invalid_website", "website", format!("'{}' is not a valid URL", website));
        }
    }
    if let Some(instagram) = non_empty_str(contact.and_then(|ci| ci.get("instagram"))) {
        if !is_valid_instagram(instagram) {
            c.warning(
                "invalid_instagram",
                "instagram",
                format!("'{}' is not a valid Instagram handle", instagram),
            );
        }
    }

    if let Some(hours) = c.require(record.get("openingHours"), "openingHours") {
        match hours.as_object() {
            Some(hours) => {
                for day in WEEKDAYS {
                    let field = format!("openingHours.{}", day);
                    match hours.get(day) {
                        None | Some(Value::Null) => c.warning(
                            "missing_opening_hours_day",
                            &field,
                            format!("No opening hours for {}", day),
                        ),
                        Some(value) => {
                            let valid = value.as_str().map(is_valid_opening_hours).unwrap_or(false);
                            if !valid {
                                c.error(
                                    "invalid_opening_hours",
                                    &field,
                                    format!("{} is not HH:MM-HH:MM or closed", value),
                                );
                            }
                        }
                    }
                }
            }
            None => c.error(
                "invalid_field_type",
                "openingHours",
                "Opening hours must be an object keyed by weekday".to_string(),
            ),
        }
    }

    match record.get("specialties").and_then(Value::as_array) {
        Some(specialties) if !specialties.is_empty() => {
            c.check_styles(specialties, "specialties", "unknown_specialty")
        }
        _ => c.warning(
            "empty_specialties",
            "specialties",
            "Studio lists no specialties".to_string(),
        ),
    }

    c.check_rating(record);

    match record.get("images").and_then(Value::as_array) {
        Some(images) if !images.is_empty() => c.check_image_urls(images, "images"),
        _ => c.warning("no_images", "images", "Studio has no images".to_string()),
    }

    c.issues
}

/// Field checks for one artist record.
pub fn check_artist(record: &Value, index: usize) -> Vec<ValidationIssue> {
    let mut c = RecordChecker::new(record, EntityKind::Artist, index);

    c.require_str(record.get("artistId"), "artistId");
    c.require_str(record.get("artistName"), "artistName");

    if let Some(styles) = c.require(record.get("styles"), "styles") {
        match styles.as_array() {
            Some(styles) => c.check_styles(styles, "styles", "unknown_style"),
            None => c.error(
                "invalid_field_type",
                "styles",
                "Styles must be a list".to_string(),
            ),
        }
    }

    c.check_rating(record);

    match record.get("portfolioImages").and_then(Value::as_array) {
        Some(images) if !images.is_empty() => c.check_image_urls(images, "portfolioImages"),
        _ => c.warning(
            "empty_portfolio",
            "portfolioImages",
            "Artist has no portfolio images".to_string(),
        ),
    }

    c.issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{valid_artist_json, valid_studio_json};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_postcode_pattern() {
        for postcode in ["SW1A 1AA", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "ec1a1bb"] {
            assert!(UK_POSTCODE.is_match(postcode), "{}", postcode);
        }
        for postcode in ["12345", "SW1A", "1AA SW1", ""] {
            assert!(!UK_POSTCODE.is_match(postcode), "{}", postcode);
        }
    }

    #[test]
    fn test_opening_hours() {
        assert!(is_valid_opening_hours("10:00-18:00"));
        assert!(is_valid_opening_hours("closed"));
        assert!(!is_valid_opening_hours("18:00-10:00"));
        assert!(!is_valid_opening_hours("10-6"));
        assert!(!is_valid_opening_hours("24:00-25:00"));
    }

    #[test]
    fn test_phone_and_email() {
        assert!(is_uk_phone("020 7946 0123"));
        assert!(is_uk_phone("+44 161 496 0123"));
        assert!(!is_uk_phone("555-0100"));
        assert!(is_valid_email("info@black-anchor.co.uk"));
        assert!(!is_valid_email("info at example"));
    }

    #[test]
    fn test_valid_studio_has_no_issues() {
        assert_eq!(check_studio(&valid_studio_json("studio-1", &["artist-1"]), 0), vec![]);
    }

    #[test]
    fn test_valid_artist_has_no_issues() {
        assert_eq!(check_artist(&valid_artist_json("artist-1", Some("studio-1")), 0), vec![]);
    }

    #[test]
    fn test_missing_postcode_is_single_error() {
        let mut studio = valid_studio_json("studio-1", &[]);
        studio["address"].as_object_mut().unwrap().remove("postcode");

        let issues = check_studio(&studio, 0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("postcode"));
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].category, IssueCategory::Address);
        assert_eq!(issues[0].entity_id, "studio-1");
    }

    #[test]
    fn test_warnings_for_soft_fields() {
        let mut studio = valid_studio_json("studio-1", &[]);
        studio["contactInfo"]["phone"] = json!("555-0100");
        studio["openingHours"].as_object_mut().unwrap().remove("sunday");
        studio["specialties"] = json!([]);
        studio["images"] = json!([]);

        let issues = check_studio(&studio, 0);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field.as_deref()).collect();
        assert_eq!(fields, vec!["phone", "openingHours.sunday", "specialties", "images"]);
    }

    #[test]
    fn test_out_of_bounds_and_bad_url() {
        let mut studio = valid_studio_json("studio-1", &[]);
        studio["coordinates"] = json!({ "latitude": 40.7, "longitude": -74.0 });
        studio["images"][0]["url"] = json!("not a url");

        let issues = check_studio(&studio, 0);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, "coordinates_out_of_bounds");
        assert_eq!(issues[1].category, IssueCategory::Image);
        assert_eq!(issues[1].field.as_deref(), Some("images[0].url"));
    }

    #[test]
    fn test_record_without_id_gets_positional_label() {
        let mut artist = valid_artist_json("artist-1", None);
        artist.as_object_mut().unwrap().remove("artistId");

        let issues = check_artist(&artist, 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].entity_id, "<record 4>");
    }

    #[test]
    fn test_unknown_style_and_rating() {
        let mut artist = valid_artist_json("artist-1", None);
        artist["styles"] = json!(["traditional", "cubism"]);
        artist["rating"] = json!(6.2);

        let codes: Vec<_> = check_artist(&artist, 0).into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["unknown_style", "rating_out_of_range"]);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::enums::{StudioImageKind, TattooStyle};

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Studio {
    pub studio_id: String,
    pub studio_name: String,
    pub address: Address,
    pub coordinates: Coordinates,
    pub contact_info: ContactInfo,
    /// Keyed by lowercase weekday, values are `HH:MM-HH:MM` or `closed`
    pub opening_hours: BTreeMap<String, String>,
    pub specialties: Vec<TattooStyle>,
    pub rating: f64,
    pub review_count: u32,
    pub established: u32,
    pub images: Vec<StudioImage>,
    pub artists: Vec<String>,
    pub artist_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postcode: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioImage {
    pub url: String,
    pub kind: StudioImageKind,
}

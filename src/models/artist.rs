use serde::{Deserialize, Serialize};

use super::enums::{AvailabilityStatus, TattooStyle};
use super::studio::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub artist_id: String,
    pub artist_name: String,
    /// Weak reference to the affiliated studio
    pub studio_id: Option<String>,
    pub studio_name: Option<String>,
    pub styles: Vec<TattooStyle>,
    pub portfolio_images: Vec<PortfolioImage>,
    pub rating: f64,
    pub review_count: u32,
    pub pricing: Pricing,
    pub availability: AvailabilityStatus,
    pub location: ArtistLocation,
    pub instagram_handle: String,
    pub bio: String,
    pub years_experience: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioImage {
    pub url: String,
    pub style: TattooStyle,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub hourly_rate: u32,
    pub minimum_charge: u32,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistLocation {
    pub city: String,
    pub coordinates: Coordinates,
}

impl Artist {
    pub fn is_affiliated_with(&self, studio_id: &str) -> bool {
        self.studio_id.as_deref() == Some(studio_id)
    }
}

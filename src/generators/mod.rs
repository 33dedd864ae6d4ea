//! Synthetic artist and studio generation.
//!
//! Records are random but bounded by [`GenerationParams`]. A batch built by
//! [`DataGenerator::generate_dataset`] is relationally closed: every artist
//! affiliated with a studio points at a studio from the same batch, and each
//! studio's `artists` list is the exact inverse of those references.

pub mod artist;
pub mod pools;
pub mod studio;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Builder;

use crate::error::{AppError, Result};
use crate::models::{AvailabilityStatus, Dataset, TattooStyle};
use crate::scenarios::Scenario;
use pools::CityPool;

pub const MAX_RECORDS: usize = 10_000;
pub const DEFAULT_MIN_RATING: f64 = 3.5;

/// Probability that a generated artist belongs to a studio from the batch
const AFFILIATION_PROBABILITY: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub artist_count: usize,
    pub studio_count: usize,
    /// Style pool; empty means the full vocabulary
    pub styles: Vec<TattooStyle>,
    /// City pool by name; empty means every known city
    pub cities: Vec<String>,
    pub min_rating: f64,
    pub availability: Option<AvailabilityStatus>,
    pub image_base_url: String,
}

impl GenerationParams {
    pub fn from_scenario(scenario: &Scenario, image_base_url: &str) -> Self {
        Self {
            artist_count: scenario.artist_count,
            studio_count: scenario.studio_count,
            styles: scenario.filters.styles.to_vec(),
            cities: scenario.filters.cities.iter().map(|c| c.to_string()).collect(),
            min_rating: scenario.filters.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            availability: scenario.filters.availability,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.artist_count > MAX_RECORDS || self.studio_count > MAX_RECORDS {
            return Err(AppError::InvalidParameters(format!(
                "at most {} artists and {} studios can be generated (requested {} / {})",
                MAX_RECORDS, MAX_RECORDS, self.artist_count, self.studio_count
            )));
        }

        if !(1.0..=5.0).contains(&self.min_rating) {
            return Err(AppError::InvalidParameters(format!(
                "minimum rating {} is outside 1.0-5.0",
                self.min_rating
            )));
        }

        if let Some(unknown) = self.cities.iter().find(|c| pools::city(c).is_none()) {
            return Err(AppError::InvalidParameters(format!(
                "unknown city in location pool: {}",
                unknown
            )));
        }

        Ok(())
    }

    fn style_pool(&self) -> &[TattooStyle] {
        if self.styles.is_empty() {
            &TattooStyle::ALL[..]
        } else {
            self.styles.as_slice()
        }
    }

    fn city_pool(&self) -> Vec<&'static CityPool> {
        if self.cities.is_empty() {
            pools::CITIES.iter().collect()
        } else {
            self.cities.iter().filter_map(|c| pools::city(c)).collect()
        }
    }
}

pub struct DataGenerator<R: Rng = StdRng> {
    rng: R,
}

impl DataGenerator<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator for tests and fixtures
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DataGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DataGenerator<R> {
    /// Generate a full, relationally consistent batch.
    pub fn generate_dataset(&mut self, params: &GenerationParams) -> Result<Dataset> {
        params.validate()?;

        let mut studios: Vec<_> = (0..params.studio_count)
            .map(|_| self.generate_studio(params))
            .collect();

        let mut artists = Vec::with_capacity(params.artist_count);
        for _ in 0..params.artist_count {
            let studio = if !studios.is_empty() && self.rng.gen_bool(AFFILIATION_PROBABILITY) {
                studios.choose(&mut self.rng)
            } else {
                None
            };
            artists.push(self.generate_artist(params, studio));
        }

        for studio in &mut studios {
            studio.artists = artists
                .iter()
                .filter(|a| a.is_affiliated_with(&studio.studio_id))
                .map(|a| a.artist_id.clone())
                .collect();
            studio.artist_count = studio.artists.len() as u32;

            for artist in artists.iter().filter(|a| a.is_affiliated_with(&studio.studio_id)) {
                studio.specialties.extend(artist.styles.iter().copied());
            }
            studio.specialties.sort();
            studio.specialties.dedup();
        }

        tracing::debug!(
            artists = artists.len(),
            studios = studios.len(),
            "Generated dataset"
        );

        Ok(Dataset { artists, studios })
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let uuid = Builder::from_random_bytes(self.rng.gen()).into_uuid();
        format!("{}-{}", prefix, uuid)
    }

    /// Rating in tenths between `min` and 5.0
    fn rating(&mut self, min: f64) -> f64 {
        let low = (min * 10.0).round() as u32;
        self.rng.gen_range(low..=50) as f64 / 10.0
    }

    fn pick_city(&mut self, params: &GenerationParams) -> &'static CityPool {
        params
            .city_pool()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(&pools::CITIES[0])
    }
}

pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

//! Named seeding presets.
//!
//! Presets are static data: a scenario is selected by name and never
//! mutated. The generator reads counts and filters from it.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{AvailabilityStatus, TattooStyle};

pub const DEFAULT_SCENARIO: &str = "full-dataset";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub artist_count: usize,
    pub studio_count: usize,
    pub filters: ScenarioFilters,
}

/// Optional skews applied while generating records.
///
/// Empty pools mean "draw from the full vocabulary".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFilters {
    pub styles: &'static [TattooStyle],
    pub cities: &'static [&'static str],
    pub min_rating: Option<f64>,
    pub availability: Option<AvailabilityStatus>,
}

const NO_FILTERS: ScenarioFilters = ScenarioFilters {
    styles: &[],
    cities: &[],
    min_rating: None,
    availability: None,
};

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "minimal",
        description: "Smallest useful dataset for quick smoke tests",
        artist_count: 3,
        studio_count: 2,
        filters: NO_FILTERS,
    },
    Scenario {
        name: "search-basic",
        description: "Handful of artists for exercising search and filters",
        artist_count: 5,
        studio_count: 3,
        filters: NO_FILTERS,
    },
    Scenario {
        name: "london-artists",
        description: "Artists and studios concentrated in London",
        artist_count: 5,
        studio_count: 3,
        filters: ScenarioFilters {
            cities: &["London"],
            ..NO_FILTERS
        },
    },
    Scenario {
        name: "high-rated",
        description: "Only artists and studios rated 4.5 and above",
        artist_count: 3,
        studio_count: 2,
        filters: ScenarioFilters {
            min_rating: Some(4.5),
            ..NO_FILTERS
        },
    },
    Scenario {
        name: "booking-available",
        description: "Artists currently taking bookings",
        artist_count: 6,
        studio_count: 3,
        filters: ScenarioFilters {
            availability: Some(AvailabilityStatus::Available),
            ..NO_FILTERS
        },
    },
    Scenario {
        name: "traditional-focus",
        description: "Traditional family styles only",
        artist_count: 4,
        studio_count: 2,
        filters: ScenarioFilters {
            styles: &[
                TattooStyle::Traditional,
                TattooStyle::OldSchool,
                TattooStyle::NeoTraditional,
            ],
            ..NO_FILTERS
        },
    },
    Scenario {
        name: "multi-style",
        description: "Artists spread across contrasting styles",
        artist_count: 6,
        studio_count: 3,
        filters: ScenarioFilters {
            styles: &[
                TattooStyle::Realism,
                TattooStyle::Japanese,
                TattooStyle::Blackwork,
                TattooStyle::Geometric,
                TattooStyle::Watercolour,
                TattooStyle::Fineline,
            ],
            ..NO_FILTERS
        },
    },
    Scenario {
        name: "full-dataset",
        description: "Default development dataset",
        artist_count: 10,
        studio_count: 5,
        filters: NO_FILTERS,
    },
    Scenario {
        name: "studio-heavy",
        description: "Many studios with few artists each, including empty studios",
        artist_count: 8,
        studio_count: 10,
        filters: NO_FILTERS,
    },
    Scenario {
        name: "performance-test",
        description: "Medium dataset for pagination and load checks",
        artist_count: 100,
        studio_count: 20,
        filters: NO_FILTERS,
    },
    Scenario {
        name: "mega-dataset",
        description: "Large dataset for stress testing search and rendering",
        artist_count: 1000,
        studio_count: 150,
        filters: NO_FILTERS,
    },
];

/// Look up a preset by name.
pub fn resolve(name: &str) -> Result<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| AppError::UnknownScenario(name.to_string()))
}

/// All presets in table order
pub fn list() -> &'static [Scenario] {
    SCENARIOS
}

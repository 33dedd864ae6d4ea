use rand::{seq::SliceRandom, Rng};
use std::collections::BTreeMap;

use super::{pools, slugify, DataGenerator, GenerationParams};
use crate::models::{
    Address, ContactInfo, Coordinates, Studio, StudioImage, StudioImageKind, WEEKDAYS,
};

/// Maximum offset from a city centre, in degrees
const COORDINATE_JITTER: f64 = 0.03;

impl<R: Rng> DataGenerator<R> {
    /// Generate a single studio. Its `artists` list starts empty and is
    /// filled in when artists are linked to the batch.
    pub fn generate_studio(&mut self, params: &GenerationParams) -> Studio {
        let studio_id = self.next_id("studio");
        let city = self.pick_city(params);
        let studio_name = self.studio_name();
        let slug = slugify(&studio_name);

        let address = Address {
            street: format!(
                "{} {}",
                self.rng.gen_range(1..=250),
                pools::STREET_NAMES.choose(&mut self.rng).unwrap_or(&"High Street")
            ),
            city: city.name.to_string(),
            postcode: self.postcode(city),
        };

        let coordinates = self.coordinates_near(city);

        let contact_info = ContactInfo {
            email: format!("info@{}.co.uk", slug),
            phone: format!("{}{:03}", city.phone_prefix, self.rng.gen_range(0..1000)),
            website: self
                .rng
                .gen_bool(0.8)
                .then(|| format!("https://www.{}.co.uk", slug)),
            instagram: self.rng.gen_bool(0.9).then(|| {
                let handle: String = slug.replace('-', "_").chars().take(29).collect();
                format!("@{}", handle)
            }),
        };

        let specialty_count = self.rng.gen_range(2..=3);
        let specialties = params
            .style_pool()
            .choose_multiple(&mut self.rng, specialty_count)
            .copied()
            .collect();

        let images = self.studio_images(params, &studio_id);

        Studio {
            studio_id,
            studio_name,
            address,
            coordinates,
            contact_info,
            opening_hours: self.opening_hours(),
            specialties,
            rating: self.rating(params.min_rating),
            review_count: self.rng.gen_range(10..=600),
            established: self.rng.gen_range(1975..=2023),
            images,
            artists: Vec::new(),
            artist_count: 0,
        }
    }

    fn studio_name(&mut self) -> String {
        let first = pools::STUDIO_NAME_FIRST.choose(&mut self.rng).unwrap_or(&"Black");
        let second = pools::STUDIO_NAME_SECOND.choose(&mut self.rng).unwrap_or(&"Anchor");
        let suffix = pools::STUDIO_NAME_SUFFIX.choose(&mut self.rng).unwrap_or(&"Tattoo");
        format!("{} {} {}", first, second, suffix)
    }

    pub(crate) fn postcode(&mut self, city: &pools::CityPool) -> String {
        let area = city.postcode_areas.choose(&mut self.rng).unwrap_or(&"E1");
        let letters: String = (0..2)
            .map(|_| {
                let idx = self.rng.gen_range(0..pools::INWARD_LETTERS.len());
                pools::INWARD_LETTERS[idx] as char
            })
            .collect();
        format!("{} {}{}", area, self.rng.gen_range(0..=9), letters)
    }

    pub(crate) fn coordinates_near(&mut self, city: &pools::CityPool) -> Coordinates {
        let jitter_lat = self.rng.gen_range(-COORDINATE_JITTER..=COORDINATE_JITTER);
        let jitter_lon = self.rng.gen_range(-COORDINATE_JITTER..=COORDINATE_JITTER);
        Coordinates {
            latitude: round6(city.latitude + jitter_lat),
            longitude: round6(city.longitude + jitter_lon),
        }
    }

    fn opening_hours(&mut self) -> BTreeMap<String, String> {
        let opens = *["10:00", "11:00", "12:00"].choose(&mut self.rng).unwrap_or(&"10:00");
        let closes = *["18:00", "19:00", "20:00"].choose(&mut self.rng).unwrap_or(&"18:00");
        let closed_monday = self.rng.gen_bool(0.5);
        let open_sunday = self.rng.gen_bool(0.3);

        WEEKDAYS
            .iter()
            .map(|day| {
                let hours = match *day {
                    "monday" if closed_monday => "closed".to_string(),
                    "sunday" if open_sunday => "12:00-17:00".to_string(),
                    "sunday" => "closed".to_string(),
                    _ => format!("{}-{}", opens, closes),
                };
                (day.to_string(), hours)
            })
            .collect()
    }

    fn studio_images(&mut self, params: &GenerationParams, studio_id: &str) -> Vec<StudioImage> {
        let gallery_count = self.rng.gen_range(1..=4);
        let mut images = vec![
            StudioImage {
                url: format!("{}/studios/{}/exterior-1.webp", params.image_base_url, studio_id),
                kind: StudioImageKind::Exterior,
            },
            StudioImage {
                url: format!("{}/studios/{}/interior-1.webp", params.image_base_url, studio_id),
                kind: StudioImageKind::Interior,
            },
        ];
        images.extend((1..=gallery_count).map(|n| StudioImage {
            url: format!("{}/studios/{}/gallery-{}.webp", params.image_base_url, studio_id, n),
            kind: StudioImageKind::Gallery,
        }));
        images
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::DEFAULT_MIN_RATING;
    use crate::health::checks::{is_uk_phone, is_valid_email, is_valid_opening_hours, UK_BOUNDS, UK_POSTCODE};

    fn params() -> GenerationParams {
        GenerationParams {
            artist_count: 0,
            studio_count: 1,
            styles: vec![],
            cities: vec![],
            min_rating: DEFAULT_MIN_RATING,
            availability: None,
            image_base_url: "http://localhost:4566/images".to_string(),
        }
    }

    #[test]
    fn test_generated_studios_have_uk_postcodes_and_coordinates() {
        let mut generator = DataGenerator::with_seed(21);
        let params = params();

        for _ in 0..200 {
            let studio = generator.generate_studio(&params);
            assert!(
                UK_POSTCODE.is_match(&studio.address.postcode),
                "bad postcode {}",
                studio.address.postcode
            );
            assert!(UK_BOUNDS.contains(studio.coordinates.latitude, studio.coordinates.longitude));
        }
    }

    #[test]
    fn test_generated_contact_details_are_well_formed() {
        let mut generator = DataGenerator::with_seed(4);
        let params = params();

        for _ in 0..50 {
            let studio = generator.generate_studio(&params);
            assert!(is_valid_email(&studio.contact_info.email));
            assert!(is_uk_phone(&studio.contact_info.phone), "bad phone {}", studio.contact_info.phone);
            assert_eq!(studio.opening_hours.len(), 7);
            for hours in studio.opening_hours.values() {
                assert!(is_valid_opening_hours(hours), "bad hours {}", hours);
            }
        }
    }

    #[test]
    fn test_city_filter_pins_location() {
        let mut generator = DataGenerator::with_seed(8);
        let mut params = params();
        params.cities = vec!["London".to_string()];

        for _ in 0..20 {
            let studio = generator.generate_studio(&params);
            assert_eq!(studio.address.city, "London");
        }
    }
}

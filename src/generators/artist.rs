use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::{seq::SliceRandom, Rng};

use super::{pools, DataGenerator, GenerationParams};
use crate::models::{
    Artist, ArtistLocation, AvailabilityStatus, PortfolioImage, Pricing, Studio, TattooStyle,
};

impl<R: Rng> DataGenerator<R> {
    /// Generate a single artist, optionally affiliated with `studio`.
    ///
    /// The studio's own `artists` list is not touched here; batch linking
    /// happens in [`DataGenerator::generate_dataset`].
    pub fn generate_artist(&mut self, params: &GenerationParams, studio: Option<&Studio>) -> Artist {
        let artist_id = self.next_id("artist");
        let first: String = FirstName().fake_with_rng(&mut self.rng);
        let last: String = LastName().fake_with_rng(&mut self.rng);
        let artist_name = format!("{} {}", first, last);

        let style_count = self.rng.gen_range(1..=3);
        let styles: Vec<TattooStyle> = params
            .style_pool()
            .choose_multiple(&mut self.rng, style_count)
            .copied()
            .collect();

        let location = match studio {
            Some(studio) => ArtistLocation {
                city: studio.address.city.clone(),
                coordinates: studio.coordinates,
            },
            None => {
                let city = self.pick_city(params);
                ArtistLocation {
                    city: city.name.to_string(),
                    coordinates: self.coordinates_near(city),
                }
            }
        };

        let portfolio_images = self.portfolio(params, &artist_id, &styles);

        let hourly_rate = self.rng.gen_range(16..=40) * 5;
        let pricing = Pricing {
            hourly_rate,
            minimum_charge: self.rng.gen_range(10..=30) * 5,
            currency: "GBP".to_string(),
        };

        let availability = params.availability.unwrap_or_else(|| {
            *AvailabilityStatus::ALL
                .choose(&mut self.rng)
                .unwrap_or(&AvailabilityStatus::Available)
        });

        let handle: String = format!("{}{}_ink", first, last)
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .take(30)
            .collect();

        let style_labels: Vec<String> = styles.iter().map(|s| s.label().to_lowercase()).collect();
        let sentence: String = Sentence(4..8).fake_with_rng(&mut self.rng);
        let years_experience = self.rng.gen_range(1..=25);
        let bio = format!(
            "{} specialises in {} work with {} years behind the machine. {}",
            first,
            style_labels.join(" and "),
            years_experience,
            sentence
        );

        Artist {
            artist_id,
            artist_name,
            studio_id: studio.map(|s| s.studio_id.clone()),
            studio_name: studio.map(|s| s.studio_name.clone()),
            styles,
            portfolio_images,
            rating: self.rating(params.min_rating),
            review_count: self.rng.gen_range(5..=400),
            pricing,
            availability,
            location,
            instagram_handle: format!("@{}", handle),
            bio,
            years_experience,
        }
    }

    fn portfolio(
        &mut self,
        params: &GenerationParams,
        artist_id: &str,
        styles: &[TattooStyle],
    ) -> Vec<PortfolioImage> {
        let count = self.rng.gen_range(3..=8);
        (1..=count)
            .map(|n| {
                let style = *styles.choose(&mut self.rng).unwrap_or(&TattooStyle::Traditional);
                let subject = pools::TATTOO_SUBJECTS
                    .choose(&mut self.rng)
                    .unwrap_or(&"a single blooming rose");
                PortfolioImage {
                    url: format!(
                        "{}/artists/{}/{}/{}.webp",
                        params.image_base_url,
                        artist_id,
                        style.as_str(),
                        n
                    ),
                    style,
                    description: format!("{} in {} style", subject, style.label().to_lowercase()),
                }
            })
            .collect()
    }
}

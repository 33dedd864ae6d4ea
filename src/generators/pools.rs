//! Static vocabularies the generators draw from.

#[derive(Debug, Clone, Copy)]
pub struct CityPool {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub postcode_areas: &'static [&'static str],
    /// Ofcom drama-range prefix, completed with three random digits
    pub phone_prefix: &'static str,
}

pub const CITIES: &[CityPool] = &[
    CityPool {
        name: "London",
        latitude: 51.5074,
        longitude: -0.1278,
        postcode_areas: &["E1", "N1", "SE1", "SW1A", "W1", "EC1V", "WC2H"],
        phone_prefix: "020 7946 0",
    },
    CityPool {
        name: "Manchester",
        latitude: 53.4808,
        longitude: -2.2426,
        postcode_areas: &["M1", "M4", "M15"],
        phone_prefix: "0161 496 0",
    },
    CityPool {
        name: "Birmingham",
        latitude: 52.4862,
        longitude: -1.8904,
        postcode_areas: &["B1", "B5", "B12"],
        phone_prefix: "0121 496 0",
    },
    CityPool {
        name: "Leeds",
        latitude: 53.8008,
        longitude: -1.5491,
        postcode_areas: &["LS1", "LS2", "LS6"],
        phone_prefix: "0113 496 0",
    },
    CityPool {
        name: "Glasgow",
        latitude: 55.8642,
        longitude: -4.2518,
        postcode_areas: &["G1", "G2", "G12"],
        phone_prefix: "0141 496 0",
    },
    CityPool {
        name: "Edinburgh",
        latitude: 55.9533,
        longitude: -3.1883,
        postcode_areas: &["EH1", "EH2", "EH8"],
        phone_prefix: "0131 496 0",
    },
    CityPool {
        name: "Bristol",
        latitude: 51.4545,
        longitude: -2.5879,
        postcode_areas: &["BS1", "BS2", "BS8"],
        phone_prefix: "0117 496 0",
    },
    CityPool {
        name: "Liverpool",
        latitude: 53.4084,
        longitude: -2.9916,
        postcode_areas: &["L1", "L2", "L8"],
        phone_prefix: "0151 496 0",
    },
    CityPool {
        name: "Brighton",
        latitude: 50.8225,
        longitude: -0.1372,
        postcode_areas: &["BN1", "BN2"],
        phone_prefix: "01273 900",
    },
    CityPool {
        name: "Cardiff",
        latitude: 51.4816,
        longitude: -3.1791,
        postcode_areas: &["CF10", "CF11", "CF24"],
        phone_prefix: "029 2018 0",
    },
    CityPool {
        name: "Newcastle",
        latitude: 54.9783,
        longitude: -1.6178,
        postcode_areas: &["NE1", "NE2"],
        phone_prefix: "0191 498 0",
    },
    CityPool {
        name: "Nottingham",
        latitude: 52.9548,
        longitude: -1.1581,
        postcode_areas: &["NG1", "NG7"],
        phone_prefix: "0115 496 0",
    },
];

pub fn city(name: &str) -> Option<&'static CityPool> {
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Letters allowed in the inward code of a UK postcode
pub const INWARD_LETTERS: &[u8] = b"ABDEFGHJLNPQRSTUWXYZ";

pub const STREET_NAMES: &[&str] = &[
    "High Street",
    "Church Road",
    "Station Road",
    "Victoria Street",
    "Market Street",
    "Mill Lane",
    "King Street",
    "Queen Street",
    "Canal Street",
    "Brick Lane",
    "Camden High Street",
    "Oldham Street",
    "Park Row",
    "Albert Road",
];

pub const STUDIO_NAME_FIRST: &[&str] = &[
    "Black", "Iron", "Sacred", "Golden", "Electric", "Crimson", "Northern", "Wild", "Silver",
    "Lucky", "Midnight", "Velvet",
];

pub const STUDIO_NAME_SECOND: &[&str] = &[
    "Anchor", "Rose", "Needle", "Swallow", "Dagger", "Lantern", "Serpent", "Moth", "Crown",
    "Compass", "Raven", "Lotus",
];

pub const STUDIO_NAME_SUFFIX: &[&str] = &["Tattoo", "Tattoo Studio", "Ink", "Tattoo Parlour"];

/// Portfolio subjects, combined with a style to describe a piece
pub const TATTOO_SUBJECTS: &[&str] = &[
    "a majestic lion's face",
    "a howling wolf silhouette",
    "a coiled rattlesnake",
    "an octopus wrapping a skull",
    "a soaring eagle",
    "a koi fish swimming upstream",
    "a death's head moth",
    "a rising phoenix",
    "a Japanese Oni mask",
    "a single blooming rose",
    "a lotus flower",
    "a cherry blossom branch",
    "the phases of the moon",
    "a classic anchor entwined with rope",
    "a vintage pirate ship on a stormy sea",
    "a detailed compass rose",
    "a melting hourglass",
    "a dagger piercing a heart",
    "an anatomical heart",
    "a hyper-detailed human skull",
    "a complex mandala",
    "a stained glass window design",
    "a swallow in flight",
    "a Celtic knot",
    "a geometric stag",
    "a panther",
    "a sacred heart",
    "a ship's wheel",
    "a lighthouse on a cliff",
    "a bouquet of wildflowers",
];

use serde::{Deserialize, Serialize};

/// Controlled vocabulary for artist styles and studio specialties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TattooStyle {
    OldSchool,
    Traditional,
    NewSchool,
    NeoTraditional,
    Tribal,
    Blackwork,
    Dotwork,
    Geometric,
    Japanese,
    Lettering,
    Biomechanical,
    Watercolour,
    Floral,
    Fineline,
    Realism,
    Minimalist,
    Surrealism,
    Portrait,
    Sketch,
    Illustrative,
    Ornamental,
    TrashPolka,
}

impl TattooStyle {
    pub const ALL: [TattooStyle; 22] = [
        Self::OldSchool,
        Self::Traditional,
        Self::NewSchool,
        Self::NeoTraditional,
        Self::Tribal,
        Self::Blackwork,
        Self::Dotwork,
        Self::Geometric,
        Self::Japanese,
        Self::Lettering,
        Self::Biomechanical,
        Self::Watercolour,
        Self::Floral,
        Self::Fineline,
        Self::Realism,
        Self::Minimalist,
        Self::Surrealism,
        Self::Portrait,
        Self::Sketch,
        Self::Illustrative,
        Self::Ornamental,
        Self::TrashPolka,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OldSchool => "old_school",
            Self::Traditional => "traditional",
            Self::NewSchool => "new_school",
            Self::NeoTraditional => "neo_traditional",
            Self::Tribal => "tribal",
            Self::Blackwork => "blackwork",
            Self::Dotwork => "dotwork",
            Self::Geometric => "geometric",
            Self::Japanese => "japanese",
            Self::Lettering => "lettering",
            Self::Biomechanical => "biomechanical",
            Self::Watercolour => "watercolour",
            Self::Floral => "floral",
            Self::Fineline => "fineline",
            Self::Realism => "realism",
            Self::Minimalist => "minimalist",
            Self::Surrealism => "surrealism",
            Self::Portrait => "portrait",
            Self::Sketch => "sketch",
            Self::Illustrative => "illustrative",
            Self::Ornamental => "ornamental",
            Self::TrashPolka => "trash_polka",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|style| style.as_str() == s)
    }

    /// Human readable label, e.g. "Neo Traditional"
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<TattooStyle> for String {
    fn from(style: TattooStyle) -> String {
        style.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Waitlist,
    BooksClosed,
}

impl AvailabilityStatus {
    pub const ALL: [AvailabilityStatus; 3] = [Self::Available, Self::Waitlist, Self::BooksClosed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Waitlist => "waitlist",
            Self::BooksClosed => "books_closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "waitlist" => Some(Self::Waitlist),
            "books_closed" => Some(Self::BooksClosed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioImageKind {
    Exterior,
    Interior,
    Gallery,
}

impl StudioImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exterior => "exterior",
            Self::Interior => "interior",
            Self::Gallery => "gallery",
        }
    }
}

/// The two record types held in the backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Artist,
    Studio,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Studio => "studio",
        }
    }

    /// Partition key prefix used in the single-table layout
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Artist => "ARTIST#",
            Self::Studio => "STUDIO#",
        }
    }

    /// Field holding the record identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::Artist => "artistId",
            Self::Studio => "studioId",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_round_trip_through_str() {
        for style in TattooStyle::ALL {
            assert_eq!(TattooStyle::from_str(style.as_str()), Some(style));
        }
        assert_eq!(TattooStyle::from_str("cubism"), None);
    }

    #[test]
    fn test_style_serde_matches_as_str() {
        let json = serde_json::to_string(&TattooStyle::TrashPolka).unwrap();
        assert_eq!(json, "\"trash_polka\"");
    }

    #[test]
    fn test_style_label() {
        assert_eq!(TattooStyle::NeoTraditional.label(), "Neo Traditional");
        assert_eq!(TattooStyle::Fineline.label(), "Fineline");
    }
}

pub mod artist;
pub mod dataset;
pub mod enums;
pub mod studio;

pub use artist::{Artist, ArtistLocation, PortfolioImage, Pricing};
pub use dataset::{Dataset, DatasetMetadata, ExportDocument};
pub use enums::{AvailabilityStatus, EntityKind, StudioImageKind, TattooStyle};
pub use studio::{Address, ContactInfo, Coordinates, Studio, StudioImage, WEEKDAYS};

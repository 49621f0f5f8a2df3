//! In-memory profile directory with geocoding-backed editing.
//!
//! ```no_run
//! use profile_directory::{
//!     Directory, GeocoderConfig, MapboxGeocoder, ProfileField, ProfileStore,
//! };
//!
//! # async fn run() -> profile_directory::Result<()> {
//! let config = GeocoderConfig::from_env()?;
//! let geocoder = MapboxGeocoder::new(&config)?;
//! let mut directory = Directory::new(ProfileStore::seeded()?, geocoder);
//!
//! directory.start_create()?;
//! directory.update_field(ProfileField::Name, "Larry")?;
//! directory.update_field(ProfileField::Description, "Founder")?;
//! directory.update_field(ProfileField::Address, "1600 Amphitheatre Parkway")?;
//! directory.update_field(ProfileField::Image, "https://example.com/l.jpg")?;
//! let saved = directory.save().await?;
//! println!("{} is at {}", saved.name, saved.coordinates);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod directory;
mod errors;
pub mod geocode;
pub mod map;
pub mod profile;
pub mod seed;
pub mod session;
pub mod storage;

pub use config::GeocoderConfig;
pub use directory::Directory;
pub use errors::{DirectoryError, GeocodeError, Result};
pub use geocode::{Geocoder, MapboxGeocoder};
pub use profile::{
    Coordinates, Profile, ProfileDraft, ProfileField, ProfileId, UNSET_ID,
};
pub use session::{EditSession, SessionState};
pub use storage::{ProfileStorage, ProfileStore};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DirectoryError, Result};

pub type ProfileId = u64;

/// Id carried by a profile that has never been saved.
pub const UNSET_ID: ProfileId = 0;

/// A point on the map, stored as a `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub image: String,
    pub coordinates: Coordinates,
}

/// Text fields a user can change while editing a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Description,
    Address,
    Image,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Description,
        ProfileField::Address,
        ProfileField::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Description => "description",
            ProfileField::Address => "address",
            ProfileField::Image => "image",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                DirectoryError::Other(anyhow::anyhow!(
                    "unknown profile field {:?}",
                    s
                ))
            })
    }
}

/// In-progress copy of a profile held by an edit session.
///
/// Unlike [`Profile`], coordinates may be missing: they are filled in
/// by geocoding the address on save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileDraft {
    pub id: ProfileId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub image: String,
    pub coordinates: Option<Coordinates>,
}

impl ProfileDraft {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id == UNSET_ID
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Description => &self.description,
            ProfileField::Address => &self.address,
            ProfileField::Image => &self.image,
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Description => &mut self.description,
            ProfileField::Address => &mut self.address,
            ProfileField::Image => &mut self.image,
        };
        *slot = value;
    }

    /// Required fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DirectoryError::Validation { missing })
        }
    }

    /// Coordinates that can be committed as they are. `None` means the
    /// address has to be geocoded first.
    pub fn usable_coordinates(&self) -> Option<Coordinates> {
        self.coordinates.filter(|c| c.is_valid())
    }

    pub fn into_profile(self, coordinates: Coordinates) -> Profile {
        Profile {
            id: self.id,
            name: self.name,
            description: self.description,
            address: self.address,
            image: self.image,
            coordinates,
        }
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            description: profile.description.clone(),
            address: profile.address.clone(),
            image: profile.image.clone(),
            coordinates: Some(profile.coordinates),
        }
    }
}

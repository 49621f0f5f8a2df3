use serde::Serialize;

use crate::profile::{Coordinates, Profile, ProfileId};
use crate::storage::ProfileStorage;

pub const DEFAULT_CENTER: Coordinates = Coordinates {
    longitude: -95.7129,
    latitude: 37.0902,
};
pub const DEFAULT_ZOOM: f64 = 3.0;
pub const FOCUS_ZOOM: f64 = 12.0;

/// A pin handed to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub id: ProfileId,
    pub longitude: f64,
    pub latitude: f64,
    pub label: String,
}

impl From<&Profile> for MarkerDescriptor {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            longitude: profile.coordinates.longitude,
            latitude: profile.coordinates.latitude,
            label: profile.name.clone(),
        }
    }
}

/// Where the map camera should fly to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

impl CameraTarget {
    pub fn focused_on(coordinates: Coordinates) -> Self {
        Self {
            longitude: coordinates.longitude,
            latitude: coordinates.latitude,
            zoom: FOCUS_ZOOM,
        }
    }
}

impl Default for CameraTarget {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_CENTER.longitude,
            latitude: DEFAULT_CENTER.latitude,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Markers for every profile, in list order.
pub fn markers(profiles: &[Profile]) -> Vec<MarkerDescriptor> {
    profiles.iter().map(MarkerDescriptor::from).collect()
}

/// Camera and selection state of the map next to the profile list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapView {
    camera: CameraTarget,
    selected: Option<ProfileId>,
}

impl MapView {
    pub fn camera(&self) -> CameraTarget {
        self.camera
    }

    pub fn selected(&self) -> Option<ProfileId> {
        self.selected
    }

    pub fn focus(&mut self, profile: &Profile) -> CameraTarget {
        self.camera = CameraTarget::focused_on(profile.coordinates);
        self.selected = Some(profile.id);
        self.camera
    }

    /// Handle a "marker selected" event coming back from the widget.
    /// Ids that are no longer in the store leave the view untouched.
    pub fn marker_selected<S: ProfileStorage>(
        &mut self,
        store: &S,
        id: ProfileId,
    ) -> Option<CameraTarget> {
        let profile = store.find(id)?;
        Some(self.focus(profile))
    }

    /// Close the popup; the camera stays where it is.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it points at a profile that is gone.
    pub fn retain_existing<S: ProfileStorage>(&mut self, store: &S) {
        if let Some(id) = self.selected {
            if store.find(id).is_none() {
                self.selected = None;
            }
        }
    }
}

use crate::config::GeocoderConfig;
use crate::geocode::{Geocoder, MapboxGeocoder};
use crate::map::{self, CameraTarget, MapView, MarkerDescriptor};
use crate::profile::{
    Coordinates, Profile, ProfileDraft, ProfileField, ProfileId,
};
use crate::session::{
    EditSession, PendingLookup, SaveOutcome, SaveStep, SessionState,
};
use crate::storage::{ProfileStorage, ProfileStore};
use crate::{GeocodeError, Result};

/// Root of the application state.
///
/// Owns the single [`ProfileStore`] and the single [`EditSession`]; every
/// view reads from here and every change goes through one of the intent
/// methods below.
#[derive(Debug)]
pub struct Directory<G> {
    store: ProfileStore,
    session: EditSession,
    geocoder: G,
    map: MapView,
}

impl Directory<MapboxGeocoder> {
    /// Directory backed by the Mapbox geocoder, with the lookup timeout
    /// taken from the same configuration.
    pub fn from_config(
        store: ProfileStore,
        config: &GeocoderConfig,
    ) -> Result<Self> {
        let geocoder = MapboxGeocoder::new(config)?;
        Ok(Self::with_session(
            store,
            geocoder,
            EditSession::with_timeout(config.timeout()),
        ))
    }
}

impl<G: Geocoder> Directory<G> {
    pub fn new(store: ProfileStore, geocoder: G) -> Self {
        Self::with_session(store, geocoder, EditSession::new())
    }

    pub fn with_session(
        store: ProfileStore,
        geocoder: G,
        session: EditSession,
    ) -> Self {
        Self {
            store,
            session,
            geocoder,
            map: MapView::default(),
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn profiles(&self) -> &[Profile] {
        self.store.list()
    }

    /// Profiles shown by the list view for the current search box.
    pub fn search(&self, term: &str) -> Vec<&Profile> {
        self.store.search(term)
    }

    /// Profile shown by the detail view for a route parameter.
    pub fn details(&self, param: &str) -> Option<&Profile> {
        self.store.find_by_param(param)
    }

    pub fn markers(&self) -> Vec<MarkerDescriptor> {
        map::markers(self.store.list())
    }

    pub fn camera(&self) -> CameraTarget {
        self.map.camera()
    }

    pub fn selected(&self) -> Option<&Profile> {
        self.map.selected().and_then(|id| self.store.find(id))
    }

    pub fn show_on_map(&mut self, id: ProfileId) -> Option<CameraTarget> {
        self.map.marker_selected(&self.store, id)
    }

    pub fn close_popup(&mut self) {
        self.map.clear_selection();
    }

    pub fn start_create(&mut self) -> Result<&ProfileDraft> {
        self.session.start_create()
    }

    pub fn start_edit(&mut self, id: ProfileId) -> Result<&ProfileDraft> {
        self.session.start_edit(&self.store, id)
    }

    pub fn update_field<S: Into<String>>(
        &mut self,
        field: ProfileField,
        value: S,
    ) -> Result<()> {
        self.session.set_field(field, value)
    }

    pub fn update_coordinates(
        &mut self,
        coordinates: Option<Coordinates>,
    ) -> Result<()> {
        self.session.set_coordinates(coordinates)
    }

    pub async fn save(&mut self) -> Result<Profile> {
        self.session.save(&mut self.store, &self.geocoder).await
    }

    /// First half of a save for callers that run the lookup themselves,
    /// e.g. on a spawned task, so the dialog stays cancellable meanwhile.
    pub fn begin_save(&mut self) -> Result<SaveStep> {
        self.session.begin_save(&mut self.store)
    }

    /// Apply the outcome of a lookup started by [`Directory::begin_save`].
    /// Outcomes arriving after [`Directory::cancel`] are discarded.
    pub fn finish_save(
        &mut self,
        lookup: PendingLookup,
        outcome: std::result::Result<Coordinates, GeocodeError>,
    ) -> Result<SaveOutcome> {
        self.session.finish_save(lookup, outcome, &mut self.store)
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    pub fn is_dialog_open(&self) -> bool {
        self.session.state() != SessionState::Idle
    }

    pub fn delete(&mut self, id: ProfileId) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.map.retain_existing(&self.store);
        }
        removed
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::watch;

use crate::profile::{Profile, ProfileId, UNSET_ID};
use crate::seed::initial_profiles;
use crate::storage::base_storage::ProfileStorage;
use crate::{DirectoryError, Result};

const LOG_PREFIX: &str = "[profile-store]";

/// Latest list of profiles as seen by readers of the store.
pub type Snapshot = Arc<Vec<Profile>>;

/// In-memory, insertion-ordered collection of profiles.
///
/// Every mutation publishes a fresh [`Snapshot`] so that views holding a
/// receiver from [`ProfileStore::subscribe`] always observe the latest
/// list.
#[derive(Debug)]
pub struct ProfileStore {
    entries: Vec<Profile>,
    last_issued: ProfileId,
    snapshot: watch::Sender<Snapshot>,
}

impl ProfileStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            entries: Vec::new(),
            last_issued: UNSET_ID,
            snapshot,
        }
    }

    /// Create a store holding `profiles`, which must already have
    /// distinct ids and valid coordinates.
    pub fn with_profiles(profiles: Vec<Profile>) -> Result<Self> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if profile.id == UNSET_ID || !seen.insert(profile.id) {
                return Err(DirectoryError::DuplicateId(profile.id));
            }
            if !profile.coordinates.is_valid() {
                return Err(DirectoryError::InvalidCoordinates);
            }
        }

        let mut store = Self::new();
        store.entries = profiles;
        store.publish();
        log::info!(
            "{} initialized with {} profiles",
            LOG_PREFIX,
            store.entries.len()
        );
        Ok(store)
    }

    /// Store initialized from the built-in seed list.
    pub fn seeded() -> Result<Self> {
        Self::with_profiles(initial_profiles())
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Profiles whose name, description or address contains `term`,
    /// ignoring case. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Profile> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Look up a profile by an id given as text, e.g. a route parameter.
    pub fn find_by_param(&self, param: &str) -> Option<&Profile> {
        param
            .trim()
            .parse::<ProfileId>()
            .ok()
            .and_then(|id| self.find(id))
    }

    fn position(&self, id: ProfileId) -> Option<usize> {
        self.entries.iter().position(|p| p.id == id)
    }

    fn next_id(&mut self) -> Result<ProfileId> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis()
            as ProfileId;
        let max_existing = self
            .entries
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(UNSET_ID);

        let id = now
            .max(self.last_issued.saturating_add(1))
            .max(max_existing.saturating_add(1));
        self.last_issued = id;
        Ok(id)
    }

    fn publish(&self) {
        self.snapshot
            .send_replace(Arc::new(self.entries.clone()));
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStorage for ProfileStore {
    fn list(&self) -> &[Profile] {
        &self.entries
    }

    fn find(&self, id: ProfileId) -> Option<&Profile> {
        self.entries.iter().find(|p| p.id == id)
    }

    fn upsert(&mut self, mut profile: Profile) -> Result<Profile> {
        if !profile.coordinates.is_valid() {
            return Err(DirectoryError::InvalidCoordinates);
        }

        if profile.id == UNSET_ID {
            profile.id = self.next_id()?;
            self.entries.push(profile.clone());
            log::debug!("{} added profile {}", LOG_PREFIX, profile.id);
        } else {
            let index = self
                .position(profile.id)
                .ok_or(DirectoryError::NotFound(profile.id))?;
            self.entries[index] = profile.clone();
            log::debug!("{} updated profile {}", LOG_PREFIX, profile.id);
        }

        self.publish();
        Ok(profile)
    }

    fn delete(&mut self, id: ProfileId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                self.publish();
                log::debug!("{} deleted profile {}", LOG_PREFIX, id);
                true
            }
            None => false,
        }
    }
}

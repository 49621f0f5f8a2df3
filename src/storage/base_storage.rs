use crate::profile::{Profile, ProfileId};
use crate::Result;

pub trait ProfileStorage {
    /// All profiles in insertion order.
    fn list(&self) -> &[Profile];

    /// Look up a profile by its id.
    fn find(&self, id: ProfileId) -> Option<&Profile>;

    /// Create or update a profile.
    ///
    /// A profile carrying the unset id is appended under a freshly
    /// assigned id. Any other id must already exist and is replaced
    /// in place, keeping its position.
    fn upsert(&mut self, profile: Profile) -> Result<Profile>;

    /// Remove a profile, returning whether anything was removed.
    /// Removing an absent id is not an error.
    fn delete(&mut self, id: ProfileId) -> bool;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }
}

//! Staging of a single create-or-edit operation.
//!
//! A session moves through `Idle -> Editing -> (Resolving) -> Committing
//! -> Idle`. Saving is split in two halves around the only suspend
//! point, the address lookup:
//!
//! * [`EditSession::begin_save`] validates the draft and either commits
//!   right away or hands out a [`PendingLookup`] ticket;
//! * [`EditSession::finish_save`] applies the lookup outcome, unless the
//!   ticket went stale because the session was cancelled meanwhile.
//!
//! [`EditSession::save`] drives both halves for callers that do not need
//! to interleave a cancellation.

use std::time::Duration;

use crate::geocode::Geocoder;
use crate::profile::{
    Coordinates, Profile, ProfileDraft, ProfileField, ProfileId,
};
use crate::storage::ProfileStorage;
use crate::{DirectoryError, GeocodeError, Result};

const LOG_PREFIX: &str = "[edit-session]";

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Editing,
    Resolving,
    Committing,
}

#[derive(Debug)]
enum Stage {
    Idle,
    Editing(ProfileDraft),
    Resolving { draft: ProfileDraft, ticket: u64 },
    Committing,
}

/// An address lookup the session is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    ticket: u64,
    address: String,
}

impl PendingLookup {
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStep {
    /// The draft already had coordinates and was committed.
    Committed(Profile),
    /// The address has to be geocoded before the draft can be committed.
    Resolve(PendingLookup),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Committed(Profile),
    /// The lookup result arrived after the session was cancelled or
    /// restarted and was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct EditSession {
    stage: Stage,
    generation: u64,
    lookup_timeout: Duration,
    last_error: Option<String>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(lookup_timeout: Duration) -> Self {
        Self {
            stage: Stage::Idle,
            generation: 0,
            lookup_timeout,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.stage {
            Stage::Idle => SessionState::Idle,
            Stage::Editing(_) => SessionState::Editing,
            Stage::Resolving { .. } => SessionState::Resolving,
            Stage::Committing => SessionState::Committing,
        }
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        match &self.stage {
            Stage::Editing(draft) | Stage::Resolving { draft, .. } => {
                Some(draft)
            }
            _ => None,
        }
    }

    /// Message of the last failed save, kept while the user corrects the
    /// draft.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn start_create(&mut self) -> Result<&ProfileDraft> {
        self.open(ProfileDraft::blank())
    }

    pub fn start_edit<S: ProfileStorage>(
        &mut self,
        store: &S,
        id: ProfileId,
    ) -> Result<&ProfileDraft> {
        self.ensure_not_saving()?;
        let profile = store.find(id).ok_or(DirectoryError::NotFound(id))?;
        self.open(ProfileDraft::from(profile))
    }

    pub fn set_field<S: Into<String>>(
        &mut self,
        field: ProfileField,
        value: S,
    ) -> Result<()> {
        self.editing_draft()?.set_field(field, value.into());
        Ok(())
    }

    pub fn set_coordinates(
        &mut self,
        coordinates: Option<Coordinates>,
    ) -> Result<()> {
        self.editing_draft()?.coordinates = coordinates;
        Ok(())
    }

    /// Abandon the session. A lookup still in flight is ignored once it
    /// completes.
    pub fn cancel(&mut self) {
        if !matches!(self.stage, Stage::Idle) {
            log::debug!("{} cancelled in {:?}", LOG_PREFIX, self.state());
        }
        self.stage = Stage::Idle;
        self.generation += 1;
        self.last_error = None;
    }

    pub fn begin_save<S: ProfileStorage>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveStep> {
        let draft = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Editing(draft) => draft,
            other => {
                let err = match other {
                    Stage::Idle => DirectoryError::NoActiveSession,
                    _ => DirectoryError::SessionBusy,
                };
                self.stage = other;
                return Err(err);
            }
        };

        if let Err(e) = draft.validate() {
            self.stage = Stage::Editing(draft);
            return Err(self.surface(e));
        }

        match draft.usable_coordinates() {
            Some(coordinates) => self
                .commit(store, draft, coordinates)
                .map(SaveStep::Committed),
            None => {
                self.generation += 1;
                let lookup = PendingLookup {
                    ticket: self.generation,
                    address: draft.address.trim().to_owned(),
                };
                log::debug!(
                    "{} resolving coordinates of {:?}",
                    LOG_PREFIX,
                    lookup.address
                );
                self.stage = Stage::Resolving {
                    draft,
                    ticket: self.generation,
                };
                Ok(SaveStep::Resolve(lookup))
            }
        }
    }

    pub fn finish_save<S: ProfileStorage>(
        &mut self,
        lookup: PendingLookup,
        outcome: std::result::Result<Coordinates, GeocodeError>,
        store: &mut S,
    ) -> Result<SaveOutcome> {
        let draft = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Resolving { draft, ticket } if ticket == lookup.ticket => {
                draft
            }
            other => {
                self.stage = other;
                log::debug!(
                    "{} dropping stale lookup of {:?}",
                    LOG_PREFIX,
                    lookup.address
                );
                return Ok(SaveOutcome::Discarded);
            }
        };

        match outcome {
            Ok(coordinates) => self
                .commit(store, draft, coordinates)
                .map(SaveOutcome::Committed),
            Err(e) => {
                self.stage = Stage::Editing(draft);
                Err(self.surface(e.into()))
            }
        }
    }

    /// Validate, geocode when needed and commit the draft.
    ///
    /// The lookup is bounded by the session timeout; expiry is reported
    /// as a transport failure.
    pub async fn save<S, G>(
        &mut self,
        store: &mut S,
        geocoder: &G,
    ) -> Result<Profile>
    where
        S: ProfileStorage,
        G: Geocoder,
    {
        let lookup = match self.begin_save(store)? {
            SaveStep::Committed(profile) => return Ok(profile),
            SaveStep::Resolve(lookup) => lookup,
        };

        let outcome = match tokio::time::timeout(
            self.lookup_timeout,
            geocoder.resolve(lookup.address()),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(GeocodeError::Transport(format!(
                "lookup timed out after {:?}",
                self.lookup_timeout
            ))),
        };

        match self.finish_save(lookup, outcome, store)? {
            SaveOutcome::Committed(profile) => Ok(profile),
            SaveOutcome::Discarded => Err(DirectoryError::NoActiveSession),
        }
    }

    fn open(&mut self, draft: ProfileDraft) -> Result<&ProfileDraft> {
        self.ensure_not_saving()?;
        log::debug!(
            "{} editing {}",
            LOG_PREFIX,
            if draft.is_new() {
                "new profile".to_owned()
            } else {
                format!("profile {}", draft.id)
            }
        );
        self.generation += 1;
        self.last_error = None;
        self.stage = Stage::Editing(draft);
        match &self.stage {
            Stage::Editing(draft) => Ok(draft),
            _ => Err(DirectoryError::NoActiveSession),
        }
    }

    fn ensure_not_saving(&self) -> Result<()> {
        match self.stage {
            Stage::Resolving { .. } | Stage::Committing => {
                Err(DirectoryError::SessionBusy)
            }
            _ => Ok(()),
        }
    }

    fn editing_draft(&mut self) -> Result<&mut ProfileDraft> {
        match &mut self.stage {
            Stage::Editing(draft) => Ok(draft),
            Stage::Idle => Err(DirectoryError::NoActiveSession),
            _ => Err(DirectoryError::SessionBusy),
        }
    }

    fn commit<S: ProfileStorage>(
        &mut self,
        store: &mut S,
        draft: ProfileDraft,
        coordinates: Coordinates,
    ) -> Result<Profile> {
        self.stage = Stage::Committing;
        match store.upsert(draft.clone().into_profile(coordinates)) {
            Ok(profile) => {
                log::info!("{} saved profile {}", LOG_PREFIX, profile.id);
                self.stage = Stage::Idle;
                self.last_error = None;
                Ok(profile)
            }
            Err(e) => {
                self.stage = Stage::Editing(draft);
                Err(self.surface(e))
            }
        }
    }

    fn surface(&mut self, error: DirectoryError) -> DirectoryError {
        log::warn!("{} save failed: {}", LOG_PREFIX, error);
        self.last_error = Some(error.to_string());
        error
    }
}

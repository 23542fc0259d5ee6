//! In-memory view of the remote note list.
//!
//! The store is replaced wholesale on every successful fetch; it never merges.
//! A refresh counter records that the remote state changed, and
//! [`NoteStore::needs_fetch`] is the subscription that turns a counter change
//! into a new fetch.

use crate::remote::NotesApi;
use crate::{Note, NoteId, Result};
use log::{error, trace, warn};

/// Message shown when the note list could not be fetched
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch notes. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    Idle,
    Loading,
    Error(String),
}

/// Handle for one in-flight `list_notes` call. Only the newest ticket may
/// update the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    refresh: u64,
}

#[derive(Debug)]
pub struct NoteStore {
    notes: Vec<Note>,
    state: StoreState,
    refresh_counter: u64,
    // Counter value served by the newest fetch, `None` before the first one
    fetched_refresh: Option<u64>,
    generation: u64,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            notes: Vec::new(),
            state: StoreState::Idle,
            refresh_counter: 0,
            fetched_refresh: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    #[must_use]
    pub const fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, StoreState::Loading)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            StoreState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    #[must_use]
    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// True before the first fetch and whenever the refresh counter moved
    /// past the value the newest fetch was started for
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        self.fetched_refresh != Some(self.refresh_counter)
    }

    /// Marks the remote list as changed
    pub fn request_refresh(&mut self) {
        self.refresh_counter += 1;
        trace!("Refresh counter is now {}", self.refresh_counter);
    }

    /// Enters `Loading` and hands out a ticket that supersedes every earlier one
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.fetched_refresh = Some(self.refresh_counter);
        self.state = StoreState::Loading;
        trace!(
            "Fetch #{} started for refresh {}",
            self.generation, self.refresh_counter
        );
        FetchTicket {
            generation: self.generation,
            refresh: self.refresh_counter,
        }
    }

    /// Applies the outcome of a fetch. Returns `false` and changes nothing if
    /// a newer fetch has started since `ticket` was issued.
    ///
    /// On failure the previous list is kept and the state carries
    /// `FETCH_FAILED_MESSAGE`; the error itself is only logged.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Note>>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "Ignoring stale fetch #{} (newest is #{})",
                ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(notes) => {
                trace!(
                    "Fetch #{} for refresh {} returned {} notes",
                    ticket.generation,
                    ticket.refresh,
                    notes.len()
                );
                self.notes = notes;
                self.state = StoreState::Idle;
            }
            Err(e) => {
                error!("Failed fetching notes: {e}");
                self.state = StoreState::Error(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Fetches the full list from `api` and replaces local state with it
    pub async fn refresh(&mut self, api: &dyn NotesApi) {
        let ticket = self.begin_fetch();
        let result = api.list_notes().await;
        self.finish_fetch(ticket, result);
    }

    /// Drops the note with `id` from the local list. Removing an absent id is
    /// a no-op. Returns whether anything was removed.
    pub fn remove_local(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| &note.id != id);
        let removed = self.notes.len() != before;
        if !removed {
            trace!("Note #{id} was not in the local list");
        }
        removed
    }
}

use crate::filter::filter_notes;
use crate::remote::NotesApi;
use crate::session::{EditingSession, SubmitOutcome};
use crate::store::NoteStore;
use crate::{Note, NoteId, NoteValidationError, Result};
use log::{info, trace};

/// Owns all client state and applies the sync policy: creates and updates
/// are followed by a full re-fetch, deletes only remove the note locally.
pub struct NotesApp {
    api: Box<dyn NotesApi>,
    store: NoteStore,
    session: EditingSession,
    search_term: String,
}

impl NotesApp {
    #[must_use]
    pub fn new(api: Box<dyn NotesApi>) -> Self {
        Self {
            api,
            store: NoteStore::new(),
            session: EditingSession::new(),
            search_term: String::new(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &NoteStore {
        &self.store
    }

    #[must_use]
    pub const fn session(&self) -> &EditingSession {
        &self.session
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Notes matching the current search term, in server order
    #[must_use]
    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(self.store.notes(), &self.search_term)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        trace!("Search term: {:?}", self.search_term);
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.session.set_title(title);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.session.set_content(content);
    }

    /// Fetches the note list if nothing was fetched yet or the refresh counter
    /// changed. Returns whether a fetch ran. Failures end up in the store's
    /// error state, never here.
    pub async fn sync(&mut self) -> bool {
        if !self.store.needs_fetch() {
            return false;
        }
        self.store.refresh(self.api.as_ref()).await;
        true
    }

    /// Forces a full re-fetch
    pub async fn reload(&mut self) {
        self.store.request_refresh();
        self.sync().await;
    }

    /// Selects a note from the current list for editing
    ///
    /// # Errors
    ///
    /// Returns `NoteValidationError::NoteNotFound` if `id` is not in the list
    pub fn start_edit(&mut self, id: &NoteId) -> Result<()> {
        let note = self
            .store
            .find(id)
            .ok_or_else(|| NoteValidationError::NoteNotFound(id.clone()))?;
        self.session.start_edit(note);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    /// Creates or updates depending on edit mode, then re-fetches the list
    ///
    /// # Errors
    ///
    /// Validation errors (nothing is sent) and transport errors are returned
    /// unchanged; the session keeps its fields for a retry.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let outcome = self.session.submit(self.api.as_ref()).await?;
        match &outcome {
            SubmitOutcome::Created(note) => info!("Note saved with ID: {}", note.id),
            SubmitOutcome::Updated(note) => info!("Successfully updated note #{}", note.id),
        }
        self.store.request_refresh();
        self.sync().await;
        Ok(outcome)
    }

    /// Deletes a note remotely, then drops it from the local list without
    /// re-fetching
    ///
    /// # Errors
    ///
    /// Returns the transport error if the server rejects the delete; the
    /// local list is left untouched in that case
    pub async fn delete(&mut self, id: &NoteId) -> Result<()> {
        // form messages belong to the last submission, not to this delete
        self.session.clear_messages();
        self.api.delete_note(id).await?;
        self.store.remove_local(id);
        info!("Successfully deleted note #{id}");
        Ok(())
    }
}

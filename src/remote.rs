pub mod http;

pub use http::{ClientConfig, HttpNotesApi};

use crate::{Note, NoteDraft, NoteId, Result};
use async_trait::async_trait;

/// Trait to be implemented by every client of the remote notes API.
///
/// Implementations never retry and never swallow failures: every error is
/// returned to the caller as a `NoteError::Transport`.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetches every note, in server order
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-2xx response.
    /// No partial list is ever returned.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Creates a note and returns it with its server-assigned fields
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails or is rejected
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note>;

    /// Replaces title and content of an existing note
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails or the note does not exist
    async fn update_note(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note>;

    /// Deletes a note by ID
    ///
    /// # Errors
    ///
    /// Returns a transport error if the server rejects the delete
    async fn delete_note(&self, id: &NoteId) -> Result<()>;
}

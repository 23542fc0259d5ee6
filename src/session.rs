use crate::html::is_blank_html;
use crate::remote::NotesApi;
use crate::{MAX_TITLE_CHARS, Note, NoteDraft, NoteError, NoteId, NoteValidationError, Result};
use log::{debug, trace};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and content are required.";
pub const CREATED_MESSAGE: &str = "Note created successfully!";
pub const UPDATED_MESSAGE: &str = "Note updated successfully!";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create note. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update note. Please try again.";

/// What a validated submission will do on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSubmit {
    Create(NoteDraft),
    Update(NoteId, NoteDraft),
}

impl PendingSubmit {
    /// Performs the remote call for this submission
    ///
    /// # Errors
    ///
    /// Forwards any transport error from `api`
    pub async fn send(&self, api: &dyn NotesApi) -> Result<SubmitOutcome> {
        match self {
            Self::Create(draft) => api.create_note(draft).await.map(SubmitOutcome::Created),
            Self::Update(id, draft) => api
                .update_note(id, draft)
                .await
                .map(SubmitOutcome::Updated),
        }
    }

    const fn is_update(&self) -> bool {
        matches!(self, Self::Update(..))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Note),
    Updated(Note),
}

/// Form state: the note being edited (if any), the field values, and the
/// inline status messages
#[derive(Debug, Default)]
pub struct EditingSession {
    editing: Option<Note>,
    title: String,
    content: String,
    submitting: bool,
    error: Option<String>,
    success: Option<String>,
}

impl EditingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&Note> {
        self.editing.as_ref()
    }

    #[must_use]
    pub const fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Loads `note` into the form and switches to edit mode
    pub fn start_edit(&mut self, note: &Note) {
        trace!("Editing note #{}", note.id);
        self.title.clone_from(&note.title);
        self.content.clone_from(&note.content);
        self.editing = Some(note.clone());
        self.clear_messages();
    }

    /// Leaves edit mode and empties the form
    pub fn cancel(&mut self) {
        self.reset();
        self.clear_messages();
    }

    /// Checks the form without touching the network
    ///
    /// # Errors
    ///
    /// - `NoteValidationError::TitleEmpty` if the trimmed title is empty
    /// - `NoteValidationError::ContentEmpty` if the content has no visible text
    /// - `NoteValidationError::TitleTooLong` if the title exceeds `MAX_TITLE_CHARS`
    pub fn validate(&self) -> Result<NoteDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::TitleEmpty.into());
        }
        if is_blank_html(&self.content) {
            return Err(NoteValidationError::ContentEmpty.into());
        }
        let got = title.chars().count();
        if got > MAX_TITLE_CHARS {
            return Err(NoteValidationError::TitleTooLong {
                max: MAX_TITLE_CHARS,
                got,
            }
            .into());
        }

        // Content goes out exactly as the editor produced it
        Ok(NoteDraft {
            title: title.to_string(),
            content: self.content.clone(),
        })
    }

    /// Validates the form and marks a submission as outstanding
    ///
    /// # Errors
    ///
    /// - `NoteValidationError::SubmissionInFlight` if a submission is outstanding
    /// - Any error from `validate`, after setting the inline error message
    pub fn prepare_submit(&mut self) -> Result<PendingSubmit> {
        if self.submitting {
            return Err(NoteValidationError::SubmissionInFlight.into());
        }
        self.clear_messages();

        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(e) => {
                debug!("Validation failed: {e}");
                self.error = Some(match &e {
                    NoteError::Validation(
                        NoteValidationError::TitleEmpty | NoteValidationError::ContentEmpty,
                    ) => REQUIRED_FIELDS_MESSAGE.to_string(),
                    other => other.to_string(),
                });
                return Err(e);
            }
        };

        self.submitting = true;
        Ok(match &self.editing {
            Some(note) => PendingSubmit::Update(note.id.clone(), draft),
            None => PendingSubmit::Create(draft),
        })
    }

    /// Records the result of a submission. On success the form is reset and
    /// edit mode ends; on failure the fields stay for a retry.
    ///
    /// # Errors
    ///
    /// Forwards the error from `result`
    pub fn complete_submit(
        &mut self,
        pending: &PendingSubmit,
        result: Result<SubmitOutcome>,
    ) -> Result<SubmitOutcome> {
        self.submitting = false;
        match result {
            Ok(outcome) => {
                self.reset();
                self.success = Some(
                    match outcome {
                        SubmitOutcome::Created(_) => CREATED_MESSAGE,
                        SubmitOutcome::Updated(_) => UPDATED_MESSAGE,
                    }
                    .to_string(),
                );
                Ok(outcome)
            }
            Err(e) => {
                self.error = Some(
                    if pending.is_update() {
                        UPDATE_FAILED_MESSAGE
                    } else {
                        CREATE_FAILED_MESSAGE
                    }
                    .to_string(),
                );
                Err(e)
            }
        }
    }

    /// Validates, then creates or updates depending on edit mode
    ///
    /// # Errors
    ///
    /// Validation errors (no remote call is made) or transport errors from `api`
    pub async fn submit(&mut self, api: &dyn NotesApi) -> Result<SubmitOutcome> {
        let pending = self.prepare_submit()?;
        let result = pending.send(api).await;
        self.complete_submit(&pending, result)
    }

    fn reset(&mut self) {
        self.editing = None;
        self.title.clear();
        self.content.clear();
    }

    /// Drops the inline error and success messages
    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}

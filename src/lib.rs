#![deny(clippy::cargo)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::nursery)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(clippy::pedantic)]

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::io;
use thiserror::Error;

pub mod app;
pub mod filter;
pub mod html;
pub mod remote;
pub mod session;
pub mod setup;
pub mod store;
pub mod ui;

pub use app::NotesApp;
pub use remote::{NotesApi, http::ClientConfig, http::HttpNotesApi};

// More convenient Result type
pub type Result<T> = std::result::Result<T, NoteError>;

/// Maximum title length accepted by the client, in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Server-assigned note identifier. Opaque to the client: it is only
/// compared and rendered back into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for NoteId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// Servers hand out either numeric or string ids
impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(d)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A note as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or updating a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Parses a server timestamp. Accepts RFC 3339, and falls back to a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` which is taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_created_at<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid createdAt timestamp: {raw}")))
}

// Enum for all errors the client can surface
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] NoteValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

impl NoteError {
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// Enum for all possible menu input errors
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Failed to read from stdin: {0}")]
    StdinReadError(io::Error),

    #[error("Couldn't convert '{0}' to a number. Please enter a number 1-8")]
    ParseError(String),

    #[error("Couldn't convert '{0}' to a MenuOption. Please enter a number 1-8")]
    InvalidOption(u8),

    #[error("Failed writing to stdout")]
    StdoutWriteError(io::Error),

    #[error("Reached end of input")]
    EndOfInput,
}

// Local validation failures. None of these ever reach the network
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteValidationError {
    #[error("Title is empty")]
    TitleEmpty,

    #[error("Content is empty")]
    ContentEmpty,

    #[error("Title is too long. Max: {max}, Got: {got}")]
    TitleTooLong { max: usize, got: usize },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Note not found with ID: {0}")]
    NoteNotFound(NoteId),
}

// Any failure talking to the remote notes API
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Notes API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No note with ID: {0}")]
    NotFound(NoteId),

    #[error("Failed decoding response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error), // Used as fallback
}

impl TransportError {
    /// Generic retry-suggesting text shown to the user. The detailed error is
    /// only logged.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Timeout => "The notes server took too long to respond. Please try again.",
            _ => "Could not reach the notes server. Please try again.",
        }
    }
}

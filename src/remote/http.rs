use super::NotesApi;
use crate::{Note, NoteDraft, NoteId, Result, TransportError};

use async_trait::async_trait;
use log::{debug, error, trace};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for `HttpNotesApi`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `NotesApi` over HTTP/JSON against `{base_url}/api/notes`
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    client: Client,
    base_url: Url,
}

impl HttpNotesApi {
    /// Builds a client for the given base URL, e.g. `http://localhost:8080`.
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidBaseUrl` if the URL does not parse or is not http(s)
    /// - `TransportError::Request` if the HTTP client cannot be initialized
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            TransportError::InvalidBaseUrl(format!("'{}': {e}", config.base_url))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidBaseUrl(format!(
                "'{}': only http and https are supported",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Request)?;
        debug!(
            "Notes API client ready for {base_url} (timeout {:?})",
            config.timeout
        );

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self) -> Result<Url> {
        self.url(&["api", "notes"])
    }

    fn note_url(&self, id: &NoteId) -> Result<Url> {
        self.url(&["api", "notes", id.as_str()])
    }

    /// Sends the request and returns the body of a 2xx response.
    ///
    /// A 404 is reported as `TransportError::NotFound` when the request
    /// targets a single note.
    async fn send(&self, request: RequestBuilder, target: Option<&NoteId>) -> Result<String> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        trace!("Notes API responded with {status}");
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = target {
                return Err(TransportError::NotFound(id.clone()).into());
            }
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into())
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e).into())
}

/// Separates timeouts from other request failures
fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(e)
    }
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let url = self.collection_url()?;
        debug!("GET {url}");
        let result = async {
            let body = self.send(self.client.get(url), None).await?;
            decode::<Vec<Note>>(&body)
        }
        .await;
        result.inspect_err(|e| error!("Error fetching notes: {e}"))
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        let url = self.collection_url()?;
        debug!("POST {url}");
        let result = async {
            let body = self.send(self.client.post(url).json(draft), None).await?;
            decode::<Note>(&body)
        }
        .await;
        result.inspect_err(|e| error!("Error creating note: {e}"))
    }

    async fn update_note(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note> {
        let url = self.note_url(id)?;
        debug!("PUT {url}");
        let result = async {
            let body = self.send(self.client.put(url).json(draft), Some(id)).await?;
            decode::<Note>(&body)
        }
        .await;
        result.inspect_err(|e| error!("Error updating note #{id}: {e}"))
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let url = self.note_url(id)?;
        debug!("DELETE {url}");
        self.send(self.client.delete(url), Some(id))
            .await
            .map(|_| ())
            .inspect_err(|e| error!("Error deleting note #{id}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteError;

    fn api(base: &str) -> HttpNotesApi {
        HttpNotesApi::new(&ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn builds_collection_and_note_urls() {
        let api = api("http://localhost:8080");
        assert_eq!(
            api.collection_url().unwrap().as_str(),
            "http://localhost:8080/api/notes"
        );
        assert_eq!(
            api.note_url(&NoteId::from(5)).unwrap().as_str(),
            "http://localhost:8080/api/notes/5"
        );
    }

    #[test]
    fn keeps_base_path_and_trailing_slash() {
        let api = api("http://example.com/notes-app/");
        assert_eq!(
            api.collection_url().unwrap().as_str(),
            "http://example.com/notes-app/api/notes"
        );
    }

    #[test]
    fn encodes_opaque_ids() {
        let api = api("http://localhost:8080");
        assert_eq!(
            api.note_url(&NoteId::from("a b/c")).unwrap().as_str(),
            "http://localhost:8080/api/notes/a%20b%2Fc"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        for base in ["not a url", "ftp://example.com", ""] {
            let err = HttpNotesApi::new(&ClientConfig {
                base_url: base.to_string(),
                ..ClientConfig::default()
            })
            .unwrap_err();
            assert!(matches!(
                err,
                NoteError::Transport(TransportError::InvalidBaseUrl(_))
            ));
        }
    }
}

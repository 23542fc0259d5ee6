use crate::app::NotesApp;
use crate::remote::http::{ClientConfig, DEFAULT_BASE_URL, HttpNotesApi};
use crate::Result;

use clap::Parser;
use log::{debug, warn};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
pub struct Args {
    /// Base URL of the notes API, without the `/api/notes` suffix
    #[arg(short, long, env = "NOTES_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Seconds to wait for the notes API before giving up on a request
    #[arg(short, long, env = "NOTES_API_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

impl Args {
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

/// Loads `.env`, parses command-line arguments and builds a `NotesApp`
/// talking to the configured notes API.
///
/// # Errors
///
/// - `TransportError::InvalidBaseUrl` if the base URL is not a valid http(s) URL
/// - `TransportError::Request` if the HTTP client cannot be built
pub fn handle_args() -> Result<NotesApp> {
    if let Err(e) = dotenv::dotenv() {
        debug!("No .env file loaded: {e}");
    }
    let args = Args::parse();
    if args.timeout_secs == 0 {
        warn!("A timeout of 0 seconds is not allowed, using 1 second");
    }

    let api = HttpNotesApi::new(&args.client_config())?;
    Ok(NotesApp::new(Box::new(api)))
}

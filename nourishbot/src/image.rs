//! Image reference normalization.
//!
//! User input is either an `http(s)://` URL or a local filesystem path.
//! Both are normalized to a single `data:image/jpeg;base64,<...>` URI
//! before inclusion in a vision message, so the completion endpoint never
//! needs network access of its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::{Error, LlmError, Result};

/// Timeout for fetching a remote image, separate from the completion timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// An image reference supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A remote `http(s)://` URL, fetched at pipeline time.
    Url(String),
    /// A local filesystem path, read directly.
    Path(PathBuf),
}

impl ImageSource {
    /// Parse user input into an image source.
    ///
    /// An `http://` or `https://` prefix selects [`ImageSource::Url`];
    /// anything else is treated as a local path.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_owned())
        } else {
            Self::Path(PathBuf::from(input))
        }
    }

    /// Create a source from a local path.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Normalize this reference to a base64 data URI.
    ///
    /// Local paths are checked for existence before any network call is
    /// attempted; a missing file yields [`Error::ImageNotFound`]. Remote
    /// fetches are bounded by a 30 second timeout and a non-success
    /// status aborts with an upstream error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageNotFound`] for a missing local path,
    /// [`Error::Llm`] for fetch failures, or [`Error::Io`] for other
    /// read failures.
    pub async fn to_data_uri(&self, client: &reqwest::Client) -> Result<String> {
        let bytes = match self {
            Self::Path(path) => {
                if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                    return Err(Error::image_not_found(path.clone()));
                }
                tokio::fs::read(path).await?
            }
            Self::Url(url) => {
                let response = client
                    .get(url)
                    .timeout(FETCH_TIMEOUT)
                    .send()
                    .await
                    .map_err(LlmError::from)?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(LlmError::http_status(status.as_u16(), body).into());
                }

                response.bytes().await.map_err(LlmError::from)?.to_vec()
            }
        };

        let b64 = BASE64.encode(&bytes);
        Ok(format!("data:image/jpeg;base64,{b64}"))
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

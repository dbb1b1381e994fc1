use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Input of a conversion: a remote stream or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Url(String),
    File(PathBuf),
}

impl MediaSource {
    pub fn to_arg(&self) -> String {
        match self {
            MediaSource::Url(url) => url.clone(),
            MediaSource::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Url(url) => write!(f, "url {}", url),
            MediaSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Converts `source` into an MP3 file written at `destination`.
    async fn convert(
        &self,
        source: &MediaSource,
        destination: &Path,
    ) -> Result<(), TranscodeError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscodeError {
    #[error("transcode failed: could not launch encoder: {0}")]
    LaunchFailed(String),
    #[error("transcode failed: encoder exited with {status}: {diagnostics}")]
    Failed { status: String, diagnostics: String },
}

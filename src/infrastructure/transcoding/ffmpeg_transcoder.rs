use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::application::ports::{MediaSource, TranscodeError, Transcoder};

pub const AUDIO_CODEC: &str = "libmp3lame";
pub const AUDIO_BITRATE: &str = "256k";
pub const OUTPUT_FORMAT: &str = "mp3";

const MAX_DIAGNOSTIC_BYTES: usize = 2000;

pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn command_args(source: &MediaSource, destination: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            source.to_arg(),
            "-vn".to_string(),
            "-acodec".to_string(),
            AUDIO_CODEC.to_string(),
            "-ab".to_string(),
            AUDIO_BITRATE.to_string(),
            "-f".to_string(),
            OUTPUT_FORMAT.to_string(),
            destination.to_string_lossy().into_owned(),
        ]
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, source), fields(destination = %destination.display()))]
    async fn convert(
        &self,
        source: &MediaSource,
        destination: &Path,
    ) -> Result<(), TranscodeError> {
        let mut child = Command::new(&self.ffmpeg_path)
            .args(Self::command_args(source, destination))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    ffmpeg = %self.ffmpeg_path.display(),
                    "Failed to spawn ffmpeg"
                );
                TranscodeError::LaunchFailed(e.to_string())
            })?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TranscodeError::LaunchFailed("stderr pipe unavailable".to_string()))?;

        // stderr is drained concurrently with wait(); a full pipe would block ffmpeg.
        let mut diagnostics = Vec::new();
        let (read_result, wait_result) =
            tokio::join!(stderr.read_to_end(&mut diagnostics), child.wait());

        let diagnostics = String::from_utf8_lossy(&diagnostics).into_owned();
        if let Err(e) = read_result {
            tracing::warn!(error = %e, "Failed to read ffmpeg diagnostics");
        }
        tracing::debug!(diagnostics = %diagnostics, "ffmpeg finished");

        let status = wait_result.map_err(|e| TranscodeError::LaunchFailed(e.to_string()))?;
        if !status.success() {
            tracing::error!(status = %status, "ffmpeg exited unsuccessfully");
            return Err(TranscodeError::Failed {
                status: status.to_string(),
                diagnostics: tail(&diagnostics, MAX_DIAGNOSTIC_BYTES).to_string(),
            });
        }

        Ok(())
    }
}

fn tail(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text.trim();
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].trim()
}

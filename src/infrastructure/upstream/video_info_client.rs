use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, redirect};

use crate::application::ports::{ResolverError, StreamResolver};
use crate::domain::{ResolvedVideo, VideoId};

use super::redirect::{MAX_REDIRECTS, PROBE_TIMEOUT, follow_redirects};
use super::video_info::{parse_video_info, select_stream};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
pub const DEFAULT_TARGET_TYPE: &str = "video/mp4";

/// Resolves a video id against the upstream `get_video_info` endpoint.
pub struct VideoInfoClient {
    client: Client,
    base_url: String,
    target_type: String,
    max_redirects: usize,
    probe_timeout: Duration,
}

impl VideoInfoClient {
    pub fn new(
        base_url: Option<String>,
        target_type: Option<String>,
    ) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                ResolverError::UpstreamUnavailable(format!("failed to create http client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            target_type: target_type.unwrap_or_else(|| DEFAULT_TARGET_TYPE.to_string()),
            max_redirects: MAX_REDIRECTS,
            probe_timeout: PROBE_TIMEOUT,
        })
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    fn info_url(&self, id: &VideoId) -> String {
        format!("{}/get_video_info?video_id={}", self.base_url, id)
    }

    async fn fetch_info(&self, id: &VideoId) -> Result<String, ResolverError> {
        let response = self
            .client
            .get(self.info_url(id))
            .send()
            .await
            .map_err(|e| {
                ResolverError::UpstreamUnavailable(format!("retrieve video {} info: {}", id, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::UpstreamRejected(format!(
                "video info status {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ResolverError::UpstreamUnavailable(format!("read video info body: {}", e)))
    }
}

#[async_trait]
impl StreamResolver for VideoInfoClient {
    #[tracing::instrument(skip(self), fields(video_id = %id))]
    async fn resolve(&self, id: &VideoId) -> Result<ResolvedVideo, ResolverError> {
        let body = self.fetch_info(id).await?;
        let details = parse_video_info(id, &body).inspect_err(|e| {
            tracing::warn!(error = %e, "Upstream video info rejected");
        })?;

        let mut stream = select_stream(&details.streams, &self.target_type)
            .cloned()
            .ok_or_else(|| ResolverError::NoEligibleStream(self.target_type.clone()))?;

        tracing::debug!(
            quality = %stream.quality,
            candidates = details.streams.len(),
            "Selected stream"
        );

        stream.url =
            follow_redirects(&self.client, &stream.url, self.max_redirects, self.probe_timeout)
                .await?;

        tracing::info!(title = %details.title, quality = %stream.quality, "Stream resolved");

        Ok(ResolvedVideo { details, stream })
    }
}

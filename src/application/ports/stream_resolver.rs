use async_trait::async_trait;

use crate::domain::{ResolvedVideo, VideoId};

#[async_trait]
pub trait StreamResolver: Send + Sync {
    async fn resolve(&self, id: &VideoId) -> Result<ResolvedVideo, ResolverError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolverError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("upstream rejected the request: {0}")]
    UpstreamRejected(String),
    #[error("malformed upstream response: {0}")]
    UpstreamMalformed(String),
    #[error("no eligible {0} stream found")]
    NoEligibleStream(String),
    #[error("exceeded {0} redirects while resolving the stream url")]
    RedirectLoopExceeded(usize),
}

use super::{StreamDescriptor, VideoId};

/// Descriptive facts and stream list reported by the upstream metadata service.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub id: VideoId,
    pub title: String,
    pub author: String,
    pub thumbnail_url: String,
    pub length_seconds: i64,
    pub keywords: Vec<String>,
    pub streams: Vec<StreamDescriptor>,
}

/// Output of stream resolution: the upstream details plus the selected stream,
/// whose URL no longer redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVideo {
    pub details: VideoDetails,
    pub stream: StreamDescriptor,
}

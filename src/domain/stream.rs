use super::QualityTier;

/// One concrete rendition advertised by the upstream metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub quality: QualityTier,
    pub media_type: String,
    pub url: String,
}

impl StreamDescriptor {
    pub fn new(quality: QualityTier, media_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality,
            media_type: media_type.into(),
            url: url.into(),
        }
    }

    /// The upstream type field carries codec parameters after the container,
    /// e.g. `video/mp4; codecs="avc1.42001E"`, so containment is the match rule.
    pub fn matches_type(&self, target_type: &str) -> bool {
        self.media_type.contains(target_type)
    }
}

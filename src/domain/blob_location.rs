use std::fmt;

use super::VideoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation(String);

impl BlobLocation {
    pub fn new(bucket: &str, video_id: &VideoId) -> Self {
        Self(format!("{}/{}", bucket, video_id))
    }

    pub fn from_raw(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

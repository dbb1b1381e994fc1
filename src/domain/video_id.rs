use std::fmt;
use std::str::FromStr;

const MAX_LEN: usize = 64;

/// Opaque upstream token naming a video. Used as the key in both cache tiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(raw: &str) -> Result<Self, InvalidVideoId> {
        if raw.is_empty() {
            return Err(InvalidVideoId("video id is empty".to_string()));
        }
        if raw.len() > MAX_LEN {
            return Err(InvalidVideoId(format!(
                "video id longer than {} characters",
                MAX_LEN
            )));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(InvalidVideoId(format!(
                "video id contains invalid character {:?}",
                c
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = InvalidVideoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid video id: {0}")]
pub struct InvalidVideoId(pub String);

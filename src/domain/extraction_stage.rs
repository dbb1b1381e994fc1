use std::fmt;

/// Steps a request walks through. `Serve` is the only successful end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStage {
    CheckCache,
    Resolve,
    Transcode,
    StoreBlob,
    StoreMetadata,
    Serve,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::CheckCache => "CHECK_CACHE",
            ExtractionStage::Resolve => "RESOLVE",
            ExtractionStage::Transcode => "TRANSCODE",
            ExtractionStage::StoreBlob => "STORE_BLOB",
            ExtractionStage::StoreMetadata => "STORE_METADATA",
            ExtractionStage::Serve => "SERVE",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

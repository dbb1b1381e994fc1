mod blob_location;
mod content_metadata;
mod extraction_stage;
mod quality_tier;
mod stream;
mod video_details;
mod video_id;

pub use blob_location::BlobLocation;
pub use content_metadata::{ContentMetadata, decode_keywords, encode_keywords};
pub use extraction_stage::ExtractionStage;
pub use quality_tier::QualityTier;
pub use stream::StreamDescriptor;
pub use video_details::{ResolvedVideo, VideoDetails};
pub use video_id::{InvalidVideoId, VideoId};

mod audio_store;
mod metadata_repository;
mod repository_error;
mod stream_resolver;
mod transcoder;

pub use audio_store::{AudioStore, AudioStoreError, AudioStream};
pub use metadata_repository::MetadataRepository;
pub use repository_error::RepositoryError;
pub use stream_resolver::{ResolverError, StreamResolver};
pub use transcoder::{MediaSource, TranscodeError, Transcoder};

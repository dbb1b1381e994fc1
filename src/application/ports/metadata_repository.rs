use async_trait::async_trait;

use crate::domain::{ContentMetadata, VideoId};

use super::RepositoryError;

#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// `Ok(None)` is a cache miss; `Err` is an infrastructure failure.
    async fn lookup(&self, id: &VideoId) -> Result<Option<ContentMetadata>, RepositoryError>;

    /// Unconditional insert. Callers insert at most once per id.
    async fn insert(&self, metadata: &ContentMetadata) -> Result<(), RepositoryError>;
}

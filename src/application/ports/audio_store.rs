use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::{BlobLocation, VideoId};

pub type AudioStream = BoxStream<'static, Result<Bytes, AudioStoreError>>;

#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn exists(&self, id: &VideoId) -> Result<bool, AudioStoreError>;

    /// Uploads the file at `source` under `id`. Last writer wins.
    async fn write(&self, id: &VideoId, source: &Path) -> Result<BlobLocation, AudioStoreError>;

    async fn read(&self, id: &VideoId) -> Result<AudioStream, AudioStoreError>;

    async fn delete(&self, id: &VideoId) -> Result<(), AudioStoreError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AudioStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}

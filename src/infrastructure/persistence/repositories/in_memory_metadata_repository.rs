use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::application::ports::{MetadataRepository, RepositoryError};
use crate::domain::{ContentMetadata, VideoId};

/// Process-local metadata cache for development runs and tests.
#[derive(Default)]
pub struct InMemoryMetadataRepository {
    records: RwLock<HashMap<VideoId, ContentMetadata>>,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MetadataRepository for InMemoryMetadataRepository {
    async fn lookup(&self, id: &VideoId) -> Result<Option<ContentMetadata>, RepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert(&self, metadata: &ContentMetadata) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.contains_key(&metadata.video_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate video_id {}",
                metadata.video_id
            )));
        }
        records.insert(metadata.video_id.clone(), metadata.clone());
        Ok(())
    }
}

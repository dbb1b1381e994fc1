use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::application::ports::{AudioStore, AudioStoreError, AudioStream};
use crate::domain::{BlobLocation, VideoId};

/// Files up to this size go up in a single put; larger ones use multipart
/// parts of this size (above the 5 MiB minimum cloud stores require).
const PART_SIZE: usize = 8 * 1024 * 1024;

/// Audio cache backed by any `object_store` implementation, keyed by video id.
pub struct ObjectAudioStore {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectAudioStore {
    pub fn new(inner: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            inner,
            bucket: bucket.into(),
        }
    }

    pub fn local(base_path: PathBuf) -> Result<Self, AudioStoreError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;
        Ok(Self::new(
            Arc::new(fs),
            base_path.to_string_lossy().into_owned(),
        ))
    }

    pub fn gcs(
        bucket: &str,
        service_account_path: Option<&str>,
    ) -> Result<Self, AudioStoreError> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = service_account_path {
            builder = builder.with_service_account_path(path);
        }
        let store = builder
            .build()
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;
        Ok(Self::new(Arc::new(store), bucket))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    fn key(id: &VideoId) -> StorePath {
        StorePath::from(id.as_str())
    }

    async fn upload_multipart(
        &self,
        key: &StorePath,
        mut file: File,
    ) -> Result<u64, AudioStoreError> {
        let mut upload = self
            .inner
            .put_multipart(key)
            .await
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        loop {
            let part = match read_part(&mut file, PART_SIZE).await {
                Ok(p) => p,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(AudioStoreError::WriteFailed(e.to_string()));
                }
            };
            if part.is_empty() {
                break;
            }
            total_bytes += part.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(part)).await {
                let _ = upload.abort().await;
                return Err(AudioStoreError::WriteFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;

        Ok(total_bytes)
    }
}

#[async_trait]
impl AudioStore for ObjectAudioStore {
    async fn exists(&self, id: &VideoId) -> Result<bool, AudioStoreError> {
        match self.inner.head(&Self::key(id)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(AudioStoreError::ReadFailed(e.to_string())),
        }
    }

    #[tracing::instrument(skip(self, source), fields(video_id = %id, bucket = %self.bucket))]
    async fn write(&self, id: &VideoId, source: &Path) -> Result<BlobLocation, AudioStoreError> {
        let key = Self::key(id);
        let file = File::open(source)
            .await
            .map_err(|e| {
                AudioStoreError::WriteFailed(format!("open {}: {}", source.display(), e))
            })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?
            .len();

        let written = if size <= PART_SIZE as u64 {
            let mut file = file;
            let mut data = Vec::with_capacity(size as usize);
            file.read_to_end(&mut data)
                .await
                .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;
            let len = data.len() as u64;
            self.inner
                .put(&key, PutPayload::from(data))
                .await
                .map_err(|e| AudioStoreError::WriteFailed(e.to_string()))?;
            len
        } else {
            self.upload_multipart(&key, file).await?
        };

        tracing::info!(bytes = written, "Audio blob stored");
        Ok(BlobLocation::new(&self.bucket, id))
    }

    async fn read(&self, id: &VideoId) -> Result<AudioStream, AudioStoreError> {
        let result = match self.inner.get(&Self::key(id)).await {
            Ok(r) => r,
            Err(object_store::Error::NotFound { .. }) => {
                tracing::debug!(video_id = %id, bucket = %self.bucket, "Audio blob not found");
                return Err(AudioStoreError::NotFound(format!("{}/{}", self.bucket, id)));
            }
            Err(e) => return Err(AudioStoreError::ReadFailed(e.to_string())),
        };

        Ok(result
            .into_stream()
            .map(|chunk| chunk.map_err(|e| AudioStoreError::ReadFailed(e.to_string())))
            .boxed())
    }

    async fn delete(&self, id: &VideoId) -> Result<(), AudioStoreError> {
        match self.inner.delete(&Self::key(id)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(AudioStoreError::DeleteFailed(e.to_string())),
        }
    }
}

async fn read_part(file: &mut File, part_size: usize) -> io::Result<Vec<u8>> {
    let mut part = vec![0u8; part_size];
    let mut filled = 0;
    while filled < part_size {
        let n = file.read(&mut part[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    part.truncate(filled);
    Ok(part)
}

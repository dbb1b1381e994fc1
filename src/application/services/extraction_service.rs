use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

use crate::application::ports::{
    AudioStore, AudioStoreError, AudioStream, MediaSource, MetadataRepository, RepositoryError,
    ResolverError, StreamResolver, TranscodeError, Transcoder,
};
use crate::domain::{ContentMetadata, ExtractionStage, InvalidVideoId, VideoId};

type ExtractionResult = Result<ContentMetadata, ExtractionError>;
type InFlight = Shared<BoxFuture<'static, ExtractionResult>>;

/// A served extraction: the cached record plus a fresh read of the audio blob.
pub struct Extraction {
    pub metadata: ContentMetadata,
    pub audio: AudioStream,
}

pub struct ExtractionService {
    pipeline: Arc<Pipeline>,
    in_flight: Arc<Mutex<HashMap<VideoId, InFlight>>>,
}

struct Pipeline {
    resolver: Arc<dyn StreamResolver>,
    transcoder: Arc<dyn Transcoder>,
    metadata_repository: Arc<dyn MetadataRepository>,
    audio_store: Arc<dyn AudioStore>,
    deadline: Duration,
}

impl ExtractionService {
    pub fn new(
        resolver: Arc<dyn StreamResolver>,
        transcoder: Arc<dyn Transcoder>,
        metadata_repository: Arc<dyn MetadataRepository>,
        audio_store: Arc<dyn AudioStore>,
        deadline: Duration,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                resolver,
                transcoder,
                metadata_repository,
                audio_store,
                deadline,
            }),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, raw_id: &str) -> Result<Extraction, ExtractionError> {
        let id = VideoId::parse(raw_id)?;

        tracing::debug!(stage = %ExtractionStage::CheckCache, "Extraction stage transition");
        let cached = self
            .pipeline
            .metadata_repository
            .lookup(&id)
            .await
            .map_err(ExtractionError::Metadata)?;

        let metadata = match cached {
            Some(metadata) => {
                tracing::info!(video_id = %id, "Metadata cache hit");
                metadata
            }
            None => {
                tracing::info!(video_id = %id, "Metadata cache miss, extracting audio");
                self.join_or_start(&id).await?
            }
        };

        tracing::debug!(stage = %ExtractionStage::Serve, "Extraction stage transition");
        let audio = match self.pipeline.audio_store.read(&id).await {
            Ok(audio) => audio,
            Err(AudioStoreError::NotFound(_)) => {
                tracing::error!(
                    video_id = %id,
                    location = %metadata.blob_location,
                    "Audio blob missing for cached metadata"
                );
                return Err(ExtractionError::BlobMissing(id.to_string()));
            }
            Err(e) => return Err(ExtractionError::Storage(e)),
        };

        Ok(Extraction { metadata, audio })
    }

    /// Concurrent misses for the same id share one spawned extraction. The
    /// entry is dropped once that extraction settles, so a failure is retried
    /// by the next request.
    async fn join_or_start(&self, id: &VideoId) -> ExtractionResult {
        let flight = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(id) {
                Some(existing) => {
                    tracing::debug!(video_id = %id, "Joining in-flight extraction");
                    existing.clone()
                }
                None => {
                    let pipeline = Arc::clone(&self.pipeline);
                    let registry = Arc::clone(&self.in_flight);
                    let key = id.clone();
                    // Detached: settles and clears its entry even if every waiter is dropped.
                    let task = tokio::spawn(async move {
                        let result = pipeline.run_with_deadline(&key).await;
                        registry.lock().await.remove(&key);
                        result
                    });
                    let flight = task
                        .map(|joined| match joined {
                            Ok(result) => result,
                            Err(e) => Err(ExtractionError::Aborted(e.to_string())),
                        })
                        .boxed()
                        .shared();
                    in_flight.insert(id.clone(), flight.clone());
                    flight
                }
            }
        };

        flight.await
    }

    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

impl Pipeline {
    async fn run_with_deadline(&self, id: &VideoId) -> ExtractionResult {
        match tokio::time::timeout(self.deadline, self.run(id)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    video_id = %id,
                    deadline_secs = self.deadline.as_secs(),
                    "Extraction deadline exceeded"
                );
                Err(ExtractionError::DeadlineExceeded(self.deadline))
            }
        }
    }

    async fn run(&self, id: &VideoId) -> ExtractionResult {
        tracing::debug!(stage = %ExtractionStage::Resolve, "Extraction stage transition");
        let resolved = self
            .resolver
            .resolve(id)
            .await
            .map_err(ExtractionError::Resolve)?;

        let workdir = tempfile::Builder::new()
            .prefix("audube-")
            .tempdir()
            .map_err(|e| ExtractionError::TempStorage(e.to_string()))?;
        let audio_path = workdir.path().join(format!("{}.mp3", id));

        tracing::debug!(
            stage = %ExtractionStage::Transcode,
            quality = %resolved.stream.quality,
            "Extraction stage transition"
        );
        self.transcoder
            .convert(&MediaSource::Url(resolved.stream.url.clone()), &audio_path)
            .await
            .map_err(ExtractionError::Transcode)?;

        tracing::debug!(stage = %ExtractionStage::StoreBlob, "Extraction stage transition");
        let blob_location = self
            .audio_store
            .write(id, &audio_path)
            .await
            .map_err(ExtractionError::Storage)?;

        let details = resolved.details;
        let metadata = ContentMetadata {
            video_id: id.clone(),
            title: details.title,
            author: details.author,
            thumbnail_url: details.thumbnail_url,
            length_seconds: details.length_seconds,
            keywords: details.keywords,
            converted_at: Utc::now().timestamp(),
            blob_location,
        };

        tracing::debug!(stage = %ExtractionStage::StoreMetadata, "Extraction stage transition");
        let metadata = self.commit(metadata).await?;

        tracing::info!(%metadata, "Audio extracted and cached");
        Ok(metadata)
    }

    async fn commit(&self, metadata: ContentMetadata) -> ExtractionResult {
        let id = &metadata.video_id;
        match self.metadata_repository.insert(&metadata).await {
            Ok(()) => Ok(metadata),
            Err(RepositoryError::ConstraintViolation(reason)) => {
                // Another process committed this id first; its record points at
                // the blob we just overwrote with an equivalent conversion.
                tracing::warn!(
                    video_id = %id,
                    reason = %reason,
                    "Metadata already recorded by a concurrent extraction"
                );
                self.metadata_repository
                    .lookup(id)
                    .await
                    .map_err(ExtractionError::Metadata)?
                    .ok_or(ExtractionError::Metadata(
                        RepositoryError::ConstraintViolation(reason),
                    ))
            }
            Err(e) => {
                self.discard_orphan(id).await;
                Err(ExtractionError::Metadata(e))
            }
        }
    }

    /// Deletes the blob written for `id` unless a committed record already
    /// points at that key.
    async fn discard_orphan(&self, id: &VideoId) {
        match self.metadata_repository.lookup(id).await {
            Ok(Some(_)) => {
                tracing::warn!(
                    video_id = %id,
                    "Audio blob is referenced by an existing record, keeping it"
                );
                return;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    video_id = %id,
                    error = %e,
                    "Could not confirm audio blob is unreferenced, keeping it"
                );
                return;
            }
        }

        if let Err(delete_err) = self.audio_store.delete(id).await {
            tracing::warn!(
                video_id = %id,
                error = %delete_err,
                "Failed to delete orphaned audio blob"
            );
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    InvalidVideoId(#[from] InvalidVideoId),
    #[error("resolving stream: {0}")]
    Resolve(ResolverError),
    #[error("{0}")]
    Transcode(TranscodeError),
    #[error("metadata cache: {0}")]
    Metadata(RepositoryError),
    #[error("audio cache: {0}")]
    Storage(AudioStoreError),
    #[error("audio for {0} is recorded but missing from the audio cache")]
    BlobMissing(String),
    #[error("extraction exceeded the {0:?} deadline")]
    DeadlineExceeded(Duration),
    #[error("temporary storage: {0}")]
    TempStorage(String),
    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

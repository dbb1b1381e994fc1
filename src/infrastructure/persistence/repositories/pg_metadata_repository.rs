use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{MetadataRepository, RepositoryError};
use crate::domain::{BlobLocation, ContentMetadata, VideoId, decode_keywords, encode_keywords};

#[derive(sqlx::FromRow)]
struct MetadataRow {
    video_id: String,
    title: String,
    author: String,
    thumbnail_url: String,
    length: i64,
    audio_url: String,
    keywords: String,
    converted_at: i64,
}

pub struct PgMetadataRepository {
    pool: PgPool,
    table: String,
}

impl PgMetadataRepository {
    /// The table name is interpolated into SQL, so only plain identifiers are accepted.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, RepositoryError> {
        validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        let statement = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                video_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                thumbnail_url TEXT NOT NULL,
                length BIGINT NOT NULL,
                audio_url TEXT NOT NULL,
                keywords TEXT NOT NULL,
                converted_at BIGINT NOT NULL
            )
            "#,
            self.table
        );

        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl MetadataRepository for PgMetadataRepository {
    #[instrument(skip(self), fields(video_id = %id))]
    async fn lookup(&self, id: &VideoId) -> Result<Option<ContentMetadata>, RepositoryError> {
        let query = format!(
            r#"
            SELECT video_id, title, author, thumbnail_url, length, audio_url, keywords, converted_at
            FROM {}
            WHERE video_id = $1
            "#,
            self.table
        );

        let row = sqlx::query_as::<_, MetadataRow>(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(r) => {
                let video_id = VideoId::parse(&r.video_id)
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

                Ok(Some(ContentMetadata {
                    video_id,
                    title: r.title,
                    author: r.author,
                    thumbnail_url: r.thumbnail_url,
                    length_seconds: r.length,
                    keywords: decode_keywords(&r.keywords),
                    converted_at: r.converted_at,
                    blob_location: BlobLocation::from_raw(r.audio_url),
                }))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, metadata), fields(video_id = %metadata.video_id))]
    async fn insert(&self, metadata: &ContentMetadata) -> Result<(), RepositoryError> {
        let statement = format!(
            r#"
            INSERT INTO {} (video_id, title, author, thumbnail_url, length, audio_url, keywords, converted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            self.table
        );

        sqlx::query(&statement)
            .bind(metadata.video_id.as_str())
            .bind(&metadata.title)
            .bind(&metadata.author)
            .bind(&metadata.thumbnail_url)
            .bind(metadata.length_seconds)
            .bind(metadata.blob_location.as_str())
            .bind(encode_keywords(&metadata.keywords))
            .bind(metadata.converted_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::ConstraintViolation(db.to_string())
                }
                other => RepositoryError::QueryFailed(other.to_string()),
            })?;

        Ok(())
    }
}

fn validate_table_name(table: &str) -> Result<(), RepositoryError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidConfiguration(format!(
            "invalid table name: {:?}",
            table
        )))
    }
}

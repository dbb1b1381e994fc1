use std::sync::Arc;

use sqlx::postgres::PgConnectOptions;

use crate::application::ports::{MetadataRepository, RepositoryError};
use crate::presentation::config::{DatabaseProviderSetting, DatabaseSettings};

use super::create_pool;
use super::repositories::{InMemoryMetadataRepository, PgMetadataRepository};

pub struct MetadataRepositoryFactory;

impl MetadataRepositoryFactory {
    pub async fn create(
        settings: &DatabaseSettings,
    ) -> Result<Arc<dyn MetadataRepository>, RepositoryError> {
        match settings.provider {
            DatabaseProviderSetting::Memory => {
                tracing::warn!("Using in-memory metadata cache; records are lost on restart");
                Ok(Arc::new(InMemoryMetadataRepository::new()))
            }
            DatabaseProviderSetting::Postgres => {
                let options = PgConnectOptions::new()
                    .host(&settings.host)
                    .port(settings.port)
                    .username(&settings.user)
                    .password(&settings.password)
                    .database(&settings.name);
                let pool = create_pool(options, settings.max_connections).await?;
                let repository = PgMetadataRepository::new(pool, &settings.table_name)?;
                if settings.ensure_schema {
                    repository.ensure_schema().await?;
                }
                Ok(Arc::new(repository))
            }
        }
    }
}

mod metadata_repository_factory;
mod pg_pool;
mod repositories;

pub use metadata_repository_factory::MetadataRepositoryFactory;
pub use pg_pool::create_pool;
pub use repositories::{InMemoryMetadataRepository, PgMetadataRepository};

mod in_memory_metadata_repository;
mod pg_metadata_repository;

pub use in_memory_metadata_repository::InMemoryMetadataRepository;
pub use pg_metadata_repository::PgMetadataRepository;

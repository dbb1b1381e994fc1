mod pg_metadata_repository_test;

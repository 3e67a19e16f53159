pub mod document_version_repository;

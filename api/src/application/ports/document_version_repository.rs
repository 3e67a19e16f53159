use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct VersionInsert<'a> {
    pub document_id: &'a str,
    pub snapshot: &'a [u8],
    pub label: Option<&'a str>,
    pub created_by: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub document_id: String,
    pub version_number: i64,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub byte_size: i64,
}

/// Storage of point-in-time document snapshots.
///
/// Snapshot bytes are fetched separately from the metadata so listing stays
/// cheap for documents with long histories.
#[async_trait]
pub trait DocumentVersionRepository: Send + Sync {
    /// Ordered by version number, oldest first.
    async fn list_versions(&self, document_id: &str) -> anyhow::Result<Vec<VersionRecord>>;

    async fn get_snapshot(
        &self,
        document_id: &str,
        version_number: i64,
    ) -> anyhow::Result<Option<Vec<u8>>>;

    /// Stores `snapshot` as the next version of the document.
    async fn insert_version(&self, input: VersionInsert<'_>) -> anyhow::Result<VersionRecord>;
}

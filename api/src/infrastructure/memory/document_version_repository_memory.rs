use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::document_version_repository::{
    DocumentVersionRepository, VersionInsert, VersionRecord,
};

struct StoredVersion {
    record: VersionRecord,
    snapshot: Vec<u8>,
}

/// Process-local version store for development runs without Postgres.
#[derive(Default)]
pub struct InMemoryDocumentVersionRepository {
    docs: RwLock<HashMap<String, Vec<StoredVersion>>>,
}

impl InMemoryDocumentVersionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentVersionRepository for InMemoryDocumentVersionRepository {
    async fn list_versions(&self, document_id: &str) -> anyhow::Result<Vec<VersionRecord>> {
        let docs = self.docs.read().await;
        Ok(docs
            .get(document_id)
            .map(|versions| versions.iter().map(|v| v.record.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_snapshot(
        &self,
        document_id: &str,
        version_number: i64,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        let docs = self.docs.read().await;
        Ok(docs.get(document_id).and_then(|versions| {
            versions
                .iter()
                .find(|v| v.record.version_number == version_number)
                .map(|v| v.snapshot.clone())
        }))
    }

    async fn insert_version(&self, input: VersionInsert<'_>) -> anyhow::Result<VersionRecord> {
        let mut docs = self.docs.write().await;
        let versions = docs.entry(input.document_id.to_string()).or_default();
        let next = versions
            .last()
            .map(|v| v.record.version_number + 1)
            .unwrap_or(1);
        let record = VersionRecord {
            document_id: input.document_id.to_string(),
            version_number: next,
            label: input.label.map(str::to_string),
            created_at: Utc::now(),
            created_by: input.created_by.map(str::to_string),
            byte_size: input.snapshot.len() as i64,
        };
        versions.push(StoredVersion {
            record: record.clone(),
            snapshot: input.snapshot.to_vec(),
        });
        Ok(record)
    }
}

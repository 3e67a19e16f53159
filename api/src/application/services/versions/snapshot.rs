use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task;
use yrs::updates::decoder::Decode;
use yrs::{Doc, GetString, ReadTxn, StateVector, Text, Transact, Update};

use crate::application::ports::document_version_repository::{
    DocumentVersionRepository, VersionInsert, VersionRecord,
};

/// Root text of a collaborative document.
pub const CONTENT_ROOT: &str = "content";

pub struct VersionService {
    repo: Arc<dyn DocumentVersionRepository>,
    max_snapshot_bytes: usize,
}

impl VersionService {
    pub fn new(repo: Arc<dyn DocumentVersionRepository>, max_snapshot_bytes: usize) -> Self {
        Self {
            repo,
            max_snapshot_bytes,
        }
    }

    pub async fn list(&self, document_id: &str) -> anyhow::Result<Vec<VersionRecord>> {
        self.repo.list_versions(document_id).await
    }

    /// Loads the plain text of one version.
    ///
    /// Never fails: an unavailable, oversized or undecodable snapshot reads
    /// as empty text.
    pub async fn load_text(&self, document_id: &str, version_number: i64) -> String {
        let bytes = match self.repo.get_snapshot(document_id, version_number).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::warn!(
                    document_id,
                    version = version_number,
                    "version_snapshot_missing"
                );
                return String::new();
            }
            Err(e) => {
                tracing::warn!(
                    document_id,
                    version = version_number,
                    error = ?e,
                    "version_snapshot_fetch_failed"
                );
                return String::new();
            }
        };

        if bytes.len() > self.max_snapshot_bytes {
            tracing::warn!(
                document_id,
                version = version_number,
                byte_size = bytes.len(),
                limit = self.max_snapshot_bytes,
                "version_snapshot_too_large"
            );
            return String::new();
        }

        match task::spawn_blocking(move || extract_text(&bytes)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    document_id,
                    version = version_number,
                    error = ?e,
                    "version_snapshot_extract_join"
                );
                String::new()
            }
        }
    }

    /// Stores `text` as the next version of the document.
    pub async fn record_text_version(
        &self,
        document_id: &str,
        text: String,
        label: Option<&str>,
        created_by: Option<&str>,
    ) -> anyhow::Result<VersionRecord> {
        let snapshot = task::spawn_blocking(move || encode_text_snapshot(&text))
            .await
            .map_err(|e| anyhow!("version_snapshot_encode_join: {e}"))?;
        self.repo
            .insert_version(VersionInsert {
                document_id,
                snapshot: &snapshot,
                label,
                created_by,
            })
            .await
    }
}

/// Reads the document text out of a v1-encoded snapshot.
///
/// Empty or malformed input yields an empty string.
pub fn extract_text(snapshot: &[u8]) -> String {
    if snapshot.is_empty() {
        return String::new();
    }
    // yrs may panic on structurally valid but inconsistent updates
    panic::catch_unwind(AssertUnwindSafe(|| {
        let doc = Doc::new();
        apply_update_bytes(&doc, snapshot).map(|()| read_content(&doc))
    }))
    .ok()
    .and_then(Result::ok)
    .unwrap_or_default()
}

/// Encodes a fresh document whose content root holds `text`.
pub fn encode_text_snapshot(text: &str) -> Vec<u8> {
    let doc = Doc::new();
    let content = doc.get_or_insert_text(CONTENT_ROOT);
    {
        let mut txn = doc.transact_mut();
        content.insert(&mut txn, 0, text);
    }
    let txn = doc.transact();
    txn.encode_state_as_update_v1(&StateVector::default())
}

fn read_content(doc: &Doc) -> String {
    let txt = doc.get_or_insert_text(CONTENT_ROOT);
    let txn = doc.transact();
    txt.get_string(&txn)
}

fn apply_update_bytes(doc: &Doc, bytes: &[u8]) -> anyhow::Result<()> {
    let update = Update::decode_v1(bytes)?;
    let mut txn = doc.transact_mut();
    txn.apply_update(update)?;
    Ok(())
}

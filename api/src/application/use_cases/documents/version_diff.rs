use crate::application::dto::diff::TextDiffResult;
use crate::application::ports::document_version_repository::VersionRecord;
use crate::application::services::diff::text_diff::compute_text_diff;
use crate::application::services::versions::snapshot::VersionService;

pub struct VersionDiffSide {
    pub record: VersionRecord,
    pub text: String,
}

impl VersionDiffSide {
    /// Length as a browser reports it for the same string.
    pub fn text_length(&self) -> usize {
        self.text.encode_utf16().count()
    }
}

pub struct VersionDiffResult {
    pub base: VersionDiffSide,
    pub target: VersionDiffSide,
    pub diff: TextDiffResult,
}

pub struct VersionDiff<'a> {
    pub versions: &'a VersionService,
}

impl<'a> VersionDiff<'a> {
    /// Compares version `base` (older) with version `target` (newer).
    ///
    /// Returns `Ok(None)` when either version is unknown. Snapshot problems on
    /// either side do not fail the comparison; that side reads as empty text.
    pub async fn execute(
        &self,
        document_id: &str,
        base: Option<i64>,
        target: Option<i64>,
    ) -> anyhow::Result<Option<VersionDiffResult>> {
        let records = self.versions.list(document_id).await?;
        let find = |number: Option<i64>| {
            number.and_then(|n| records.iter().find(|r| r.version_number == n).cloned())
        };
        let (Some(base_record), Some(target_record)) = (find(base), find(target)) else {
            return Ok(None);
        };

        let (base_text, target_text) = tokio::join!(
            self.versions
                .load_text(document_id, base_record.version_number),
            self.versions
                .load_text(document_id, target_record.version_number),
        );

        let diff = compute_text_diff(&base_text, &target_text);

        Ok(Some(VersionDiffResult {
            base: VersionDiffSide {
                record: base_record,
                text: base_text,
            },
            target: VersionDiffSide {
                record: target_record,
                text: target_text,
            },
            diff,
        }))
    }
}

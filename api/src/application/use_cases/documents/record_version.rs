use crate::application::ports::document_version_repository::VersionRecord;
use crate::application::services::versions::snapshot::VersionService;

pub struct RecordVersion<'a> {
    pub versions: &'a VersionService,
}

impl<'a> RecordVersion<'a> {
    pub async fn execute(
        &self,
        document_id: &str,
        text: String,
        label: Option<&str>,
        created_by: Option<&str>,
    ) -> anyhow::Result<VersionRecord> {
        let record = self
            .versions
            .record_text_version(document_id, text, label, created_by)
            .await?;
        tracing::info!(
            document_id,
            version = record.version_number,
            byte_size = record.byte_size,
            "document_version_recorded"
        );
        Ok(record)
    }
}

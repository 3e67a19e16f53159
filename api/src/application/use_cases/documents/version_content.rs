use crate::application::ports::document_version_repository::VersionRecord;
use crate::application::services::versions::snapshot::VersionService;

pub struct VersionContent {
    pub record: VersionRecord,
    pub text: String,
}

pub struct GetVersionContent<'a> {
    pub versions: &'a VersionService,
}

impl<'a> GetVersionContent<'a> {
    pub async fn execute(
        &self,
        document_id: &str,
        version_number: Option<i64>,
    ) -> anyhow::Result<Option<VersionContent>> {
        let Some(version_number) = version_number else {
            return Ok(None);
        };
        let Some(record) = self
            .versions
            .list(document_id)
            .await?
            .into_iter()
            .find(|v| v.version_number == version_number)
        else {
            return Ok(None);
        };
        let text = self.versions.load_text(document_id, version_number).await;
        Ok(Some(VersionContent { record, text }))
    }
}

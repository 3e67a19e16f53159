use crate::application::ports::document_version_repository::VersionRecord;
use crate::application::services::versions::snapshot::VersionService;

pub struct ListVersions<'a> {
    pub versions: &'a VersionService,
}

impl<'a> ListVersions<'a> {
    pub async fn execute(&self, document_id: &str) -> anyhow::Result<Vec<VersionRecord>> {
        self.versions.list(document_id).await
    }
}

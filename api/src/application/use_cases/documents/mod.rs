pub mod list_versions;
pub mod record_version;
pub mod version_content;
pub mod version_diff;

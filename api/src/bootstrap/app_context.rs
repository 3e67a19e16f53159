use std::sync::Arc;

use crate::application::ports::document_version_repository::DocumentVersionRepository;
use crate::application::services::versions::snapshot::VersionService;
use crate::bootstrap::config::Config;
use crate::infrastructure::db;
use crate::infrastructure::db::repositories::document_version_repository_sqlx::SqlxDocumentVersionRepository;
use crate::infrastructure::memory::document_version_repository_memory::InMemoryDocumentVersionRepository;

/// Shared state of every router.
#[derive(Clone)]
pub struct AppContext {
    pub cfg: Arc<Config>,
    version_service: Arc<VersionService>,
}

impl AppContext {
    /// Connects the version store named by `cfg` and wires the services.
    pub async fn init(cfg: Config) -> anyhow::Result<Self> {
        let repo: Arc<dyn DocumentVersionRepository> = match cfg.database_url.as_deref() {
            Some(url) => {
                let pool = db::connect(url, cfg.db_max_connections).await?;
                if cfg.run_migrations {
                    db::migrate(&pool).await?;
                    tracing::info!("database_migrations_applied");
                }
                Arc::new(SqlxDocumentVersionRepository::new(pool))
            }
            None => {
                tracing::warn!("database_url_unset_using_in_memory_version_store");
                Arc::new(InMemoryDocumentVersionRepository::new())
            }
        };
        Ok(Self::with_repository(cfg, repo))
    }

    pub fn with_repository(cfg: Config, repo: Arc<dyn DocumentVersionRepository>) -> Self {
        let version_service = Arc::new(VersionService::new(repo, cfg.max_snapshot_bytes));
        Self {
            cfg: Arc::new(cfg),
            version_service,
        }
    }

    pub fn version_service(&self) -> Arc<VersionService> {
        self.version_service.clone()
    }
}

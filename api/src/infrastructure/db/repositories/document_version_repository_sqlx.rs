use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::document_version_repository::{
    DocumentVersionRepository, VersionInsert, VersionRecord,
};
use crate::infrastructure::db::PgPool;

pub struct SqlxDocumentVersionRepository {
    pool: PgPool,
}

impl SqlxDocumentVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> VersionRecord {
    VersionRecord {
        document_id: row.get("document_id"),
        version_number: row.get::<i32, _>("version_number") as i64,
        label: row.try_get("label").ok().flatten(),
        created_at: row.get("created_at"),
        created_by: row.try_get("created_by").ok().flatten(),
        byte_size: row.get("byte_size"),
    }
}

#[async_trait]
impl DocumentVersionRepository for SqlxDocumentVersionRepository {
    async fn list_versions(&self, document_id: &str) -> anyhow::Result<Vec<VersionRecord>> {
        let rows = sqlx::query(
            r#"SELECT
                    document_id,
                    version_number,
                    label,
                    created_at,
                    created_by,
                    byte_size
               FROM document_versions
               WHERE document_id = $1
               ORDER BY version_number ASC"#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn get_snapshot(
        &self,
        document_id: &str,
        version_number: i64,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        // version_number is INTEGER; anything outside i32 cannot exist
        let Ok(version_number) = i32::try_from(version_number) else {
            return Ok(None);
        };
        let snapshot: Option<Vec<u8>> = sqlx::query_scalar(
            r#"SELECT snapshot
               FROM document_versions
               WHERE document_id = $1 AND version_number = $2"#,
        )
        .bind(document_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(snapshot)
    }

    async fn insert_version(&self, input: VersionInsert<'_>) -> anyhow::Result<VersionRecord> {
        let mut tx = self.pool.begin().await?;
        // serialize writers of the same document until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(input.document_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"INSERT INTO document_versions (
                    document_id,
                    version_number,
                    snapshot,
                    label,
                    created_by,
                    byte_size
                )
                SELECT $1, COALESCE(MAX(version_number), 0) + 1, $2, $3, $4, $5
                FROM document_versions
                WHERE document_id = $1
                RETURNING
                    document_id,
                    version_number,
                    label,
                    created_at,
                    created_by,
                    byte_size"#,
        )
        .bind(input.document_id)
        .bind(input.snapshot)
        .bind(input.label)
        .bind(input.created_by)
        .bind(input.snapshot.len() as i64)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record_from_row(&row))
    }
}

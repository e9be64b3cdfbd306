//! PostgreSQL implementation of DocumentVersionRepository.
//!
//! The version row is inserted inside a transaction, the artifact is written
//! while that insert is pending, and the transaction commits only after the
//! write succeeded. The `(company_id, version)` primary key rejects a
//! concurrent writer at insert time, before its artifact is touched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, Timestamp, UserId};
use crate::ports::{ArtifactStore, DocumentVersionRepository};

const SELECT_COLUMNS: &str =
    "company_id, version, artifact_ref, checksum, size_bytes, created_by, created_at";

/// PostgreSQL implementation of DocumentVersionRepository.
pub struct PostgresDocumentVersionRepository {
    pool: PgPool,
    artifacts: Arc<dyn ArtifactStore>,
}

impl PostgresDocumentVersionRepository {
    pub fn new(pool: PgPool, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { pool, artifacts }
    }

    fn row_to_version(row: &PgRow) -> Result<DocumentVersion, DomainError> {
        let map = |e: sqlx::Error| DomainError::database("Failed to decode document row", e);

        let company_id: uuid::Uuid = row.try_get("company_id").map_err(map)?;
        let version: i32 = row.try_get("version").map_err(map)?;
        let size_bytes: i64 = row.try_get("size_bytes").map_err(map)?;
        let created_by: String = row.try_get("created_by").map_err(map)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map)?;

        Ok(DocumentVersion {
            entity_id: EntityId::from_uuid(company_id),
            version: u32::try_from(version).map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid stored version: {}", version),
                )
            })?,
            artifact_ref: row.try_get("artifact_ref").map_err(map)?,
            checksum: row.try_get("checksum").map_err(map)?,
            size_bytes: u64::try_from(size_bytes).unwrap_or_default(),
            created_at: Timestamp::from_datetime(created_at),
            created_by: UserId::new(created_by)?,
        })
    }
}

fn version_param(version: u32) -> Result<i32, DomainError> {
    i32::try_from(version).map_err(|_| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Version {} out of range", version),
        )
    })
}

#[async_trait]
impl DocumentVersionRepository for PostgresDocumentVersionRepository {
    async fn max_version(&self, entity_id: &EntityId) -> Result<Option<u32>, DomainError> {
        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM company_documents WHERE company_id = $1")
                .bind(entity_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to read max version", e))?;

        Ok(max.and_then(|v| u32::try_from(v).ok()))
    }

    async fn record(&self, document: &DocumentVersion, content: &[u8]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO company_documents
                (company_id, version, artifact_ref, checksum, size_bytes, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(document.entity_id.as_uuid())
        .bind(version_param(document.version)?)
        .bind(&document.artifact_ref)
        .bind(&document.checksum)
        .bind(i64::try_from(document.size_bytes).unwrap_or(i64::MAX))
        .bind(document.created_by.as_str())
        .bind(document.created_at.as_datetime())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!(
                        "Version {} already exists for entity {}",
                        document.version, document.entity_id
                    ),
                )
                .with_detail("version", document.version.to_string()));
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(DomainError::new(
                    ErrorCode::EntityNotFound,
                    format!("Entity {} not found", document.entity_id),
                ));
            }
            Err(e) => return Err(DomainError::database("Failed to insert document version", e)),
        }

        // Dropping `tx` on error rolls the insert back.
        self.artifacts
            .write(&document.entity_id, document.version, content)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn list(&self, entity_id: &EntityId) -> Result<Vec<DocumentVersion>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM company_documents WHERE company_id = $1 ORDER BY version DESC",
            SELECT_COLUMNS
        ))
        .bind(entity_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list document versions", e))?;

        rows.iter().map(Self::row_to_version).collect()
    }

    async fn find(
        &self,
        entity_id: &EntityId,
        version: u32,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM company_documents WHERE company_id = $1 AND version = $2",
            SELECT_COLUMNS
        ))
        .bind(entity_id.as_uuid())
        .bind(version_param(version)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load document version", e))?;

        row.as_ref().map(Self::row_to_version).transpose()
    }

    async fn find_latest(
        &self,
        entity_id: &EntityId,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM company_documents WHERE company_id = $1 \
             ORDER BY version DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(entity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load latest document version", e))?;

        row.as_ref().map(Self::row_to_version).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_param_accepts_small_versions() {
        assert_eq!(version_param(7).unwrap(), 7);
    }

    #[test]
    fn version_param_rejects_overflow() {
        let err = version_param(u32::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}

use super::DocumentStore;
use crate::document::CanvasDocument;
use crate::error::{Error, Result};

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, instrument};

impl DocumentStore {
    // ── Writes ──────────────────────────────────────────────────

    /// Write the whole document, replacing any record with the same id.
    #[instrument(skip(self, document), fields(canvas_id = %document.id))]
    pub async fn upsert(&self, document: &CanvasDocument) -> Result<()> {
        let pool = self.pool().await?;
        let elements = serde_json::to_string(&document.elements)?;
        let app_state = serde_json::to_string(&document.app_state)?;
        let files = serde_json::to_string(&document.files)?;

        sqlx::query(
            "INSERT INTO drawings (id, name, elements, app_state, files, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name      = excluded.name,
                elements  = excluded.elements,
                app_state = excluded.app_state,
                files     = excluded.files,
                timestamp = excluded.timestamp",
        )
        .bind(&document.id)
        .bind(&document.name)
        .bind(&elements)
        .bind(&app_state)
        .bind(&files)
        .bind(document.timestamp)
        .execute(pool)
        .await
        .map_err(|e| Error::write(e.to_string()))?;

        debug!("Upserted canvas {}", document.id);
        Ok(())
    }

    /// Remove a document. Absent ids are a no-op.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM drawings WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| Error::write(e.to_string()))?;

        debug!("Deleted {} row(s) for canvas {id}", result.rows_affected());
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Look a document up by id. A miss is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<CanvasDocument>> {
        let pool = self.pool().await?;
        let row = sqlx::query(
            "SELECT id, name, elements, app_state, files, timestamp
             FROM drawings WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::read(e.to_string()))?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    /// Every stored document, in no particular order.
    pub async fn get_all(&self) -> Result<Vec<CanvasDocument>> {
        let pool = self.pool().await?;
        let rows = sqlx::query("SELECT id, name, elements, app_state, files, timestamp FROM drawings")
            .fetch_all(pool)
            .await
            .map_err(|e| Error::read(e.to_string()))?;

        rows.iter().map(Self::row_to_document).collect()
    }

    pub(crate) fn row_to_document(row: &SqliteRow) -> Result<CanvasDocument> {
        let elements: String = row.try_get("elements").map_err(|e| Error::read(e.to_string()))?;
        let app_state: String = row
            .try_get("app_state")
            .map_err(|e| Error::read(e.to_string()))?;
        let files: String = row.try_get("files").map_err(|e| Error::read(e.to_string()))?;

        Ok(CanvasDocument {
            id: row.try_get("id").map_err(|e| Error::read(e.to_string()))?,
            name: row.try_get("name").map_err(|e| Error::read(e.to_string()))?,
            elements: serde_json::from_str(&elements)?,
            app_state: serde_json::from_str(&app_state)?,
            files: serde_json::from_str(&files)?,
            timestamp: row
                .try_get("timestamp")
                .map_err(|e| Error::read(e.to_string()))?,
        })
    }
}

use crate::error::{Error, Result};

use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

/// Schema version recorded in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

// ── Migrations ──────────────────────────────────────────────

/// Upgrade the schema to [`SCHEMA_VERSION`].
///
/// Only creates what is missing; rows written by earlier versions are left as
/// they are. A database stamped with a newer version is refused.
pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    if current > SCHEMA_VERSION {
        return Err(Error::unavailable(format!(
            "database schema version {current} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    if current == SCHEMA_VERSION {
        debug!("Canvas store schema already at v{SCHEMA_VERSION}");
        return Ok(());
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drawings (
            id        TEXT PRIMARY KEY,
            name      TEXT NOT NULL,
            elements  TEXT NOT NULL DEFAULT '[]',
            app_state TEXT NOT NULL DEFAULT '{}',
            files     TEXT NOT NULL DEFAULT '{}',
            timestamp INTEGER NOT NULL
        )",
    )
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::unavailable(e.to_string()))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_drawings_name ON drawings(name)")
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_drawings_timestamp ON drawings(timestamp)")
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    // PRAGMA does not take bound parameters
    let stamp = format!("PRAGMA user_version = {SCHEMA_VERSION}");
    sqlx::query(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| Error::unavailable(e.to_string()))?;

    info!("Canvas store schema upgraded from v{current} to v{SCHEMA_VERSION}");
    Ok(())
}

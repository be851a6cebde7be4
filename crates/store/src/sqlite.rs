//! SQLite store with parking history.
//!
//! Two tables:
//! - `lot` — a single row holding the current capacity
//! - `parking` — one row per visit; leaving sets `active = 0` and `left_at`
//!   instead of deleting, so past visits stay queryable
//!
//! Re-creating the lot wipes both the occupancy and the history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkinglot_core::error::StoreError;
use parkinglot_core::lot::{ParkingRecord, SlotId};
use parkinglot_core::store::{LotChange, LotSnapshot, LotStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// One visit of a vehicle, past or present.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub record: ParkingRecord,
    pub parked_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

/// A SQLite-backed lot store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // One connection: a single writer, and `:memory:` databases are
        // per-connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite lot store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lot (
                id        INTEGER PRIMARY KEY CHECK (id = 1),
                capacity  INTEGER NOT NULL CHECK (capacity >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("lot table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parking (
                id                   INTEGER PRIMARY KEY AUTOINCREMENT,
                slot_id              INTEGER NOT NULL,
                registration_number  TEXT NOT NULL,
                colour               TEXT NOT NULL,
                active               INTEGER NOT NULL DEFAULT 1,
                parked_at            TEXT NOT NULL,
                left_at              TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("parking table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_parking_registration ON parking(registration_number)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("registration index: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_parking_colour ON parking(colour)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("colour index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Every visit of a vehicle, newest first.
    pub async fn history(&self, registration_number: &str) -> Result<Vec<Visit>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM parking WHERE registration_number = ?1 ORDER BY id DESC",
        )
        .bind(registration_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("history: {e}")))?;

        rows.iter().map(Self::row_to_visit).collect()
    }

    fn row_to_visit(row: &sqlx::sqlite::SqliteRow) -> Result<Visit, StoreError> {
        let slot_id: i64 = row
            .try_get("slot_id")
            .map_err(|e| StoreError::QueryFailed(format!("slot_id column: {e}")))?;
        let registration_number: String = row
            .try_get("registration_number")
            .map_err(|e| StoreError::QueryFailed(format!("registration_number column: {e}")))?;
        let colour: String = row
            .try_get("colour")
            .map_err(|e| StoreError::QueryFailed(format!("colour column: {e}")))?;
        let active: bool = row
            .try_get("active")
            .map_err(|e| StoreError::QueryFailed(format!("active column: {e}")))?;
        let parked_at: String = row
            .try_get("parked_at")
            .map_err(|e| StoreError::QueryFailed(format!("parked_at column: {e}")))?;
        let left_at: Option<String> = row
            .try_get("left_at")
            .map_err(|e| StoreError::QueryFailed(format!("left_at column: {e}")))?;

        let slot_id = u32::try_from(slot_id)
            .map_err(|_| StoreError::Corrupt(format!("slot id {slot_id} out of range")))?;

        Ok(Visit {
            record: ParkingRecord {
                slot_id: SlotId(slot_id),
                registration_number,
                colour,
                active,
            },
            parked_at: parse_timestamp(&parked_at)?,
            left_at: left_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {s:?}: {e}")))
}

#[async_trait]
impl LotStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<Option<LotSnapshot>, StoreError> {
        let row = sqlx::query("SELECT capacity FROM lot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("lot: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let capacity: i64 = row
            .try_get("capacity")
            .map_err(|e| StoreError::QueryFailed(format!("capacity column: {e}")))?;
        let capacity = u32::try_from(capacity)
            .map_err(|_| StoreError::Corrupt(format!("capacity {capacity} out of range")))?;

        let rows = sqlx::query("SELECT * FROM parking WHERE active = 1 ORDER BY slot_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("active parkings: {e}")))?;

        let records = rows
            .iter()
            .map(|row| Self::row_to_visit(row).map(|visit| visit.record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(LotSnapshot { capacity, records }))
    }

    async fn apply(&self, change: &LotChange) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        match change {
            LotChange::Created { capacity } => {
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| StoreError::Storage(format!("BEGIN failed: {e}")))?;

                sqlx::query("DELETE FROM parking")
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| StoreError::Storage(format!("clear parkings: {e}")))?;

                sqlx::query(
                    r#"
                    INSERT INTO lot (id, capacity) VALUES (1, ?1)
                    ON CONFLICT(id) DO UPDATE SET capacity = excluded.capacity
                    "#,
                )
                .bind(i64::from(*capacity))
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Storage(format!("set capacity: {e}")))?;

                tx.commit()
                    .await
                    .map_err(|e| StoreError::Storage(format!("COMMIT failed: {e}")))?;
            }
            LotChange::Parked(record) => {
                sqlx::query(
                    r#"
                    INSERT INTO parking (slot_id, registration_number, colour, active, parked_at)
                    VALUES (?1, ?2, ?3, 1, ?4)
                    "#,
                )
                .bind(i64::from(record.slot_id.0))
                .bind(&record.registration_number)
                .bind(&record.colour)
                .bind(&now)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Storage(format!("INSERT parking failed: {e}")))?;
            }
            LotChange::Left { slot_id } => {
                let result = sqlx::query(
                    "UPDATE parking SET active = 0, left_at = ?1 WHERE slot_id = ?2 AND active = 1",
                )
                .bind(&now)
                .bind(i64::from(slot_id.0))
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Storage(format!("UPDATE parking failed: {e}")))?;
                debug!(%slot_id, rows = result.rows_affected(), "Marked parking inactive");
            }
        }
        Ok(())
    }
}

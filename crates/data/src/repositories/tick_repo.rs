//! Tick repository.
//!
//! Provides operations for normalized tick storage and retrieval. The
//! composite primary key on `(symbol, event_time)` absorbs duplicate
//! deliveries: re-inserting an existing row is a no-op, so reconnect
//! replays never produce duplicates downstream.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::TickRecord;

/// Repository for tick operations.
///
/// Handles high-frequency trade data arriving from exchange WebSocket
/// feeds, one row per (instrument, millisecond).
#[derive(Debug, Clone)]
pub struct TickRepository {
    pool: PgPool,
}

impl TickRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the ticks table when it does not exist yet.
    ///
    /// Idempotent; called once at startup before ingestion begins.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ticks (
                symbol      TEXT        NOT NULL,
                event_time  TIMESTAMPTZ NOT NULL,
                price       NUMERIC     NOT NULL,
                size        NUMERIC     NOT NULL,
                PRIMARY KEY (symbol, event_time)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a single tick.
    ///
    /// Uses ON CONFLICT DO NOTHING for idempotent inserts; the first tick
    /// for an (instrument, millisecond) key wins.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, record: &TickRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ticks (symbol, event_time, price, size)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (symbol, event_time) DO NOTHING
            "#,
        )
        .bind(&record.symbol)
        .bind(record.event_time)
        .bind(record.price)
        .bind(record.size)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Queries ticks for a symbol from `since` onward, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn query_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>> {
        let records = sqlx::query_as::<_, TickRecord>(
            r#"
            SELECT symbol, event_time, price, size
            FROM ticks
            WHERE symbol = $1 AND event_time >= $2
            ORDER BY event_time ASC
            "#,
        )
        .bind(symbol)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Queries ticks for a symbol within `[start, end)`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn query_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>> {
        let records = sqlx::query_as::<_, TickRecord>(
            r#"
            SELECT symbol, event_time, price, size
            FROM ticks
            WHERE symbol = $1 AND event_time >= $2 AND event_time < $3
            ORDER BY event_time ASC
            "#,
        )
        .bind(symbol)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets the most recent tick for a symbol.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_latest(&self, symbol: &str) -> Result<Option<TickRecord>> {
        let record = sqlx::query_as::<_, TickRecord>(
            r#"
            SELECT symbol, event_time, price, size
            FROM ticks
            WHERE symbol = $1
            ORDER BY event_time DESC
            LIMIT 1
            "#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Counts ticks for a symbol from `since` onward.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn count_since(&self, symbol: &str, since: DateTime<Utc>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM ticks
            WHERE symbol = $1 AND event_time >= $2
            "#,
        )
        .bind(symbol)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}

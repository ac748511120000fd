//! Queue snapshot persistence.
//!
//! The snapshot is written after every successful mutation and reloaded
//! at process start, so in-memory state never diverges from the persisted
//! state for longer than one operation cycle. A full replace inside one
//! transaction keeps the three records (tokens, counters, meta) mutually
//! consistent.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use govqueue_types::{
    Counter, CounterId, QueueSnapshot, ServiceCategory, Token, TokenId, TokenStatus,
};

use crate::error::DbError;

/// Operations on the `tokens`, `counters`, and `queue_meta` tables.
pub struct SnapshotStore<'a> {
    pool: &'a PgPool,
}

impl<'a> SnapshotStore<'a> {
    /// Create a new snapshot store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist the full queue snapshot, replacing whatever was stored.
    ///
    /// Runs as a single transaction: either the whole snapshot lands or
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails.
    pub async fn save_snapshot(&self, snapshot: &QueueSnapshot) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tokens").execute(&mut *tx).await?;
        for (index, token) in snapshot.tokens.iter().enumerate() {
            let ordinal = i64::try_from(index).unwrap_or(i64::MAX);
            sqlx::query(
                r"INSERT INTO tokens
                  (id, ordinal, display_id, category, requester_name, requester_phone,
                   is_priority, status, issued_at, assigned_counter, completed_at)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(token.id.into_inner())
            .bind(ordinal)
            .bind(&token.display_id)
            .bind(token.category.as_str())
            .bind(token.requester_name.as_deref())
            .bind(token.requester_phone.as_deref())
            .bind(token.is_priority)
            .bind(token.status.as_str())
            .bind(token.issued_at)
            .bind(token.assigned_counter.map(|c| i64::from(c.into_inner())))
            .bind(token.completed_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM counters").execute(&mut *tx).await?;
        for (index, counter) in snapshot.counters.iter().enumerate() {
            let ordinal = i64::try_from(index).unwrap_or(i64::MAX);
            sqlx::query(
                r"INSERT INTO counters
                  (id, ordinal, name, is_active, current_token_id)
                  VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(i64::from(counter.id.into_inner()))
            .bind(ordinal)
            .bind(&counter.name)
            .bind(counter.is_active)
            .bind(counter.current_token_id.map(TokenId::into_inner))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"INSERT INTO queue_meta (singleton, last_reset_date)
              VALUES (TRUE, $1)
              ON CONFLICT (singleton) DO UPDATE SET
                last_reset_date = EXCLUDED.last_reset_date",
        )
        .bind(snapshot.last_reset_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            tokens = snapshot.tokens.len(),
            counters = snapshot.counters.len(),
            "Saved queue snapshot"
        );
        Ok(())
    }

    /// Load the persisted snapshot, or `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails, or
    /// [`DbError::Corrupt`] if a stored row cannot be mapped back to a
    /// domain value.
    pub async fn load_snapshot(&self) -> Result<Option<QueueSnapshot>, DbError> {
        let last_reset_date: Option<NaiveDate> =
            sqlx::query_scalar("SELECT last_reset_date FROM queue_meta")
                .fetch_optional(self.pool)
                .await?;
        let Some(last_reset_date) = last_reset_date else {
            return Ok(None);
        };

        let token_rows = sqlx::query_as::<_, TokenRow>(
            r"SELECT id, ordinal, display_id, category, requester_name, requester_phone,
                     is_priority, status, issued_at, assigned_counter, completed_at
              FROM tokens
              ORDER BY ordinal",
        )
        .fetch_all(self.pool)
        .await?;

        let counter_rows = sqlx::query_as::<_, CounterRow>(
            r"SELECT id, ordinal, name, is_active, current_token_id
              FROM counters
              ORDER BY ordinal",
        )
        .fetch_all(self.pool)
        .await?;

        let tokens = token_rows
            .into_iter()
            .map(TokenRow::into_domain)
            .collect::<Result<Vec<Token>, DbError>>()?;
        let counters = counter_rows
            .into_iter()
            .map(CounterRow::into_domain)
            .collect::<Result<Vec<Counter>, DbError>>()?;

        tracing::debug!(
            tokens = tokens.len(),
            counters = counters.len(),
            "Loaded queue snapshot"
        );

        Ok(Some(QueueSnapshot {
            tokens,
            counters,
            last_reset_date,
        }))
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One persisted token row.
#[derive(Debug, sqlx::FromRow)]
pub struct TokenRow {
    /// Token identity.
    pub id: Uuid,
    /// Insertion-order ordinal.
    pub ordinal: i64,
    /// Display label.
    pub display_id: String,
    /// Category string form.
    pub category: String,
    /// Requester name.
    pub requester_name: Option<String>,
    /// Requester phone.
    pub requester_phone: Option<String>,
    /// Priority flag.
    pub is_priority: bool,
    /// Status string form.
    pub status: String,
    /// Issuance timestamp.
    pub issued_at: DateTime<Utc>,
    /// Assigned counter number, if Serving.
    pub assigned_counter: Option<i64>,
    /// Completion timestamp, if Completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TokenRow {
    /// Map the row back to a domain [`Token`].
    fn into_domain(self) -> Result<Token, DbError> {
        let category = ServiceCategory::parse(&self.category)
            .ok_or_else(|| DbError::Corrupt(format!("unknown category: {}", self.category)))?;
        let status = TokenStatus::parse(&self.status)
            .ok_or_else(|| DbError::Corrupt(format!("unknown status: {}", self.status)))?;
        let assigned_counter = self
            .assigned_counter
            .map(|raw| {
                u32::try_from(raw)
                    .map(CounterId::new)
                    .map_err(|_err| DbError::Corrupt(format!("counter id out of range: {raw}")))
            })
            .transpose()?;

        Ok(Token {
            id: TokenId::from(self.id),
            display_id: self.display_id,
            category,
            requester_name: self.requester_name,
            requester_phone: self.requester_phone,
            is_priority: self.is_priority,
            status,
            issued_at: self.issued_at,
            assigned_counter,
            completed_at: self.completed_at,
        })
    }
}

/// One persisted counter row.
#[derive(Debug, sqlx::FromRow)]
pub struct CounterRow {
    /// Counter number.
    pub id: i64,
    /// Insertion-order ordinal.
    pub ordinal: i64,
    /// Display label.
    pub name: String,
    /// Availability flag.
    pub is_active: bool,
    /// The token being served, if any.
    pub current_token_id: Option<Uuid>,
}

impl CounterRow {
    /// Map the row back to a domain [`Counter`].
    fn into_domain(self) -> Result<Counter, DbError> {
        let id = u32::try_from(self.id)
            .map(CounterId::new)
            .map_err(|_err| DbError::Corrupt(format!("counter id out of range: {}", self.id)))?;

        Ok(Counter {
            id,
            name: self.name,
            is_active: self.is_active,
            current_token_id: self.current_token_id.map(TokenId::from),
        })
    }
}

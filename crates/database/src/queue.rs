//! Daily ticket pool persistence operations.

use chrono::NaiveDate;
use queue_core::pool::TicketPool;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::PoolRow;

/// Load the pool keyed by a day, if one was persisted.
pub async fn get_pool(pool: &SqlitePool, day: NaiveDate) -> Result<Option<TicketPool>> {
    let row = sqlx::query_as::<_, PoolRow>(
        r#"
        SELECT day, current_number, available, called, last_reset_at
        FROM ticket_pools
        WHERE day = ?
        "#,
    )
    .bind(day.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(PoolRow::into_pool).transpose()
}

/// Insert or replace the pool for its day.
pub async fn upsert_pool(pool: &SqlitePool, ticket_pool: &TicketPool) -> Result<()> {
    let row = PoolRow::from_pool(ticket_pool);

    sqlx::query(
        r#"
        INSERT INTO ticket_pools (day, current_number, available, called, last_reset_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(day) DO UPDATE SET
            current_number = excluded.current_number,
            available = excluded.available,
            called = excluded.called,
            last_reset_at = excluded.last_reset_at
        "#,
    )
    .bind(&row.day)
    .bind(row.current_number)
    .bind(&row.available)
    .bind(&row.called)
    .bind(&row.last_reset_at)
    .execute(pool)
    .await?;

    Ok(())
}

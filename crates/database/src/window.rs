//! Window persistence operations.

use queue_core::window::Window;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::WindowRow;

/// Load every window, sorted by display number.
pub async fn list_windows(pool: &SqlitePool) -> Result<Vec<Window>> {
    let rows = sqlx::query_as::<_, WindowRow>(
        r#"
        SELECT id, number, color, active, operator, current_ticket, recently_called, announcement
        FROM windows
        ORDER BY number
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(WindowRow::into_window).collect()
}

/// Get one window by id.
pub async fn get_window(pool: &SqlitePool, id: &str) -> Result<Window> {
    let row = sqlx::query_as::<_, WindowRow>(
        r#"
        SELECT id, number, color, active, operator, current_ticket, recently_called, announcement
        FROM windows
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Window",
        id: id.to_string(),
    })?;

    row.into_window()
}

/// Insert or replace a window.
pub async fn upsert_window(pool: &SqlitePool, window: &Window) -> Result<()> {
    let row = WindowRow::from_window(window);

    sqlx::query(
        r#"
        INSERT INTO windows (id, number, color, active, operator, current_ticket, recently_called, announcement)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            number = excluded.number,
            color = excluded.color,
            active = excluded.active,
            operator = excluded.operator,
            current_ticket = excluded.current_ticket,
            recently_called = excluded.recently_called,
            announcement = excluded.announcement
        "#,
    )
    .bind(&row.id)
    .bind(row.number)
    .bind(&row.color)
    .bind(row.active)
    .bind(&row.operator)
    .bind(&row.current_ticket)
    .bind(&row.recently_called)
    .bind(&row.announcement)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Window",
                    id: window.number.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Delete a window by id.
pub async fn delete_window(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM windows
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Window",
            id: id.to_string(),
        });
    }

    Ok(())
}

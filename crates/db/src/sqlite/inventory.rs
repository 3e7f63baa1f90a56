//! SQLite-Implementierung des InventoryRepository

use pokearena_core::UserId;

use crate::error::DbError;
use crate::models::InventarEintrag;
use crate::repository::{DbResult, InventoryRepository};
use crate::sqlite::pool::SqliteDb;

impl InventoryRepository for SqliteDb {
    async fn get_inventory(&self, user_id: UserId) -> DbResult<Vec<InventarEintrag>> {
        let rows = sqlx::query(
            "SELECT user_id, item, quantity FROM inventory
             WHERE user_id = ? ORDER BY item",
        )
        .bind(user_id.inner())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_eintrag).collect()
    }

    async fn get_item(&self, user_id: UserId, item: &str) -> DbResult<Option<InventarEintrag>> {
        let row = sqlx::query(
            "SELECT user_id, item, quantity FROM inventory
             WHERE user_id = ? AND item = ?",
        )
        .bind(user_id.inner())
        .bind(item)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_eintrag(&r)).transpose()
    }

    async fn upsert(&self, user_id: UserId, item: &str, quantity: i64) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO inventory (user_id, item, quantity) VALUES (?, ?, ?)
             ON CONFLICT(user_id, item) DO UPDATE SET quantity = excluded.quantity",
        )
        .bind(user_id.inner())
        .bind(item)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, &format!("Inventar von {user_id}, Item '{item}'")))?;

        Ok(())
    }

    async fn add(&self, user_id: UserId, item: &str, delta: i64) -> DbResult<InventarEintrag> {
        // Ohne Schranke wuerde SQLite die Summe bei Ueberlauf als REAL speichern
        let row = sqlx::query(
            "INSERT INTO inventory (user_id, item, quantity) VALUES (?, ?, ?)
             ON CONFLICT(user_id, item) DO UPDATE SET quantity = quantity + excluded.quantity
             WHERE inventory.quantity <= 9223372036854775807 - excluded.quantity
             RETURNING user_id, item, quantity",
        )
        .bind(user_id.inner())
        .bind(item)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, &format!("Inventar von {user_id}, Item '{item}'")))?;

        match row {
            Some(r) => row_to_eintrag(&r),
            None => Err(DbError::UngueltigeDaten(format!(
                "Menge von '{item}' fuer {user_id} wuerde ueberlaufen"
            ))),
        }
    }
}

fn row_to_eintrag(row: &sqlx::sqlite::SqliteRow) -> DbResult<InventarEintrag> {
    use sqlx::Row as _;

    Ok(InventarEintrag {
        user_id: UserId(row.try_get("user_id")?),
        item: row.try_get("item")?,
        quantity: row.try_get("quantity")?,
    })
}

// src/db/inventory_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{map_fk_violation, DeletePolicy, InventoryStore, PgRepository},
    models::inventory::{Inventory, NewInventory},
};

const INVENTORY_SELECT: &str = r#"
    SELECT
        inv.id, inv.name, inv.date, inv.user_id,
        ARRAY(SELECT it.id FROM inventory_item it WHERE it.inventory_id = inv.id ORDER BY it.id) AS items
    FROM inventory inv
"#;

#[async_trait]
impl InventoryStore for PgRepository {
    async fn list_inventories(&self, user_id: Option<i64>) -> Result<Vec<Inventory>, AppError> {
        let inventories = sqlx::query_as::<_, Inventory>(&format!(
            "{INVENTORY_SELECT} WHERE ($1::BIGINT IS NULL OR inv.user_id = $1) ORDER BY inv.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(inventories)
    }

    async fn find_inventory(&self, id: i64) -> Result<Option<Inventory>, AppError> {
        let inventory = sqlx::query_as::<_, Inventory>(&format!("{INVENTORY_SELECT} WHERE inv.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inventory)
    }

    async fn insert_inventory(&self, new: NewInventory) -> Result<Inventory, AppError> {
        sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (name, date, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, date, user_id, '{}'::BIGINT[] AS items
            "#,
        )
        .bind(&new.name)
        .bind(new.date)
        .bind(new.user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, AppError::InvalidReference { field: "user", id: new.user }))
    }

    async fn update_inventory(&self, inventory: &Inventory) -> Result<Option<Inventory>, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE inventory SET name = $2, date = $3, user_id = $4 WHERE id = $1")
            .bind(inventory.id)
            .bind(&inventory.name)
            .bind(inventory.date)
            .bind(inventory.user)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_fk_violation(e, AppError::InvalidReference { field: "user", id: inventory.user })
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, Inventory>(&format!("{INVENTORY_SELECT} WHERE inv.id = $1"))
            .bind(inventory.id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_inventory(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM inventory WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound { entity: "Inventário", id });
        }

        match policy {
            DeletePolicy::Restrict => {
                let items: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM inventory_item WHERE inventory_id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if items > 0 {
                    return Err(AppError::HasDependents {
                        entity: "Inventário",
                        id,
                        dependents: "itens",
                    });
                }
            }
            DeletePolicy::Cascade => {
                sqlx::query("DELETE FROM inventory_item WHERE inventory_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_fk_violation(
                    e,
                    AppError::HasDependents { entity: "Inventário", id, dependents: "itens" },
                )
            })?;

        tx.commit().await?;
        Ok(())
    }
}

// src/db/item_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{map_fk_violation, ItemStore, PgRepository},
    models::inventory::{InventoryItem, NewInventoryItem},
};

const ITEM_COLUMNS: &str = r#"
    id, inventory_id, department, asset_group, category, inventory_number,
    asset_component, sub_number, acquisition_date, asset_description,
    quantity, initial_value, last_inventory_room, current_room, scanned
"#;

#[async_trait]
impl ItemStore for PgRepository {
    async fn list_items(&self, inventory_id: Option<i64>) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_item \
             WHERE ($1::BIGINT IS NULL OR inventory_id = $1) ORDER BY id"
        ))
        .bind(inventory_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_item(&self, id: i64) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn insert_item(&self, new: NewInventoryItem) -> Result<InventoryItem, AppError> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_item (
                inventory_id, department, asset_group, category, inventory_number,
                asset_component, sub_number, acquisition_date, asset_description,
                quantity, initial_value, last_inventory_room, current_room, scanned
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(new.inventory)
        .bind(new.department)
        .bind(new.asset_group)
        .bind(&new.category)
        .bind(&new.inventory_number)
        .bind(new.asset_component)
        .bind(new.sub_number)
        .bind(new.acquisition_date)
        .bind(&new.asset_description)
        .bind(new.quantity)
        .bind(new.initial_value)
        .bind(&new.last_inventory_room)
        .bind(&new.current_room)
        .bind(new.scanned)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(e, AppError::InvalidReference { field: "inventory", id: new.inventory })
        })
    }

    async fn update_item(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, AppError> {
        let updated = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_item SET
                inventory_id = $2, department = $3, asset_group = $4, category = $5,
                inventory_number = $6, asset_component = $7, sub_number = $8,
                acquisition_date = $9, asset_description = $10, quantity = $11,
                initial_value = $12, last_inventory_room = $13, current_room = $14,
                scanned = $15
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(item.inventory)
        .bind(item.department)
        .bind(item.asset_group)
        .bind(&item.category)
        .bind(&item.inventory_number)
        .bind(item.asset_component)
        .bind(item.sub_number)
        .bind(item.acquisition_date)
        .bind(&item.asset_description)
        .bind(item.quantity)
        .bind(item.initial_value)
        .bind(&item.last_inventory_room)
        .bind(&item.current_room)
        .bind(item.scanned)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(e, AppError::InvalidReference { field: "inventory", id: item.inventory })
        })?;

        Ok(updated)
    }

    async fn delete_item(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inventory_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound { entity: "Item", id });
        }
        Ok(())
    }
}

// src/services/item_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{filled, to_money, validate_required},
    },
    db::Repository,
    models::inventory::{InventoryItem, InventoryItemPayload, NewInventoryItem},
    services::BulkDeleteReport,
};

#[derive(Clone)]
pub struct ItemService {
    repo: Arc<dyn Repository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    async fn ensure_inventory_exists(&self, inventory_id: i64) -> Result<(), AppError> {
        match self.repo.find_inventory(inventory_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::InvalidReference { field: "inventory", id: inventory_id }),
        }
    }

    fn validate_payload(payload: &InventoryItemPayload) -> Result<(), AppError> {
        payload.validate()?;
        payload.validate_consistency()?;
        Ok(())
    }

    pub async fn create(&self, payload: InventoryItemPayload) -> Result<InventoryItem, AppError> {
        validate_required(&[
            ("inventory", payload.inventory.is_some()),
            ("department", payload.department.is_some()),
            ("asset_group", payload.asset_group.is_some()),
            ("category", filled(&payload.category)),
            ("inventory_number", filled(&payload.inventory_number)),
            ("asset_component", payload.asset_component.is_some()),
            ("sub_number", payload.sub_number.is_some()),
            ("acquisition_date", payload.acquisition_date.is_some()),
            ("asset_description", filled(&payload.asset_description)),
            ("quantity", payload.quantity.is_some()),
            ("initial_value", payload.initial_value.is_some()),
            ("lastInventoryRoom", filled(&payload.last_inventory_room)),
        ])?;
        Self::validate_payload(&payload)?;

        let new = NewInventoryItem {
            inventory: payload.inventory.ok_or(AppError::MissingField("inventory"))?,
            department: payload.department.ok_or(AppError::MissingField("department"))?,
            asset_group: payload.asset_group.ok_or(AppError::MissingField("asset_group"))?,
            category: payload.category.ok_or(AppError::MissingField("category"))?,
            inventory_number: payload
                .inventory_number
                .ok_or(AppError::MissingField("inventory_number"))?,
            asset_component: payload
                .asset_component
                .ok_or(AppError::MissingField("asset_component"))?,
            sub_number: payload.sub_number.ok_or(AppError::MissingField("sub_number"))?,
            acquisition_date: payload
                .acquisition_date
                .ok_or(AppError::MissingField("acquisition_date"))?,
            asset_description: payload
                .asset_description
                .ok_or(AppError::MissingField("asset_description"))?,
            quantity: payload.quantity.ok_or(AppError::MissingField("quantity"))?,
            initial_value: to_money(
                payload.initial_value.ok_or(AppError::MissingField("initial_value"))?,
            ),
            last_inventory_room: payload
                .last_inventory_room
                .ok_or(AppError::MissingField("lastInventoryRoom"))?,
            current_room: payload.current_room.flatten(),
            scanned: payload.scanned.flatten(),
        };

        self.ensure_inventory_exists(new.inventory).await?;

        let item = self.repo.insert_item(new).await?;
        tracing::info!(item_id = item.id, inventory_id = item.inventory, "Item criado");
        Ok(item)
    }

    pub async fn list(&self, inventory_id: Option<i64>) -> Result<Vec<InventoryItem>, AppError> {
        self.repo.list_items(inventory_id).await
    }

    pub async fn get(&self, id: i64) -> Result<InventoryItem, AppError> {
        self.repo
            .find_item(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Item", id })
    }

    pub async fn update(&self, id: i64, payload: InventoryItemPayload) -> Result<InventoryItem, AppError> {
        Self::validate_payload(&payload)?;

        let mut item = self.get(id).await?;

        if let Some(inventory) = payload.inventory {
            if inventory != item.inventory {
                self.ensure_inventory_exists(inventory).await?;
            }
            item.inventory = inventory;
        }
        if let Some(v) = payload.department {
            item.department = v;
        }
        if let Some(v) = payload.asset_group {
            item.asset_group = v;
        }
        if let Some(v) = payload.category {
            item.category = v;
        }
        if let Some(v) = payload.inventory_number {
            item.inventory_number = v;
        }
        if let Some(v) = payload.asset_component {
            item.asset_component = v;
        }
        if let Some(v) = payload.sub_number {
            item.sub_number = v;
        }
        if let Some(v) = payload.acquisition_date {
            item.acquisition_date = v;
        }
        if let Some(v) = payload.asset_description {
            item.asset_description = v;
        }
        if let Some(v) = payload.quantity {
            item.quantity = v;
        }
        if let Some(v) = payload.initial_value {
            item.initial_value = to_money(v);
        }
        if let Some(v) = payload.last_inventory_room {
            item.last_inventory_room = v;
        }
        // null explícito limpa o campo
        if let Some(v) = payload.current_room {
            item.current_room = v;
        }
        if let Some(v) = payload.scanned {
            item.scanned = v;
        }

        self.repo
            .update_item(&item)
            .await?
            .ok_or(AppError::NotFound { entity: "Item", id })
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete_item(id).await?;
        tracing::info!(item_id = id, "Item removido");
        Ok(())
    }

    pub async fn bulk_delete_all(&self) -> Result<BulkDeleteReport, AppError> {
        let ids: Vec<i64> = self.list(None).await?.into_iter().map(|item| item.id).collect();
        self.delete_snapshot(ids).await
    }

    pub(crate) async fn delete_snapshot(&self, ids: Vec<i64>) -> Result<BulkDeleteReport, AppError> {
        let mut report = BulkDeleteReport::default();

        for id in ids {
            let result = self.repo.delete_item(id).await;
            report.record(id, result)?;
        }

        tracing::info!(?report, "Remoção em lote de itens concluída");
        Ok(report)
    }
}

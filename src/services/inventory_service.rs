// src/services/inventory_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{filled, validate_required},
    },
    db::{DeletePolicy, Repository},
    models::inventory::{Inventory, InventoryPayload, NewInventory},
    services::BulkDeleteReport,
};

#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn Repository>,
    delete_policy: DeletePolicy,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn Repository>, delete_policy: DeletePolicy) -> Self {
        Self { repo, delete_policy }
    }

    // O dono precisa existir antes de qualquer escrita
    async fn ensure_user_exists(&self, user_id: i64) -> Result<(), AppError> {
        match self.repo.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::InvalidReference { field: "user", id: user_id }),
        }
    }

    pub async fn create(&self, payload: InventoryPayload) -> Result<Inventory, AppError> {
        validate_required(&[
            ("name", filled(&payload.name)),
            ("date", payload.date.is_some()),
            ("user", payload.user.is_some()),
        ])?;
        payload.validate()?;

        let name = payload.name.ok_or(AppError::MissingField("name"))?;
        let date = payload.date.ok_or(AppError::MissingField("date"))?;
        let user = payload.user.ok_or(AppError::MissingField("user"))?;

        self.ensure_user_exists(user).await?;

        let inventory = self
            .repo
            .insert_inventory(NewInventory { name, date, user })
            .await?;

        tracing::info!(inventory_id = inventory.id, user_id = user, "Inventário criado");
        Ok(inventory)
    }

    pub async fn list(&self, user_id: Option<i64>) -> Result<Vec<Inventory>, AppError> {
        self.repo.list_inventories(user_id).await
    }

    pub async fn get(&self, id: i64) -> Result<Inventory, AppError> {
        self.repo
            .find_inventory(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Inventário", id })
    }

    pub async fn update(&self, id: i64, payload: InventoryPayload) -> Result<Inventory, AppError> {
        payload.validate()?;

        let mut inventory = self.get(id).await?;

        if let Some(user) = payload.user {
            if user != inventory.user {
                self.ensure_user_exists(user).await?;
            }
            inventory.user = user;
        }
        if let Some(name) = payload.name {
            inventory.name = name;
        }
        if let Some(date) = payload.date {
            inventory.date = date;
        }

        self.repo
            .update_inventory(&inventory)
            .await?
            .ok_or(AppError::NotFound { entity: "Inventário", id })
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete_inventory(id, self.delete_policy).await?;
        tracing::info!(inventory_id = id, policy = ?self.delete_policy, "Inventário removido");
        Ok(())
    }

    pub async fn bulk_delete_all(&self) -> Result<BulkDeleteReport, AppError> {
        let ids: Vec<i64> = self.list(None).await?.into_iter().map(|inv| inv.id).collect();
        self.delete_snapshot(ids).await
    }

    pub(crate) async fn delete_snapshot(&self, ids: Vec<i64>) -> Result<BulkDeleteReport, AppError> {
        let mut report = BulkDeleteReport::default();

        for id in ids {
            let result = self.repo.delete_inventory(id, self.delete_policy).await;
            report.record(id, result)?;
        }

        tracing::info!(?report, "Remoção em lote de inventários concluída");
        Ok(report)
    }
}

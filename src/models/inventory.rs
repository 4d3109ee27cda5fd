// src/models/inventory.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::validate_money;

// --- 1. Inventário ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Inventory {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Inwentaryzacja 2025")]
    pub name: String,
    pub date: NaiveDate,

    // Dono do inventário (auth_user.id)
    #[sqlx(rename = "user_id")]
    #[schema(example = 1)]
    pub user: i64,

    // IDs dos itens (somente leitura)
    pub items: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct NewInventory {
    pub name: String,
    pub date: NaiveDate,
    pub user: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct InventoryPayload {
    #[validate(length(min = 1, max = 255, message = "O nome deve ter entre 1 e 255 caracteres."))]
    #[schema(example = "Inwentaryzacja 2025")]
    pub name: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-03-01")]
    pub date: Option<NaiveDate>,

    #[schema(example = 1)]
    pub user: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryFilter {
    /// Retorna só os inventários deste usuário
    pub user_id: Option<i64>,
}

// --- 2. Item de inventário ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: i64,

    #[sqlx(rename = "inventory_id")]
    pub inventory: i64,

    pub department: i32,
    pub asset_group: i32,
    pub category: String,
    pub inventory_number: String,
    pub asset_component: i64,
    pub sub_number: i32,
    pub acquisition_date: NaiveDate,
    pub asset_description: String,
    pub quantity: i32,

    // Sempre com 2 casas decimais, serializado como string ("1500.00")
    #[schema(value_type = String, example = "1500.00")]
    pub initial_value: Decimal,

    #[serde(rename = "lastInventoryRoom")]
    pub last_inventory_room: String,

    #[serde(rename = "currentRoom")]
    pub current_room: Option<String>,

    pub scanned: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub inventory: i64,
    pub department: i32,
    pub asset_group: i32,
    pub category: String,
    pub inventory_number: String,
    pub asset_component: i64,
    pub sub_number: i32,
    pub acquisition_date: NaiveDate,
    pub asset_description: String,
    pub quantity: i32,
    pub initial_value: Decimal,
    pub last_inventory_room: String,
    pub current_room: Option<String>,
    pub scanned: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct InventoryItemPayload {
    #[schema(example = 1)]
    pub inventory: Option<i64>,

    #[schema(example = 12)]
    pub department: Option<i32>,

    #[schema(example = 8)]
    pub asset_group: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "A categoria deve ter entre 1 e 50 caracteres."))]
    #[schema(example = "491")]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 50, message = "O número de inventário deve ter entre 1 e 50 caracteres."))]
    #[schema(example = "W-491-0001")]
    pub inventory_number: Option<String>,

    #[schema(example = 100234)]
    pub asset_component: Option<i64>,

    #[schema(example = 0)]
    pub sub_number: Option<i32>,

    #[schema(value_type = Option<String>, format = Date, example = "2019-10-14")]
    pub acquisition_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 255, message = "A descrição deve ter entre 1 e 255 caracteres."))]
    #[schema(example = "Komputer stacjonarny")]
    pub asset_description: Option<String>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[schema(example = 1)]
    pub quantity: Option<i32>,

    #[schema(value_type = Option<String>, example = "1500.00")]
    pub initial_value: Option<Decimal>,

    #[serde(rename = "lastInventoryRoom")]
    #[validate(length(min = 1, max = 50, message = "A sala deve ter entre 1 e 50 caracteres."))]
    #[schema(example = "104")]
    pub last_inventory_room: Option<String>,

    #[serde(rename = "currentRoom", default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<String>, example = "105")]
    pub current_room: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<bool>)]
    pub scanned: Option<Option<bool>>,
}

impl InventoryItemPayload {
    // Regras que o derive não cobre: campos Option<Option<_>> e o valor monetário.
    pub fn validate_consistency(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        if let Some(value) = &self.initial_value {
            if let Err(e) = validate_money(value) {
                errors.add("initial_value", e);
            }
        }

        if let Some(Some(room)) = &self.current_room {
            if room.chars().count() > 50 {
                let mut err = validator::ValidationError::new("length");
                err.message = Some("A sala deve ter no máximo 50 caracteres.".into());
                errors.add("currentRoom", err);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Retorna só os itens deste inventário
    pub inventory_id: Option<i64>,
}

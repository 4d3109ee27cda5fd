// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Inventory API", description = "Usuários, inventários e itens patrimoniais"),
    paths(
        handlers::root::api_root,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Inventories ---
        handlers::inventories::create_inventory,
        handlers::inventories::list_inventories,
        handlers::inventories::get_inventory,
        handlers::inventories::update_inventory,
        handlers::inventories::delete_inventory,

        // --- Items ---
        handlers::items::create_item,
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::update_item,
        handlers::items::delete_item,
    ),
    components(
        schemas(
            handlers::root::ApiRoot,
            models::auth::User,
            models::auth::UserPayload,
            models::inventory::Inventory,
            models::inventory::InventoryPayload,
            models::inventory::InventoryItem,
            models::inventory::InventoryItemPayload,
        )
    ),
    tags(
        (name = "Root", description = "Índice da API"),
        (name = "Users", description = "Contas de usuário"),
        (name = "Inventories", description = "Inventários de cada usuário"),
        (name = "Items", description = "Itens patrimoniais de um inventário")
    )
)]
pub struct ApiDoc;

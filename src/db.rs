// src/db.rs
//
// Cada entidade tem uma trait de acesso a dados. `PgRepository` implementa
// todas sobre o Postgres; `MemoryRepository` guarda tudo em memória
// (STORAGE_BACKEND=memory e testes).

pub mod inventory_repo;
pub mod item_repo;
pub mod memory;
pub mod user_repo;

pub use memory::MemoryRepository;

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User},
        inventory::{Inventory, InventoryItem, NewInventory, NewInventoryItem},
    },
};

/// O que fazer com os filhos quando o pai é removido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Recusa a remoção enquanto houver filhos (409).
    #[default]
    Restrict,
    /// Remove os filhos junto, na mesma transação.
    Cascade,
}

impl FromStr for DeletePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => anyhow::bail!("DELETE_POLICY inválida: '{other}' (use restrict ou cascade)"),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    /// Grava todos os campos mutáveis; `None` se o usuário sumiu.
    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn list_inventories(&self, user_id: Option<i64>) -> Result<Vec<Inventory>, AppError>;
    async fn find_inventory(&self, id: i64) -> Result<Option<Inventory>, AppError>;
    async fn insert_inventory(&self, inventory: NewInventory) -> Result<Inventory, AppError>;
    async fn update_inventory(&self, inventory: &Inventory) -> Result<Option<Inventory>, AppError>;
    async fn delete_inventory(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_items(&self, inventory_id: Option<i64>) -> Result<Vec<InventoryItem>, AppError>;
    async fn find_item(&self, id: i64) -> Result<Option<InventoryItem>, AppError>;
    async fn insert_item(&self, item: NewInventoryItem) -> Result<InventoryItem, AppError>;
    async fn update_item(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, AppError>;
    async fn delete_item(&self, id: i64) -> Result<(), AppError>;
}

/// Tudo que os services precisam de um backend de armazenamento.
pub trait Repository: UserStore + InventoryStore + ItemStore {}

impl<T> Repository for T where T: UserStore + InventoryStore + ItemStore {}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conecta e roda as migrações do SQLx.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!().run(&pool).await?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::new(pool))
    }
}

// Converte violações de FK do Postgres em erros de domínio; o resto vira DatabaseError.
pub(crate) fn map_fk_violation(e: sqlx::Error, on_violation: AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return on_violation;
        }
    }
    e.into()
}

// src/db/memory.rs

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{DeletePolicy, InventoryStore, ItemStore, UserStore},
    models::{
        auth::{NewUser, User},
        inventory::{Inventory, InventoryItem, NewInventory, NewInventoryItem},
    },
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    inventories: BTreeMap<i64, Inventory>,
    items: BTreeMap<i64, InventoryItem>,
    next_user_id: i64,
    next_inventory_id: i64,
    next_item_id: i64,
}

impl Tables {
    // Os ids crescem como um BIGSERIAL, então a ordem do BTreeMap é a de inserção
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn user_with_relations(&self, user: &User) -> User {
        let mut user = user.clone();
        user.inventories = self
            .inventories
            .values()
            .filter(|inv| inv.user == user.id)
            .map(|inv| inv.id)
            .collect();
        user
    }

    fn inventory_with_relations(&self, inventory: &Inventory) -> Inventory {
        let mut inventory = inventory.clone();
        inventory.items = self
            .items
            .values()
            .filter(|item| item.inventory == inventory.id)
            .map(|item| item.id)
            .collect();
        inventory
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn remove_inventory_cascade(&mut self, id: i64) {
        self.items.retain(|_, item| item.inventory != id);
        self.inventories.remove(&id);
    }
}

/// Armazenamento em memória com a mesma semântica do Postgres
/// (unicidade de username, FKs e política de remoção).
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("lock do repositório envenenado")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("lock do repositório envenenado")))
    }
}

#[async_trait]
impl UserStore for MemoryRepository {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.values().map(|u| tables.user_with_relations(u)).collect())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.get(&id).map(|u| tables.user_with_relations(u)))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| tables.user_with_relations(u)))
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut tables = self.write()?;

        if tables.username_taken(&new.username, None) {
            return Err(AppError::DuplicateValue { field: "username", value: new.username });
        }

        let id = Tables::next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            last_login: new.last_login,
            is_superuser: new.is_superuser,
            is_staff: new.is_staff,
            is_active: new.is_active,
            date_joined: new.date_joined,
            inventories: Vec::new(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut tables = self.write()?;

        if !tables.users.contains_key(&user.id) {
            return Ok(None);
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(AppError::DuplicateValue {
                field: "username",
                value: user.username.clone(),
            });
        }

        if let Some(stored) = tables.users.get_mut(&user.id) {
            let date_joined = stored.date_joined;
            *stored = User { date_joined, inventories: Vec::new(), ..user.clone() };
        }
        Ok(tables.users.get(&user.id).map(|u| tables.user_with_relations(u)))
    }

    async fn delete_user(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
        let mut tables = self.write()?;

        if !tables.users.contains_key(&id) {
            return Err(AppError::NotFound { entity: "Usuário", id });
        }

        let owned: Vec<i64> = tables
            .inventories
            .values()
            .filter(|inv| inv.user == id)
            .map(|inv| inv.id)
            .collect();

        match policy {
            DeletePolicy::Restrict if !owned.is_empty() => {
                return Err(AppError::HasDependents { entity: "Usuário", id, dependents: "inventários" });
            }
            DeletePolicy::Restrict => {}
            DeletePolicy::Cascade => {
                for inventory_id in owned {
                    tables.remove_inventory_cascade(inventory_id);
                }
            }
        }

        tables.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryRepository {
    async fn list_inventories(&self, user_id: Option<i64>) -> Result<Vec<Inventory>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .inventories
            .values()
            .filter(|inv| user_id.is_none_or(|uid| inv.user == uid))
            .map(|inv| tables.inventory_with_relations(inv))
            .collect())
    }

    async fn find_inventory(&self, id: i64) -> Result<Option<Inventory>, AppError> {
        let tables = self.read()?;
        Ok(tables.inventories.get(&id).map(|inv| tables.inventory_with_relations(inv)))
    }

    async fn insert_inventory(&self, new: NewInventory) -> Result<Inventory, AppError> {
        let mut tables = self.write()?;

        if !tables.users.contains_key(&new.user) {
            return Err(AppError::InvalidReference { field: "user", id: new.user });
        }

        let id = Tables::next_id(&mut tables.next_inventory_id);
        let inventory = Inventory {
            id,
            name: new.name,
            date: new.date,
            user: new.user,
            items: Vec::new(),
        };
        tables.inventories.insert(id, inventory.clone());
        Ok(inventory)
    }

    async fn update_inventory(&self, inventory: &Inventory) -> Result<Option<Inventory>, AppError> {
        let mut tables = self.write()?;

        if !tables.inventories.contains_key(&inventory.id) {
            return Ok(None);
        }
        if !tables.users.contains_key(&inventory.user) {
            return Err(AppError::InvalidReference { field: "user", id: inventory.user });
        }

        tables
            .inventories
            .insert(inventory.id, Inventory { items: Vec::new(), ..inventory.clone() });
        Ok(tables
            .inventories
            .get(&inventory.id)
            .map(|inv| tables.inventory_with_relations(inv)))
    }

    async fn delete_inventory(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
        let mut tables = self.write()?;

        if !tables.inventories.contains_key(&id) {
            return Err(AppError::NotFound { entity: "Inventário", id });
        }

        let has_items = tables.items.values().any(|item| item.inventory == id);
        if policy == DeletePolicy::Restrict && has_items {
            return Err(AppError::HasDependents { entity: "Inventário", id, dependents: "itens" });
        }

        tables.remove_inventory_cascade(id);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryRepository {
    async fn list_items(&self, inventory_id: Option<i64>) -> Result<Vec<InventoryItem>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .items
            .values()
            .filter(|item| inventory_id.is_none_or(|iid| item.inventory == iid))
            .cloned()
            .collect())
    }

    async fn find_item(&self, id: i64) -> Result<Option<InventoryItem>, AppError> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn insert_item(&self, new: NewInventoryItem) -> Result<InventoryItem, AppError> {
        let mut tables = self.write()?;

        if !tables.inventories.contains_key(&new.inventory) {
            return Err(AppError::InvalidReference { field: "inventory", id: new.inventory });
        }

        let id = Tables::next_id(&mut tables.next_item_id);
        let item = InventoryItem {
            id,
            inventory: new.inventory,
            department: new.department,
            asset_group: new.asset_group,
            category: new.category,
            inventory_number: new.inventory_number,
            asset_component: new.asset_component,
            sub_number: new.sub_number,
            acquisition_date: new.acquisition_date,
            asset_description: new.asset_description,
            quantity: new.quantity,
            initial_value: new.initial_value,
            last_inventory_room: new.last_inventory_room,
            current_room: new.current_room,
            scanned: new.scanned,
        };
        tables.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, AppError> {
        let mut tables = self.write()?;

        if !tables.items.contains_key(&item.id) {
            return Ok(None);
        }
        if !tables.inventories.contains_key(&item.inventory) {
            return Err(AppError::InvalidReference { field: "inventory", id: item.inventory });
        }

        tables.items.insert(item.id, item.clone());
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: i64) -> Result<(), AppError> {
        match self.write()?.items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound { entity: "Item", id }),
        }
    }
}

pub mod inventory_service;
pub mod item_service;
pub mod user_service;

pub use inventory_service::InventoryService;
pub use item_service::ItemService;
pub use user_service::UserService;

use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

/// Resultado de uma remoção em lote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteReport {
    pub deleted: usize,
    /// Já tinham sido removidos por outra requisição
    pub skipped: usize,
    /// Bloqueados por dependentes (política restrict)
    pub failed: Vec<i64>,
}

impl BulkDeleteReport {
    /// Contabiliza o resultado de uma remoção individual.
    /// Erros que não sejam NotFound/HasDependents interrompem o lote.
    pub(crate) fn record(&mut self, id: i64, result: Result<(), AppError>) -> Result<(), AppError> {
        match result {
            Ok(()) => self.deleted += 1,
            Err(AppError::NotFound { .. }) => self.skipped += 1,
            Err(AppError::HasDependents { .. }) => {
                if !self.failed.contains(&id) {
                    self.failed.push(id);
                }
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// src/config.rs

use std::{env, str::FromStr, sync::Arc};

use anyhow::Context;

use crate::{
    db::{DeletePolicy, MemoryRepository, PgRepository, Repository},
    services::{InventoryService, ItemService, UserService},
};

/// Onde os dados ficam guardados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("STORAGE_BACKEND inválido: '{other}' (use postgres ou memory)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub storage: StorageBackend,
    pub delete_policy: DeletePolicy,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    /// Prefixo opcional, ex: "/api". Vazio monta as rotas na raiz.
    pub api_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:8000".to_string(),
            database_max_connections: 5,
            storage: StorageBackend::Postgres,
            delete_policy: DeletePolicy::Restrict,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            api_prefix: String::new(),
        }
    }
}

// Lê uma variável opcional e converte; ausente ou vazia usa o padrão
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} inválida: {e}")),
        _ => Ok(default),
    }
}

impl Settings {
    /// Carrega o `.env` (se existir) e lê as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            _ => defaults.cors_origins,
        };

        let api_prefix = env::var("API_PREFIX")
            .map(|p| normalize_prefix(&p))
            .unwrap_or_default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            storage: parse_var("STORAGE_BACKEND", defaults.storage)?,
            delete_policy: parse_var("DELETE_POLICY", defaults.delete_policy)?,
            bcrypt_cost: check_bcrypt_cost(parse_var("BCRYPT_COST", defaults.bcrypt_cost)?)?,
            cors_origins,
            api_prefix,
        })
    }
}

// Fora dessa faixa o bcrypt recusa o hash e todo cadastro viraria 500
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

fn check_bcrypt_cost(cost: u32) -> anyhow::Result<u32> {
    if !BCRYPT_COST_RANGE.contains(&cost) {
        anyhow::bail!(
            "BCRYPT_COST inválido: {cost} (use entre {} e {})",
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end()
        );
    }
    Ok(cost)
}

// "api/" -> "/api", "/" -> ""
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub inventory_service: InventoryService,
    pub item_service: ItemService,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Monta o gráfico de dependências sobre o backend configurado.
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let repo: Arc<dyn Repository> = match settings.storage {
            StorageBackend::Postgres => {
                let url = settings
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida para STORAGE_BACKEND=postgres")?;
                Arc::new(PgRepository::connect(url, settings.database_max_connections).await?)
            }
            StorageBackend::Memory => {
                tracing::warn!("Usando armazenamento em memória; os dados somem ao reiniciar");
                Arc::new(MemoryRepository::new())
            }
        };

        Ok(Self::with_repository(repo, settings))
    }

    pub fn with_repository(repo: Arc<dyn Repository>, settings: &Settings) -> Self {
        Self {
            user_service: UserService::new(repo.clone(), settings.delete_policy, settings.bcrypt_cost),
            inventory_service: InventoryService::new(repo.clone(), settings.delete_policy),
            item_service: ItemService::new(repo),
            settings: Arc::new(settings.clone()),
        }
    }

    pub fn in_memory(settings: &Settings) -> Self {
        Self::with_repository(Arc::new(MemoryRepository::new()), settings)
    }
}

// src/services/user_service.rs

use std::sync::Arc;

use bcrypt::hash;
use chrono::Utc;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{filled, validate_required, validate_unique, validate_username},
    },
    db::{DeletePolicy, Repository},
    models::auth::{NewUser, User, UserPayload},
    services::BulkDeleteReport,
};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository>,
    delete_policy: DeletePolicy,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository>, delete_policy: DeletePolicy, bcrypt_cost: u32) -> Self {
        Self { repo, delete_policy, bcrypt_cost }
    }

    // Executa o hashing em um thread separado
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    // Garante que nenhum outro usuário usa o username
    async fn ensure_username_free(&self, username: &str, current: Option<i64>) -> Result<(), AppError> {
        let existing = self
            .repo
            .find_user_by_username(username)
            .await?
            .map(|u| u.id);
        validate_unique("username", username, existing, current)
    }

    pub async fn create(&self, payload: UserPayload) -> Result<User, AppError> {
        // 1. Obrigatórios, 2. formato, 3. unicidade. Nada é gravado antes disso.
        validate_required(&[
            ("username", filled(&payload.username)),
            ("email", filled(&payload.email)),
            ("password", filled(&payload.password)),
        ])?;
        payload.validate()?;

        let username = payload.username.ok_or(AppError::MissingField("username"))?;
        let email = payload.email.ok_or(AppError::MissingField("email"))?;
        let password = payload.password.ok_or(AppError::MissingField("password"))?;

        validate_username(&username)?;
        self.ensure_username_free(&username, None).await?;

        let password_hash = self.hash_password(password).await?;

        let user = self
            .repo
            .insert_user(NewUser {
                username,
                first_name: payload.first_name.unwrap_or_default(),
                last_name: payload.last_name.unwrap_or_default(),
                email,
                password_hash,
                last_login: payload.last_login.flatten(),
                is_superuser: payload.is_superuser.unwrap_or(false),
                is_staff: payload.is_staff.unwrap_or(false),
                is_active: payload.is_active.unwrap_or(true),
                date_joined: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Usuário criado");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_users().await
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Usuário", id })
    }

    /// Atualização parcial: só os campos enviados mudam.
    pub async fn update(&self, id: i64, payload: UserPayload) -> Result<User, AppError> {
        payload.validate()?;
        if let Some(username) = &payload.username {
            validate_username(username)?;
        }

        let mut user = self.get(id).await?;

        if let Some(username) = payload.username {
            if username != user.username {
                self.ensure_username_free(&username, Some(id)).await?;
            }
            user.username = username;
        }
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(first_name) = payload.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = payload.last_name {
            user.last_name = last_name;
        }
        if let Some(last_login) = payload.last_login {
            user.last_login = last_login;
        }
        if let Some(is_superuser) = payload.is_superuser {
            user.is_superuser = is_superuser;
        }
        if let Some(is_staff) = payload.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_active) = payload.is_active {
            user.is_active = is_active;
        }
        if let Some(password) = payload.password {
            user.password_hash = self.hash_password(password).await?;
        }

        self.repo
            .update_user(&user)
            .await?
            .ok_or(AppError::NotFound { entity: "Usuário", id })
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete_user(id, self.delete_policy).await?;
        tracing::info!(user_id = id, policy = ?self.delete_policy, "Usuário removido");
        Ok(())
    }

    /// Remove todos os usuários a partir de um snapshot dos ids.
    /// Ids que sumiram no meio do caminho contam como `skipped`.
    pub async fn bulk_delete_all(&self) -> Result<BulkDeleteReport, AppError> {
        let ids: Vec<i64> = self.list().await?.into_iter().map(|u| u.id).collect();
        self.delete_snapshot(ids).await
    }

    pub(crate) async fn delete_snapshot(&self, ids: Vec<i64>) -> Result<BulkDeleteReport, AppError> {
        let mut report = BulkDeleteReport::default();

        for id in ids {
            let result = self.repo.delete_user(id, self.delete_policy).await;
            report.record(id, result)?;
        }

        tracing::info!(?report, "Remoção em lote de usuários concluída");
        Ok(report)
    }
}

// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Representa um usuário vindo da tabela 'auth_user'
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "jan_kowalski")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "jan.kowalski@example.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub last_login: Option<DateTime<Utc>>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,

    // IDs dos inventários do usuário (somente leitura)
    pub inventories: Vec<i64>,
}

// Dados já validados para inserção
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

// Payload de criação e de atualização parcial.
// Na criação, username/email/password são obrigatórios (checado no service);
// na atualização, só os campos enviados mudam.
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct UserPayload {
    #[schema(example = "jan_kowalski")]
    pub username: Option<String>,

    #[validate(length(max = 150, message = "O nome deve ter no máximo 150 caracteres."))]
    #[schema(example = "Jan")]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "O sobrenome deve ter no máximo 150 caracteres."))]
    #[schema(example = "Kowalski")]
    pub last_name: Option<String>,

    #[validate(
        email(message = "O e-mail fornecido é inválido."),
        length(max = 254, message = "O e-mail deve ter no máximo 254 caracteres.")
    )]
    #[schema(example = "jan.kowalski@example.com")]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "A senha não pode ser vazia."))]
    #[schema(example = "SuperSecret123")]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_login: Option<Option<DateTime<Utc>>>,

    pub is_superuser: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

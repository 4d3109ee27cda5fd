// src/common/error.rs

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("O campo '{0}' é obrigatório.")]
    MissingField(&'static str),

    #[error("{message}")]
    InvalidFormat {
        field: &'static str,
        message: String,
    },

    #[error("Já existe um registro com {field} '{value}'.")]
    DuplicateValue { field: &'static str, value: String },

    // FK apontando para um registro que não existe (400, como no DRF)
    #[error("Chave primária inválida \"{id}\": o objeto não existe.")]
    InvalidReference { field: &'static str, id: i64 },

    #[error("{entity} {id} não encontrado.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} {id} ainda possui {dependents} vinculados.")]
    HasDependents {
        entity: &'static str,
        id: i64,
        dependents: &'static str,
    },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

// Corpo que não é JSON válido ou com campo de tipo errado: 400, não o 422 do axum
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidFormat {
            field: "body",
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingField(_)
            | AppError::InvalidFormat { .. }
            | AppError::DuplicateValue { .. }
            | AppError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::HasDependents { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            AppError::MissingField(field)
            | AppError::InvalidFormat { field, .. }
            | AppError::DuplicateValue { field, .. }
            | AppError::InvalidReference { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        // 500: loga o detalhe e devolve mensagem genérica
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                AppError::DatabaseError(e) => tracing::error!("Erro de banco de dados: {:?}", e),
                AppError::InternalServerError(e) => tracing::error!("Erro interno: {:?}", e),
                other => tracing::error!("Erro interno do servidor: {}", other),
            }
            let body = Json(json!({ "error": "Ocorreu um erro inesperado." }));
            return (status, body).into_response();
        }

        let body = match self.field() {
            Some(field) => json!({ "error": self.to_string(), "field": field }),
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_expected_status() {
        assert_eq!(AppError::MissingField("email").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DuplicateValue { field: "username", value: "jan".into() }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound { entity: "Usuário", id: 7 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::HasDependents { entity: "Inventário", id: 1, dependents: "itens" }.status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("segredo")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    models::auth::{User, UserPayload},
};

#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Campo obrigatório ausente, formato inválido ou username duplicado")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    responses((status = 200, description = "Todos os usuários, em ordem de id", body = Vec<User>))
)]
pub async fn list_users(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}/",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    responses(
        (status = 200, body = User),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get(id).await?;
    Ok(Json(user))
}

/// PUT e PATCH: só os campos enviados são alterados.
#[utoipa::path(
    put,
    path = "/users/{id}/",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    request_body = UserPayload,
    responses(
        (status = 200, body = User),
        (status = 400, description = "Formato inválido ou username duplicado"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.update(id, payload).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}/",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "O usuário ainda possui inventários")
    )
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

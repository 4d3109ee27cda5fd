// src/app.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{MethodRouter, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::AppState, handlers};

// Registra a coleção e o item com e sem barra final
fn resource(
    name: &str,
    collection: MethodRouter<AppState>,
    member: MethodRouter<AppState>,
) -> Router<AppState> {
    Router::new()
        .route(&format!("/{name}"), collection.clone())
        .route(&format!("/{name}/"), collection)
        .route(&format!("/{name}/{{id}}"), member.clone())
        .route(&format!("/{name}/{{id}}/"), member)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, "Origem CORS ignorada: {}", e);
                None
            }
        })
        .collect();

    layer.allow_origin(parsed)
}

/// Monta o router completo (o mesmo em produção e nos testes).
pub fn build_app(app_state: AppState) -> Router {
    let settings = app_state.settings.clone();

    let api = Router::new()
        .route("/", get(handlers::root::api_root))
        .merge(resource(
            "users",
            post(handlers::users::create_user).get(handlers::users::list_users),
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        ))
        .merge(resource(
            "inventories",
            post(handlers::inventories::create_inventory)
                .get(handlers::inventories::list_inventories),
            get(handlers::inventories::get_inventory)
                .put(handlers::inventories::update_inventory)
                .patch(handlers::inventories::update_inventory)
                .delete(handlers::inventories::delete_inventory),
        ))
        .merge(resource(
            "items",
            post(handlers::items::create_item).get(handlers::items::list_items),
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        ));

    let router = if settings.api_prefix.is_empty() {
        api
    } else {
        // O nest só responde em "/api"; "/api/" é registrado à parte
        Router::new()
            .nest(&settings.api_prefix, api)
            .route(&format!("{}/", settings.api_prefix), get(handlers::root::api_root))
    };

    router
        .route("/health", get(handlers::root::health))
        .route("/api-docs/openapi.json", get(handlers::root::openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors_origins))
        .with_state(app_state)
}

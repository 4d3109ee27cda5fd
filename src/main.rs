// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use inventory_api::{
    app::build_app,
    config::{AppState, Settings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;
    let app = build_app(app_state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(
        "🚀 Servidor escutando em {} (storage: {:?}, delete policy: {:?})",
        listener.local_addr()?,
        settings.storage,
        settings.delete_policy
    );

    axum::serve(listener, app).await?;
    Ok(())
}

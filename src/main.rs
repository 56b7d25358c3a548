use anyhow::Context;
use dotenvy::dotenv;
use iqra::logging::init_tracing;
use iqra::router::init_router;
use iqra::state::init_app_state;
use iqra_config::ServerConfig;
use iqra_db::run_migrations;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    run_migrations(&state.db)
        .await
        .context("Failed to apply database migrations")?;

    let app = init_router(state);

    let server = ServerConfig::from_env();
    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

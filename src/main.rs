use std::sync::Arc;

use userauth::{
    app::{build_app, serve},
    config::AppConfig,
    db,
    state::AppState,
    telemetry,
    users::{MemoryUserStore, PgUserStore, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init(&config.log)?;

    let pool = match &config.database {
        Some(db_cfg) => {
            let pool = db::connect(db_cfg).await?;
            db::migrate(&pool).await?;
            Some(pool)
        }
        None => None,
    };
    let users: Arc<dyn UserStore> = match &pool {
        Some(pool) => Arc::new(PgUserStore::new(pool.clone())),
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on exit");
            Arc::new(MemoryUserStore::new())
        }
    };

    let state = AppState::from_parts(&config, users)?;
    serve(build_app(state), &config.bind_addr()).await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }
    Ok(())
}

use std::{env, net::SocketAddr};

use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use service::auth::service::AuthConfig;

use crate::routes;
use crate::state::ServerState;

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: Option<&configs::AppConfig>) -> anyhow::Result<SocketAddr> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

async fn connect_db(cfg: Option<&configs::AppConfig>) -> anyhow::Result<DatabaseConnection> {
    let db = match cfg {
        Some(cfg) => models::db::connect_with_config(&cfg.database).await?,
        None => models::db::connect().await?,
    };
    Ok(db)
}

fn load_auth_config(cfg: Option<&configs::AppConfig>) -> AuthConfig {
    let from_file = cfg.and_then(|c| c.auth.jwt_secret.clone());
    let jwt_secret = from_file
        .or_else(|| env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| "dev-secret-change-me".to_string());
    let token_ttl_hours = cfg.map(|c| c.auth.token_ttl_hours).unwrap_or(12);
    AuthConfig { jwt_secret, token_ttl_hours }
}

/// Public entry: connect, migrate, build the app, and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    // config.toml is optional; env vars cover every setting it carries
    let cfg = configs::AppConfig::load_and_validate().ok();

    let db = connect_db(cfg.as_ref()).await?;
    Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "database schema is current");

    let state = ServerState::new(db, load_auth_config(cfg.as_ref()));
    let app = routes::build_router(state);

    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting reservation server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

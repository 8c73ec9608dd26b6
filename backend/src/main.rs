//! Backend entry-point: loads settings, selects storage and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dropme_backend::config::AppSettings;
use dropme_backend::domain::RecyclingPolicy;
use dropme_backend::inbound::http::health::HealthState;
use dropme_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

async fn attach_database(config: ServerConfig, settings: &AppSettings) -> io::Result<ServerConfig> {
    let Some(url) = settings.database_url() else {
        info!("no database configured; using in-memory store");
        return Ok(config);
    };
    if settings.run_migrations {
        run_migrations(url).await.map_err(io::Error::other)?;
    }
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(io::Error::other)?;
    info!("database pool ready");
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let policy = RecyclingPolicy::new(settings.daily_limit());

    let base = attach_database(ServerConfig::new(bind_addr, policy), &settings).await?;
    #[cfg(feature = "metrics")]
    let config = base.with_metrics(server::default_metrics());
    #[cfg(not(feature = "metrics"))]
    let config = base;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, daily_limit = policy.daily_limit(), "server listening");
    server.await
}

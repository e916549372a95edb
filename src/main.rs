use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smart_hub_service::{
    api::{self, AppState},
    config::Config,
    control::ControlService,
    db::{self, Store},
    sensors::SensorService,
    sunset::SunsetSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; variables may come from the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let store = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            info!("Database ready");
            Store::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set; readings and preferences are kept in memory only");
            Store::memory()
        }
    };

    let sunset = SunsetSource::from_config(&config)?;
    info!(
        source = ?config.sunset_source,
        latitude = config.latitude,
        longitude = config.longitude,
        "Sunset lookup configured"
    );

    let state = AppState {
        sensors: SensorService::new(store.clone()),
        control: ControlService::new(store, sunset),
    };
    let app = api::router(state).layer(api::cors_layer(&config.cors_origins)?);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

use anyhow::Result;
use readings_core::{
    db::{Database, DatabaseConfig, PgCustomerReadingRepository},
    CustomerReadingRepository, InMemoryCustomerReadingRepository,
};
use readings_service::{api, config::AppConfig, metrics_server, observability};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let (repository, database): (Arc<dyn CustomerReadingRepository>, Option<Database>) = match &cfg.database {
        Some(db_cfg) => {
            let database = Database::new(DatabaseConfig::new(&db_cfg.uri, db_cfg.max_connections));
            let pool = database.connect().await?;
            let repository = PgCustomerReadingRepository::new(pool, db_cfg.synchronous_commit.clone());
            repository.initialize().await?;
            let repository: Arc<dyn CustomerReadingRepository> = Arc::new(repository);
            (repository, Some(database))
        }
        None => {
            tracing::warn!("no database configured, readings are kept in memory only");
            let repository: Arc<dyn CustomerReadingRepository> =
                Arc::new(InMemoryCustomerReadingRepository::new());
            (repository, None)
        }
    };

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr).await?;
    tracing::info!(addr = %cfg.http.bind_addr, "readings service listening");

    axum::serve(listener, api::router(repository).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.disconnect().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

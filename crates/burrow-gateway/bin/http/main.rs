mod cli;

use crate::cli::{Cli, CounterBackendArg, LogFormatArg, StorageBackendArg};
use anyhow::Context;
use burrow_allocator::{AllocatorSettings, IdAllocator, InMemoryCounter, RedisCounter};
use burrow_codec::Base62Codec;
use burrow_core::{CounterStore, Repository};
use burrow_gateway::{App, AppState};
use burrow_shortener::ShortenerService;
use burrow_storage::{InMemoryRepository, MySqlRepository};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        counter_backend = %config.counter,
        storage_backend = %config.storage,
        "starting burrow gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => with_counter(config, InMemoryRepository::new()).await,
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn)
                .await
                .context("failed to connect to MySQL")?;
            if config.auto_migrate {
                repository
                    .migrate()
                    .await
                    .context("failed to migrate MySQL schema")?;
                info!("MySQL schema is up to date");
            }
            with_counter(config, repository).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormatArg::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormatArg::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn with_counter<R: Repository>(config: Cli, repository: R) -> anyhow::Result<()> {
    match config.counter {
        CounterBackendArg::InMemory => {
            warn!("in-memory counter does not survive restarts; do not share it across instances");
            run_server(config, repository, InMemoryCounter::new()).await
        }
        CounterBackendArg::Redis => {
            let counter = RedisCounter::connect(&config.redis_url)
                .await
                .context("failed to connect to Redis")?;
            run_server(config, repository, counter).await
        }
    }
}

async fn run_server<R: Repository, C: CounterStore>(
    config: Cli,
    repository: R,
    counter: C,
) -> anyhow::Result<()> {
    let settings = AllocatorSettings::builder()
        .counter_key(config.counter_key)
        .start_value(config.counter_start)
        .build();
    let allocator = IdAllocator::new(counter, settings);
    let seeded = allocator
        .initialize()
        .await
        .context("failed to initialize url counter")?;
    info!(
        counter_key = %allocator.settings().counter_key,
        seeded,
        "url counter ready"
    );

    let service = ShortenerService::new(repository, allocator, Base62Codec::new(&config.base62_salt));
    let state = AppState::new(Arc::new(service), config.public_base_url);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "serving http");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}

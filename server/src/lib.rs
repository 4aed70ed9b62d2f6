//! Todo Server
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - http: Mutation gateway and live query stream
//! - config: Command line and environment configuration

pub mod config;
pub mod domain;
pub mod http;
pub mod repository;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::services::ServeDir;

pub use config::{ServerConfig, StoreKind};
use repository::{init_db, InMemoryTodoRepository, SqliteTodoRepository, TodoStore};

pub const APP_NAME: &str = "TodoServer";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            store,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Tell open live streams to finish so connections can drain
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once [`AppState::begin_shutdown`] has been called
    pub fn shutdown_requested(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown.subscribe();
        async move {
            let _ = rx.wait_for(|stopping| *stopping).await;
        }
    }
}

/// Open the backend selected by `config`
pub async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn TodoStore>> {
    match config.store {
        StoreKind::Memory => Ok(Arc::new(InMemoryTodoRepository::new())),
        StoreKind::Sqlite => {
            let db_state = init_db(&config.db_path)?;
            let repo = SqliteTodoRepository::new(db_state.connection()).await?;
            Ok(Arc::new(repo))
        }
    }
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    match &config.log_dir {
        Some(dir) => rolling_logger::init_logger(dir, APP_NAME)?,
        None => rolling_logger::init_stderr_logger(APP_NAME)?,
    }

    let store = open_store(&config).await?;
    tracing::info!(
        store = ?config.store,
        db_path = %config.db_path.display(),
        "store ready"
    );

    let state = AppState::new(store);
    let mut router = http::build_router(state.clone());
    if let Some(dir) = &config.static_dir {
        tracing::info!(static_dir = %dir.display(), "serving UI assets");
        router = router.fallback_service(ServeDir::new(dir));
    }

    serve(config.addr, http::apply_standard_layers(router), state).await
}

async fn serve(addr: SocketAddr, router: axum::Router, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
    // Live streams never end on their own
    state.begin_shutdown();
}

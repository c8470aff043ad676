//! HTTP review store: list, create and delete geotagged safety reviews.

pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub use config::{ServerArgs, ServerConfig};
pub use error::{ApiError, StoreError};
pub use notify::Notifier;
pub use routes::{AppState, create_router};
pub use store::{MemoryStore, ReviewStore, SqliteStore};

pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn ReviewStore>, StoreError> {
    Ok(match &config.database {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    })
}

/// A running review store. Shuts down when dropped.
pub struct ReviewServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ReviewServer {
    /// Binds `config.bind` (port 0 picks a free port) and serves on the
    /// current runtime.
    pub async fn start(config: ServerConfig) -> eyre::Result<Self> {
        let store = open_store(&config)?;
        let notifier = config.notify_url.as_deref().map(Notifier::new);
        let app = create_router(AppState::new(store, notifier));

        let listener = TcpListener::bind(config.bind).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;

            if let Err(error) = result {
                tracing::error!(%error, "Review server stopped");
            }
        });

        tracing::info!(%addr, persistent = config.database.is_some(), "Review server listening");

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ReviewServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

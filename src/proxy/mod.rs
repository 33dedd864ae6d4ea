//! Hot-reload development proxy.
//!
//! Forwards requests to the backend API, can replace responses with
//! injected failures, and pushes reload events to browsers when the
//! watched sources change.

pub mod error_scenarios;

use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers;
use crate::state::ProxyState;
use crate::tasks::source_watcher::SourceWatcher;

/// How long open connections (SSE clients included) get to finish on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct DevProxy;

impl DevProxy {
    /// Bind the listener and start serving. The returned handle stops the
    /// server and the watcher on [`ProxyHandle::shutdown`] or when dropped.
    pub async fn start(config: &Config) -> Result<ProxyHandle> {
        let state = ProxyState::new(config)?;

        let watcher = match &config.proxy_watch_path {
            Some(path) if path.exists() => Some(SourceWatcher::start(
                path,
                Duration::from_millis(config.proxy_debounce_ms),
                state.clone(),
            )?),
            Some(path) => {
                tracing::warn!(path = %path.display(), "Watch path does not exist, hot reload disabled");
                None
            }
            None => None,
        };

        let addr = SocketAddr::from(([127, 0, 0, 1], config.proxy_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = handlers::proxy_router(state.clone());

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        tracing::info!(
            addr = %local_addr,
            backend = %state.backend_url,
            "Dev proxy listening"
        );

        Ok(ProxyHandle {
            local_addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            server: Some(server),
            watcher,
        })
    }
}

pub struct ProxyHandle {
    local_addr: SocketAddr,
    state: ProxyState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
    watcher: Option<SourceWatcher>,
}

impl ProxyHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &ProxyState {
        &self.state
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.watcher.take();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let Some(mut server) = self.server.take() else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => return Err(AppError::Other(e.into())),
            Err(_) => {
                tracing::warn!("Connections still open after grace period, aborting server");
                server.abort();
            }
        }

        tracing::info!("Dev proxy stopped");
        Ok(())
    }
}

impl Drop for ProxyHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

use chrono::{DateTime, Utc};
use reqwest::{redirect::Policy, Client};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::Config;
use crate::error::Result;
use crate::proxy::error_scenarios::ErrorScenario;
use crate::tasks::source_watcher::ReloadEvent;

const RELOAD_CHANNEL_CAPACITY: usize = 64;

/// Shared state of the dev proxy.
#[derive(Clone)]
pub struct ProxyState {
    pub backend_url: String,
    pub client: Client,
    pub watch_path: Option<PathBuf>,
    pub active_error: Arc<RwLock<Option<&'static ErrorScenario>>>,
    pub reload_tx: broadcast::Sender<ReloadEvent>,
    pub reload_count: Arc<AtomicU64>,
    pub forwarded_requests: Arc<AtomicU64>,
    pub started_at: DateTime<Utc>,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .redirect(Policy::none())
            .build()?;
        let (reload_tx, _) = broadcast::channel(RELOAD_CHANNEL_CAPACITY);

        Ok(Self {
            backend_url: config.proxy_backend_url.trim_end_matches('/').to_string(),
            client,
            watch_path: config.proxy_watch_path.clone(),
            active_error: Arc::new(RwLock::new(None)),
            reload_tx,
            reload_count: Arc::new(AtomicU64::new(0)),
            forwarded_requests: Arc::new(AtomicU64::new(0)),
            started_at: Utc::now(),
        })
    }

    /// Broadcast a reload to connected clients. Having no clients is fine.
    pub fn publish_reload(&self, paths: Vec<String>) -> ReloadEvent {
        let event = ReloadEvent {
            paths,
            timestamp: Utc::now(),
        };
        self.reload_count.fetch_add(1, Ordering::SeqCst);
        let _ = self.reload_tx.send(event.clone());
        event
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.reload_tx.subscribe()
    }

    pub fn reload_clients(&self) -> usize {
        self.reload_tx.receiver_count()
    }

    pub async fn active_error(&self) -> Option<&'static ErrorScenario> {
        *self.active_error.read().await
    }

    pub async fn set_active_error(&self, scenario: Option<&'static ErrorScenario>) {
        *self.active_error.write().await = scenario;
    }
}

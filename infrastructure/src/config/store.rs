//! Hot-reloadable configuration snapshot.
//!
//! Readers get an `Arc` to a complete [`OrchestrationConfig`]. A reload
//! builds and validates a whole new configuration first and only then swaps
//! the `Arc`, so a request never sees a half-applied file. Provider and
//! server settings are read once at startup and are not reloaded.

use super::error::ConfigError;
use super::loader::ConfigLoader;
use roundtable_application::{ConfigSource, OrchestrationConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct ConfigStore {
    current: RwLock<Arc<OrchestrationConfig>>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn new(initial: OrchestrationConfig, path: Option<PathBuf>) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            path,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, config: OrchestrationConfig) {
        let next = Arc::new(config);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Reload from the backing file.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let loaded = ConfigLoader::load_validated(self.path.as_deref())?;
        self.replace(loaded.orchestration);
        info!("Configuration reloaded");
        Ok(())
    }

    /// Poll the backing file's modification time and reload on change.
    ///
    /// Returns `None` when there is no file to watch.
    pub fn watch(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        let path = self.path.clone()?;
        Some(tokio::spawn(async move {
            let mut last_modified = modified_at(&path).await;
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let modified = modified_at(&path).await;
                if modified.is_none() || modified == last_modified {
                    continue;
                }
                last_modified = modified;
                debug!("Config file {} changed", path.display());

                if let Err(e) = self.reload() {
                    warn!("Config reload failed, keeping previous configuration: {}", e);
                }
            }
        }))
    }
}

impl ConfigSource for ConfigStore {
    fn snapshot(&self) -> Arc<OrchestrationConfig> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

// Command handlers module
pub mod config;
pub mod disks;
pub mod events;
pub mod explain;
pub mod host;
pub mod image;
pub mod network;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::diagnostics::SystemProbe;
use crate::core::{Config, Explainer};

/// State shared by every command of one invocation
pub struct Session {
    pub config: Config,
    pub json: bool,
    probe: Arc<dyn SystemProbe>,
    explainer: Explainer,
}

impl Session {
    pub fn new(config: Config, json: bool, probe: Arc<dyn SystemProbe>, explainer: Explainer) -> Self {
        Self {
            config,
            json,
            probe,
            explainer,
        }
    }

    pub fn explainer(&self) -> &Explainer {
        &self.explainer
    }

    /// Run a blocking collector on the blocking thread pool
    pub async fn collect<T, F>(&self, collector: F) -> Result<T>
    where
        F: FnOnce(&dyn SystemProbe) -> crate::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let probe = Arc::clone(&self.probe);
        let collected = tokio::task::spawn_blocking(move || collector(probe.as_ref()))
            .await
            .context("Collector task did not complete")?;
        Ok(collected?)
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered =
            serde_json::to_string_pretty(value).context("Failed to serialize report as JSON")?;
        println!("{}", rendered);
        Ok(())
    }
}

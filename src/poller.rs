//! Polling orchestrator
//!
//! Each cycle fans out one blocking task per configured host and joins all of
//! them before sleeping. A failing host only loses its own output for that
//! cycle. Nothing carries over between cycles.

use crate::config::Config;
use crate::discovery::{discover_host, HostOutcome};
use crate::hypervisor::Connector;
use crate::output::TargetFileWriter;
use crate::{Result, SdError};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of one host within a cycle
#[derive(Debug)]
pub struct HostReport {
    pub uri: String,
    pub outcome: Result<HostOutcome>,
}

pub struct Poller {
    config: Arc<Config>,
    connector: Arc<dyn Connector>,
    writer: Arc<TargetFileWriter>,
}

impl Poller {
    pub fn new(config: Config, connector: Arc<dyn Connector>) -> Self {
        let writer = TargetFileWriter::new(config.output_dir.clone(), config.output_format);

        Self {
            config: Arc::new(config),
            connector,
            writer: Arc::new(writer),
        }
    }

    /// Run cycles until polling is disabled. With a positive interval this
    /// never returns.
    pub async fn run(&self) {
        loop {
            self.run_cycle().await;

            match self.config.interval() {
                Some(interval) => tokio::time::sleep(interval).await,
                None => {
                    info!("Polling disabled, exiting after a single cycle");
                    break;
                }
            }
        }
    }

    /// Query every host concurrently and wait for all of them.
    ///
    /// Reports come back in configuration order.
    // TODO: bound each host task with a timeout; a hung libvirt call
    // currently stalls the whole cycle.
    pub async fn run_cycle(&self) -> Vec<HostReport> {
        let tasks = self.config.hosts.iter().map(|uri| {
            let config = self.config.clone();
            let connector = self.connector.clone();
            let writer = self.writer.clone();
            let uri = uri.clone();

            async move {
                let task_uri = uri.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    discover_host(&config, connector.as_ref(), &writer, &task_uri)
                })
                .await
                .unwrap_or_else(|e| Err(SdError::TaskFailed(e.to_string())));

                match &outcome {
                    Ok(done) => info!(
                        "{}: scrape config updated ({} groups) -> {}",
                        uri,
                        done.records,
                        done.path.display()
                    ),
                    Err(e) => error!("{}: {}", uri, e),
                }

                HostReport { uri, outcome }
            }
        });

        join_all(tasks).await
    }
}

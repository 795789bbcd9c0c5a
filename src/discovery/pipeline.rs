//! Discovery pipeline for a single hypervisor
//!
//! Connect, read the hostname, enumerate domains, evaluate every rule, then
//! hand the ordered records to the target file writer. Runs on a blocking
//! thread; the session and all domain handles are released before returning.

use crate::config::Config;
use crate::discovery::targets::{build_record, ScrapeRecord};
use crate::hypervisor::{Connector, HypervisorIdentity, Workload};
use crate::output::TargetFileWriter;
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Workloads visible on one hypervisor at one instant
#[derive(Debug, Clone)]
pub struct HostInventory {
    pub identity: HypervisorIdentity,
    pub workloads: Vec<Workload>,
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOutcome {
    pub hypervisor: String,
    pub path: PathBuf,
    pub records: usize,
}

/// Snapshot the hypervisor behind `uri`.
///
/// Domains whose name cannot be read are skipped.
pub fn collect_inventory(connector: &dyn Connector, uri: &str) -> Result<HostInventory> {
    let session = connector.connect(uri)?;
    let identity = HypervisorIdentity::from_hostname(&session.hostname()?);
    let handles = session.list_workloads()?;

    let workloads = handles
        .iter()
        .filter_map(|handle| match handle.name() {
            Ok(name) => Some(Workload::new(name, &identity.domain)),
            Err(e) => {
                debug!("{}: skipping domain without a readable name: {}", uri, e);
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "{}: found {} domains on {} (domain suffix {})",
        uri,
        workloads.len(),
        identity.name,
        identity.domain
    );

    Ok(HostInventory {
        identity,
        workloads,
    })
}

/// Evaluate every rule of every group, in declaration order
pub fn build_records(config: &Config, inventory: &HostInventory) -> Vec<ScrapeRecord> {
    let mut records = Vec::new();

    for group in &config.groups {
        for rule in &group.rules {
            let matched = rule.pattern.matching(&inventory.workloads);
            if let Some(record) = build_record(
                &inventory.identity.name,
                &group.labels,
                &rule.labels,
                &rule.ports,
                &matched,
            ) {
                records.push(record);
            }
        }
    }

    records
}

/// Run the whole pipeline for one host and write its target file
pub fn discover_host(
    config: &Config,
    connector: &dyn Connector,
    writer: &TargetFileWriter,
    uri: &str,
) -> Result<HostOutcome> {
    info!("Querying hypervisor {}...", uri);

    let inventory = collect_inventory(connector, uri)?;
    let records = build_records(config, &inventory);
    let path = writer.write(&inventory.identity.name, &records)?;

    Ok(HostOutcome {
        hypervisor: inventory.identity.name,
        path,
        records: records.len(),
    })
}

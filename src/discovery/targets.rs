//! Scrape target expansion
//!
//! A record's target list is the cartesian product of matched workloads and
//! the rule's ports, workload-major. Ports are used verbatim, so duplicate
//! ports yield duplicate targets.

use crate::discovery::labels::{merge_labels, LabelSet};
use crate::hypervisor::Workload;
use serde::{Deserialize, Serialize};

/// One entry of a file-based service discovery target file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub targets: Vec<String>,
    pub labels: LabelSet,
}

/// Expand matched workloads and ports into `<fqdn>:<port>` addresses
pub fn build_targets(matched: &[&Workload], ports: &[String]) -> Vec<String> {
    let mut targets = Vec::with_capacity(matched.len() * ports.len());

    for workload in matched {
        for port in ports {
            targets.push(format!("{}:{}", workload.fqdn, port));
        }
    }

    targets
}

/// Assemble the record for a rule, or `None` when nothing matched
pub fn build_record(
    hypervisor: &str,
    group_labels: &LabelSet,
    rule_labels: &LabelSet,
    ports: &[String],
    matched: &[&Workload],
) -> Option<ScrapeRecord> {
    if matched.is_empty() {
        return None;
    }

    Some(ScrapeRecord {
        targets: build_targets(matched, ports),
        labels: merge_labels(hypervisor, group_labels, rule_labels),
    })
}

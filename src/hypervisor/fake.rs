//! Scripted in-memory hypervisors for exercising the pipeline without libvirt
//!
//! The connector counts open sessions and live workload handles so callers
//! can assert that everything obtained was released.

use super::{Connector, Session, WorkloadHandle};
use crate::{Result, SdError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

/// Scripted state of a single hypervisor
#[derive(Debug, Clone)]
pub struct FakeHypervisor {
    hostname: std::result::Result<String, String>,
    workloads: Vec<Option<String>>,
    list_error: Option<String>,
    barrier: Option<Arc<Barrier>>,
    panic_on_connect: bool,
}

impl FakeHypervisor {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: Ok(hostname.to_string()),
            workloads: Vec::new(),
            list_error: None,
            barrier: None,
            panic_on_connect: false,
        }
    }

    pub fn workload(mut self, name: &str) -> Self {
        self.workloads.push(Some(name.to_string()));
        self
    }

    pub fn workloads(mut self, names: &[&str]) -> Self {
        self.workloads
            .extend(names.iter().map(|n| Some(n.to_string())));
        self
    }

    /// A domain whose name lookup fails
    pub fn unreadable_workload(mut self) -> Self {
        self.workloads.push(None);
        self
    }

    pub fn failing_hostname(mut self, message: &str) -> Self {
        self.hostname = Err(message.to_string());
        self
    }

    pub fn failing_enumeration(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    /// Block the connecting thread on `barrier` before the session opens
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_connect = true;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    open_sessions: AtomicUsize,
    live_handles: AtomicUsize,
    connects: AtomicUsize,
}

/// Connector serving [`FakeHypervisor`]s by URI. Unknown URIs are unreachable.
#[derive(Debug, Default, Clone)]
pub struct FakeConnector {
    hosts: HashMap<String, FakeHypervisor>,
    counters: Arc<Counters>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, uri: &str, hypervisor: FakeHypervisor) -> Self {
        self.hosts.insert(uri.to_string(), hypervisor);
        self
    }

    pub fn open_sessions(&self) -> usize {
        self.counters.open_sessions.load(Ordering::SeqCst)
    }

    pub fn live_handles(&self) -> usize {
        self.counters.live_handles.load(Ordering::SeqCst)
    }

    /// Number of connection attempts, successful or not
    pub fn connects(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }
}

impl Connector for FakeConnector {
    fn connect(&self, uri: &str) -> Result<Box<dyn Session>> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);

        let hypervisor = self
            .hosts
            .get(uri)
            .ok_or_else(|| SdError::ConnectionFailed {
                uri: uri.to_string(),
                message: "host unreachable".to_string(),
            })?;

        if let Some(barrier) = &hypervisor.barrier {
            barrier.wait();
        }
        if hypervisor.panic_on_connect {
            panic!("scripted panic connecting to {}", uri);
        }

        self.counters.open_sessions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeSession {
            hypervisor: hypervisor.clone(),
            counters: self.counters.clone(),
        }))
    }
}

struct FakeSession {
    hypervisor: FakeHypervisor,
    counters: Arc<Counters>,
}

impl Session for FakeSession {
    fn hostname(&self) -> Result<String> {
        self.hypervisor
            .hostname
            .clone()
            .map_err(SdError::HostnameUnavailable)
    }

    fn list_workloads(&self) -> Result<Vec<Box<dyn WorkloadHandle>>> {
        if let Some(message) = &self.hypervisor.list_error {
            return Err(SdError::EnumerationFailed(message.clone()));
        }

        Ok(self
            .hypervisor
            .workloads
            .iter()
            .map(|name| {
                self.counters.live_handles.fetch_add(1, Ordering::SeqCst);
                Box::new(FakeWorkload {
                    name: name.clone(),
                    counters: self.counters.clone(),
                }) as Box<dyn WorkloadHandle>
            })
            .collect())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FakeWorkload {
    name: Option<String>,
    counters: Arc<Counters>,
}

impl WorkloadHandle for FakeWorkload {
    fn name(&self) -> Result<String> {
        self.name
            .clone()
            .ok_or_else(|| SdError::EnumerationFailed("domain name unavailable".to_string()))
    }
}

impl Drop for FakeWorkload {
    fn drop(&mut self) {
        self.counters.live_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

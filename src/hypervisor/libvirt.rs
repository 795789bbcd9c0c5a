//! libvirt backend built on the `virt` bindings

use super::{Connector, Session, WorkloadHandle};
use crate::{Result, SdError};
use tracing::{debug, warn};
use virt::connect::Connect;
use virt::domain::Domain;

/// Opens libvirt connections from URIs such as `qemu+ssh://hv1/system`
#[derive(Debug, Default)]
pub struct LibvirtConnector;

impl Connector for LibvirtConnector {
    fn connect(&self, uri: &str) -> Result<Box<dyn Session>> {
        debug!("Opening libvirt connection to {}", uri);

        let conn = Connect::open(Some(uri)).map_err(|e| SdError::ConnectionFailed {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

        Ok(Box::new(LibvirtSession {
            uri: uri.to_string(),
            conn,
        }))
    }
}

struct LibvirtSession {
    uri: String,
    conn: Connect,
}

impl Session for LibvirtSession {
    fn hostname(&self) -> Result<String> {
        self.conn
            .get_hostname()
            .map_err(|e| SdError::HostnameUnavailable(e.to_string()))
    }

    fn list_workloads(&self) -> Result<Vec<Box<dyn WorkloadHandle>>> {
        let domains = self
            .conn
            .list_all_domains(0)
            .map_err(|e| SdError::EnumerationFailed(e.to_string()))?;

        Ok(domains
            .into_iter()
            .map(|domain| Box::new(LibvirtDomain { domain }) as Box<dyn WorkloadHandle>)
            .collect())
    }
}

impl Drop for LibvirtSession {
    fn drop(&mut self) {
        if let Err(e) = self.conn.close() {
            warn!("Failed to close libvirt connection to {}: {}", self.uri, e);
        }
    }
}

struct LibvirtDomain {
    domain: Domain,
}

impl WorkloadHandle for LibvirtDomain {
    fn name(&self) -> Result<String> {
        self.domain
            .get_name()
            .map_err(|e| SdError::EnumerationFailed(e.to_string()))
    }
}

impl Drop for LibvirtDomain {
    fn drop(&mut self) {
        if let Err(e) = self.domain.free() {
            debug!("Failed to free domain handle: {}", e);
        }
    }
}

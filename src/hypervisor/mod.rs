//! Virtualization host access
//!
//! The pipeline talks to hypervisors through [`Connector`], [`Session`] and
//! [`WorkloadHandle`]. Sessions and handles release their native resources
//! when dropped, so every exit path cleans up.

pub mod fake;
#[cfg(feature = "libvirt")]
pub mod libvirt;
pub mod types;

pub use types::{HypervisorIdentity, Workload, FALLBACK_DOMAIN};

use crate::{Result, SdError};
use std::sync::Arc;

/// Opens sessions to hypervisor endpoints. Calls may block.
pub trait Connector: Send + Sync {
    fn connect(&self, uri: &str) -> Result<Box<dyn Session>>;
}

/// An open connection to one hypervisor; closed on drop
pub trait Session {
    /// Fully-qualified hostname of the hypervisor
    fn hostname(&self) -> Result<String>;

    /// All domains currently known to the hypervisor
    fn list_workloads(&self) -> Result<Vec<Box<dyn WorkloadHandle>>>;
}

/// A single domain handle; released on drop
pub trait WorkloadHandle {
    fn name(&self) -> Result<String>;
}

/// Connector used when the crate is built without libvirt support
#[derive(Debug, Default)]
pub struct UnsupportedConnector;

impl Connector for UnsupportedConnector {
    fn connect(&self, uri: &str) -> Result<Box<dyn Session>> {
        Err(SdError::ConnectionFailed {
            uri: uri.to_string(),
            message: "built without libvirt support (enable the `libvirt` feature)".to_string(),
        })
    }
}

#[cfg(feature = "libvirt")]
pub fn default_connector() -> Arc<dyn Connector> {
    Arc::new(libvirt::LibvirtConnector)
}

#[cfg(not(feature = "libvirt"))]
pub fn default_connector() -> Arc<dyn Connector> {
    Arc::new(UnsupportedConnector)
}

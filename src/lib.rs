pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod hypervisor;
pub mod output;
pub mod poller;

pub use error::{Result, SdError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

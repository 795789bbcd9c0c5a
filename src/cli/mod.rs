use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "prometheus-libvirt_sd.yml";

#[derive(Parser, Debug)]
#[command(name = "libvirt-sd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prometheus file-based service discovery for libvirt hypervisors", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_FILE,
        help = "Path to config file"
    )]
    pub config: PathBuf,
}

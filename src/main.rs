use anyhow::{Context, Result};
use clap::Parser;
use libvirt_sd::cli::Cli;
use libvirt_sd::config::Config;
use libvirt_sd::hypervisor;
use libvirt_sd::poller::Poller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting libvirt-sd v{}", libvirt_sd::VERSION);

    let config = Config::load(&cli.config).with_context(|| {
        format!(
            "Unable to load configuration - please specify the correct location using --config=file.yml (tried {})",
            cli.config.display()
        )
    })?;

    info!(
        config = %cli.config.display(),
        polling_interval = config.polling_interval,
        output_dir = %config.output_dir.display(),
        output_format = %config.output_format,
        hosts = config.hosts.len(),
        groups = config.groups.len(),
        "Configuration loaded"
    );

    let poller = Poller::new(config, hypervisor::default_connector());
    poller.run().await;

    info!("libvirt-sd stopped");
    Ok(())
}

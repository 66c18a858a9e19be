//! Backend health probe.

use anyhow::Result;

use healthsync_core::config::Config;

pub async fn check(config: &Config) -> Result<()> {
    let session = super::session(config)?;

    let status = match session.health().await {
        Ok(status) => status,
        Err(err) => anyhow::bail!("Backend unreachable at {}: {err}", config.server_url()),
    };

    println!("Backend:  {}", config.server_url());
    println!("Status:   {}", status.status);
    println!("Checked:  {}", status.timestamp);
    for (service, state) in &status.services {
        println!("  {service}: {state}");
    }
    Ok(())
}

//! Config command handlers.

use anyhow::Result;

use healthsync_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    Config::save_server_url(url)?;
    println!("Server URL set to {}", url.trim_end_matches('/'));
    Ok(())
}

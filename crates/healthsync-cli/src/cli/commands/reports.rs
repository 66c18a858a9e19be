//! Report command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use healthsync_core::config::Config;

pub async fn generate(config: &Config, report_type: &str) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let report_type = report_type.to_string();
    let receipt = session
        .authorized(|client| async move { client.generate_report(&report_type).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    println!("Generated {} report {}", receipt.report_type, receipt.report_id);
    if let (Some(start), Some(end)) =
        (receipt.date_range.get("start"), receipt.date_range.get("end"))
    {
        println!("Covers {start} to {end}");
    }
    println!("Download it with `healthsync reports download {}`", receipt.report_id);
    Ok(())
}

pub async fn download(config: &Config, id: &str, output: Option<&Path>) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let report_id = id.to_string();
    let bytes = session
        .authorized(|client| async move { client.download_report(&report_id).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let target = output.map_or_else(
        || std::path::PathBuf::from(format!("{id}.pdf")),
        Path::to_path_buf,
    );
    fs::write(&target, &bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("Saved {}", target.display());
    Ok(())
}

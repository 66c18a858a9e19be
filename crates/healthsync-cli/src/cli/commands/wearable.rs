//! Wearable command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};

use healthsync_core::config::Config;

const PROVIDERS: [&str; 2] = ["google", "fitbit"];

pub async fn connect(config: &Config, provider: &str) -> Result<()> {
    if !PROVIDERS.contains(&provider) {
        anyhow::bail!("Unknown provider '{provider}' (expected google or fitbit)");
    }

    let mut session = super::authenticated_session(config).await?;

    let provider = provider.to_string();
    let auth = session
        .authorized(|client| async move { client.wearable_auth_url(&provider).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    println!("Open this URL in your browser to authorize access:");
    println!();
    println!("  {}", auth.auth_url);
    Ok(())
}

pub async fn data(config: &Config, data_type: &str, start: &str, end: &str) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let data_type = data_type.to_string();
    let start = start.to_string();
    let end = end.to_string();
    let series = session
        .authorized(|client| async move { client.wearable_data(&data_type, &start, &end).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    if series.data.is_empty() {
        println!(
            "No {} data between {} and {}.",
            series.data_type, series.start_date, series.end_date
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Date", &series.data_type]);
    for point in &series.data {
        table.add_row([point.date.clone(), point.value.to_string()]);
    }
    println!("{table}");

    Ok(())
}

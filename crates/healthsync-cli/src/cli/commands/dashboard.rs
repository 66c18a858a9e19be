//! Dashboard command handler.

use anyhow::Result;

use healthsync_core::config::Config;

pub async fn show(config: &Config) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let dashboard = session
        .authorized(|client| async move { client.dashboard().await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    println!("Dashboard for {}", dashboard.user.full_name);
    println!();
    println!("Documents: {}", dashboard.stats.total_documents);
    println!("Analyses:  {}", dashboard.stats.total_analyses);
    println!(
        "Wearable:  {}",
        if dashboard.stats.wearable_connected {
            "connected"
        } else {
            "not connected"
        }
    );

    if !dashboard.recent_documents.is_empty() {
        println!();
        println!("Recent documents:");
        for doc in &dashboard.recent_documents {
            println!(
                "  {}  {}",
                doc.uploaded_at.as_deref().unwrap_or("-"),
                doc.filename.as_deref().unwrap_or("(unnamed)")
            );
        }
    }

    if !dashboard.recent_analyses.is_empty() {
        println!();
        println!("Recent analyses:");
        for analysis in &dashboard.recent_analyses {
            println!(
                "  {}  {}",
                analysis.created_at.as_deref().unwrap_or("-"),
                analysis.query.as_deref().unwrap_or("(no query)")
            );
        }
    }

    Ok(())
}

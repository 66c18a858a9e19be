//! Analysis command handler.

use anyhow::Result;

use healthsync_core::api::types::AnalysisRequest;
use healthsync_core::config::Config;

pub async fn run(
    config: &Config,
    query: &str,
    document_ids: Vec<String>,
    analysis_type: &str,
) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let request = AnalysisRequest {
        query: query.to_string(),
        document_ids: if document_ids.is_empty() {
            None
        } else {
            Some(document_ids)
        },
        analysis_type: analysis_type.to_string(),
    };

    let analysis = session
        .authorized(|client| async move { client.analyze(&request).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    println!("{}", analysis.response);
    println!();
    println!("Confidence: {:.0}%", analysis.confidence_score * 100.0);
    if !analysis.sources.is_empty() {
        println!("Sources: {}", analysis.sources.join(", "));
    }
    println!("Analysis ID: {}", analysis.analysis_id);

    Ok(())
}

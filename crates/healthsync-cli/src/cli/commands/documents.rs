//! Document command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};

use healthsync_core::config::Config;

pub async fn list(config: &Config) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let listing = session
        .authorized(|client| async move { client.list_documents().await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    if listing.documents.is_empty() {
        println!("No documents uploaded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Filename", "Type", "Size", "Uploaded", "Status"]);
    for doc in &listing.documents {
        table.add_row([
            doc.document_id.clone(),
            doc.filename.clone(),
            doc.document_type.clone(),
            format_size(doc.file_size),
            doc.uploaded_at.clone(),
            doc.processing_status.clone(),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn upload(
    config: &Config,
    file: &Path,
    patient_id: Option<&str>,
    document_type: &str,
) -> Result<()> {
    let bytes =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("File path has no usable name")?
        .to_string();
    let content_type = content_type_for(&filename);

    let mut session = super::authenticated_session(config).await?;
    let document_type = document_type.to_string();
    let patient_id = patient_id.map(str::to_string);

    let receipt = session
        .authorized(|client| async move {
            client
                .upload_document(
                    &filename,
                    content_type,
                    bytes,
                    patient_id.as_deref(),
                    &document_type,
                )
                .await
        })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    println!(
        "Uploaded {} ({}) as document {}",
        receipt.filename,
        format_size(receipt.file_size),
        receipt.document_id
    );
    Ok(())
}

pub async fn download(config: &Config, id: &str, output: Option<&Path>) -> Result<()> {
    let mut session = super::authenticated_session(config).await?;

    let document_id = id.to_string();
    let bytes = session
        .authorized(|client| async move { client.download_document(&document_id).await })
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let target = output.map_or_else(|| std::path::PathBuf::from(id), Path::to_path_buf);
    fs::write(&target, &bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("Saved {} ({})", target.display(), format_size(bytes.len() as u64));
    Ok(())
}

/// Content type from the file extension; the backend stores it verbatim.
fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes_f / 1024.0)
    } else {
        format!("{:.1} MiB", bytes_f / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: content type detection by extension, case-insensitive.
    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("report.PDF"), "application/pdf");
        assert_eq!(content_type_for("scan.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    /// Test: human-readable sizes.
    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}

//! Scribe MCP Server - OCR tools for MCP clients.
//!
//! This binary exposes Tesseract OCR as MCP tools. It communicates via
//! stdio transport, which is the standard for local MCP servers.
//!
//! Before serving it checks that the tesseract binary is reachable and has
//! at least one language installed. If not, it logs install instructions
//! and exits.

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scribe_core::{check_backend, ScribeConfig};
use scribe_extractors::{ExtractorFactory, TesseractBackend};
use scribe_mcp::OcrServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing to stderr (stdout is used for MCP transport)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting Scribe MCP server");

    let config = ScribeConfig::load()?;
    if let Some(dir) = &config.tesseract_path {
        tracing::info!("Using tesseract from {}", dir.display());
        TesseractBackend::prepend_to_path(dir);
    }

    let service = ExtractorFactory::service(config);

    match check_backend(service.backend().as_ref()).await {
        Ok(report) => tracing::info!(
            backend = report.backend,
            version = %report.version,
            languages = report.languages.len(),
            "OCR backend ready"
        ),
        Err(e) => {
            tracing::error!("OCR backend unavailable: {}", e);
            if let Some(hint) = e.suggestion() {
                tracing::error!("{}", hint);
            }
            return Err(e.into());
        }
    }

    // Serve via stdio transport
    let server = OcrServer::new(service);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    tracing::info!("MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}

//! Property document verification CLI
//!
//! Reads one document from disk, runs the verification pipeline and prints the
//! report to stdout. Logs go to stderr.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, OutputFormat};
use shared_pdf::Normalizer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verification_engine::{OcrEngine, Pipeline};

#[cfg(feature = "pdfium")]
fn build_normalizer(args: &Args) -> Normalizer {
    use shared_pdf::PdfiumRasterizer;

    let rasterizer = match &args.pdfium_dir {
        Some(dir) => PdfiumRasterizer::with_library_dir(dir),
        None => PdfiumRasterizer::new(),
    };
    Normalizer::new(Arc::new(rasterizer))
}

#[cfg(not(feature = "pdfium"))]
fn build_normalizer(args: &Args) -> Normalizer {
    if args.pdfium_dir.is_some() {
        tracing::warn!("--pdfium-dir ignored: built without the pdfium feature");
    }
    Normalizer::images_only()
}

#[cfg(feature = "tesseract")]
fn build_engine(args: &Args) -> Result<Arc<dyn OcrEngine>> {
    let engine = verification_engine::TesseractEngine::new(&args.lang, args.tessdata.clone())
        .context("Failed to start Tesseract")?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "tesseract"))]
fn build_engine(_args: &Args) -> Result<Arc<dyn OcrEngine>> {
    anyhow::bail!("OCR support not enabled. Rebuild with --features tesseract")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries only the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("propdoc-verify v{}", env!("CARGO_PKG_VERSION"));

    let policy = args.load_policy()?;
    let engine = build_engine(&args)?;
    let pipeline = Pipeline::new(build_normalizer(&args), engine, policy);

    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let input = args.build_input(bytes);
    let listing = args.listing();

    let report = pipeline.analyze(&input, listing.as_ref()).await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.to_text()),
    }

    Ok(())
}

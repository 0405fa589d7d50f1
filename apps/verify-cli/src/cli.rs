//! Argument parsing and input assembly for `propdoc-verify`

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use shared_types::{DocumentInput, DocumentType, ListingRecord};
use std::path::{Path, PathBuf};
use verification_engine::Policy;

#[derive(Parser, Debug)]
#[command(name = "propdoc-verify")]
#[command(
    version,
    about = "Verify a property document and print the analysis report"
)]
pub struct Args {
    /// Document to analyze (PDF or image)
    pub file: PathBuf,

    /// Document type: land-title, building-permit, tax-assessment, insurance-certificate
    #[arg(short = 't', long = "type")]
    pub doc_type: String,

    /// MIME type; guessed from the file extension when omitted
    #[arg(long)]
    pub mime: Option<String>,

    /// 1-indexed page to analyze
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Declared field as key=value (repeatable)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Agent name on the listing
    #[arg(long, requires = "listing_price")]
    pub listing_agent: Option<String>,

    /// Listing price
    #[arg(long, requires = "listing_agent")]
    pub listing_price: Option<f64>,

    /// File modification time reported by the uploader (RFC 3339)
    #[arg(long)]
    pub last_modified: Option<DateTime<Utc>>,

    /// Scoring policy TOML file
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// OCR timeout in milliseconds (overrides the policy)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Tesseract language data directory
    #[arg(long)]
    pub tessdata: Option<PathBuf>,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    pub lang: String,

    /// Directory containing the pdfium shared library
    #[arg(long)]
    pub pdfium_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl Args {
    pub fn listing(&self) -> Option<ListingRecord> {
        match (&self.listing_agent, self.listing_price) {
            (Some(agent), Some(price)) => Some(ListingRecord {
                agent_name: agent.clone(),
                price,
            }),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> String {
        self.mime
            .clone()
            .unwrap_or_else(|| guess_mime(&self.file).to_string())
    }

    /// Load the policy file (or defaults) and apply flag overrides
    pub fn load_policy(&self) -> Result<Policy> {
        let mut policy = match &self.policy {
            Some(path) => Policy::from_file(path)
                .with_context(|| format!("Failed to load policy {}", path.display()))?,
            None => Policy::default(),
        };
        if let Some(timeout_ms) = self.timeout_ms {
            policy.ocr.timeout_ms = timeout_ms;
        }
        policy.validate().context("Invalid policy after overrides")?;
        Ok(policy)
    }

    pub fn build_input(&self, file_bytes: Vec<u8>) -> DocumentInput {
        let mut input = DocumentInput::new(
            DocumentType::from(self.doc_type.as_str()),
            file_bytes,
            &self.mime_type(),
        );
        for (key, value) in &self.fields {
            input = input.with_field(key, value);
        }
        if let Some(page) = self.page {
            input = input.with_page(page);
        }
        if let Some(at) = self.last_modified {
            input = input.with_last_modified(at);
        }
        input
    }
}

/// Parse a `key=value` declared field
pub fn parse_field(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected key=value, got '{}'", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("field name is empty in '{}'", raw);
    }
    Ok((key.to_string(), value.trim().to_string()))
}

pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["propdoc-verify"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("ownerName=Jane Tan").unwrap(),
            ("ownerName".to_string(), "Jane Tan".to_string())
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_field("noequals").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("deed.PDF")), "application/pdf");
        assert_eq!(guess_mime(Path::new("scan.jpg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("scan.tif")), "image/tiff");
        assert_eq!(guess_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_build_input_from_args() {
        let args = parse(&[
            "title.pdf",
            "--type",
            "land-title",
            "--page",
            "2",
            "-f",
            "ownerName=Jane Tan",
            "--field",
            "hasOfficialStamp=yes",
            "--last-modified",
            "2024-05-30T09:00:00Z",
        ]);
        let input = args.build_input(vec![1, 2, 3]);

        assert_eq!(input.document_type, DocumentType::LandTitle);
        assert_eq!(input.mime_type, "application/pdf");
        assert_eq!(input.page_number, Some(2));
        assert_eq!(input.declared("ownerName"), Some("Jane Tan"));
        assert_eq!(input.declared("hasOfficialStamp"), Some("yes"));
        assert!(input.last_modified.is_some());
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_mime_wins() {
        let args = parse(&["upload.bin", "-t", "tax-assessment", "--mime", "image/png"]);
        assert_eq!(args.mime_type(), "image/png");
    }

    #[test]
    fn test_listing_needs_agent_and_price() {
        let args = parse(&[
            "a.png",
            "-t",
            "land-title",
            "--listing-agent",
            "Jane Tan",
            "--listing-price",
            "450000",
        ]);
        assert_eq!(
            args.listing(),
            Some(ListingRecord {
                agent_name: "Jane Tan".into(),
                price: 450_000.0
            })
        );

        let missing_price = Args::try_parse_from([
            "propdoc-verify",
            "a.png",
            "-t",
            "land-title",
            "--listing-agent",
            "Jane Tan",
        ]);
        assert!(missing_price.is_err());
    }

    #[test]
    fn test_timeout_override() {
        let args = parse(&["a.png", "-t", "land-title", "--timeout-ms", "1500"]);
        let policy = args.load_policy().unwrap();
        assert_eq!(policy.ocr.timeout_ms, 1500);

        let zero = parse(&["a.png", "-t", "land-title", "--timeout-ms", "0"]);
        assert!(zero.load_policy().is_err());
    }

    #[test]
    fn test_text_format() {
        let args = parse(&["a.png", "-t", "land-title", "--format", "text"]);
        assert_eq!(args.format, OutputFormat::Text);
    }
}

//! OCR engines for receipt images
//!
//! - `OcrEngine` trait: image + language hint in, recognized text out
//! - `TesseractEngine`: runs the `tesseract` command-line tool
//! - `MockEngine`: fixed text, for tests and development
//!
//! One scan is one attempt. A failing engine ends the attempt; nothing is
//! retried and no partial text is kept.
//!
//! Environment variables:
//! - `KAKEIBO_TESSERACT`: tesseract binary to run (default: `tesseract`)

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::CandidateItem;
use crate::receipt::ReceiptExtractor;

/// Environment variable naming the tesseract binary
pub const TESSERACT_ENV: &str = "KAKEIBO_TESSERACT";

/// File extensions accepted as receipt images
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Trait for optical character recognition backends
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in an image
    async fn recognize(&self, image: &Path, language: &str) -> Result<String>;

    /// Short name for log messages
    fn name(&self) -> &str;
}

/// Tesseract command-line backend
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: String,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Use `KAKEIBO_TESSERACT` if set, otherwise `tesseract` from PATH
    pub fn from_env() -> Self {
        let binary = std::env::var(TESSERACT_ENV).unwrap_or_else(|_| "tesseract".to_string());
        Self::new(binary)
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &Path, language: &str) -> Result<String> {
        debug!(
            "Running {} on {} (lang={})",
            self.binary,
            image.display(),
            language
        );

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .await
            .map_err(|e| Error::Ocr(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Mock OCR engine returning a fixed text
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    text: String,
    fail: bool,
}

impl MockEngine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fail: false,
        }
    }

    /// An engine whose every call fails
    pub fn failing() -> Self {
        Self {
            text: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl OcrEngine for MockEngine {
    async fn recognize(&self, _image: &Path, _language: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Ocr("mock engine failure".into()));
        }
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Reject paths that are missing or do not look like images
pub fn check_image_path(image: &Path) -> Result<()> {
    if !image.is_file() {
        return Err(Error::NotFound(format!(
            "Receipt image not found: {}",
            image.display()
        )));
    }

    let is_image = image
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);

    if !is_image {
        return Err(Error::InvalidData(format!(
            "Not an image file: {}",
            image.display()
        )));
    }
    Ok(())
}

/// Run one receipt image through OCR and the extractor
pub async fn scan_receipt(
    engine: &dyn OcrEngine,
    extractor: &ReceiptExtractor,
    image: &Path,
) -> Result<Vec<CandidateItem>> {
    check_image_path(image)?;

    let language = &extractor.rules().ocr_language;
    let text = engine.recognize(image, language).await.map_err(|e| {
        warn!("OCR with {} failed for {}: {}", engine.name(), image.display(), e);
        e
    })?;

    Ok(extractor.extract(&text))
}

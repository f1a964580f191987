//! Startup health check for the OCR backend.
//!
//! The server only needs a pass/fail signal. On failure the error carries
//! install instructions for the platform's package manager; nothing is
//! installed automatically.

use std::path::Path;

use crate::error::{ScribeError, ScribeResult};
use crate::traits::OcrBackend;

const MANUAL_INSTALL_URL: &str = "https://github.com/UB-Mannheim/tesseract/wiki";

/// Package managers the install hint knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PackageManager {
    Brew,
    Apt,
    Dnf,
    Pacman,
}

impl PackageManager {
    /// Detect the package manager for the running platform.
    pub fn detect() -> Option<Self> {
        Self::detect_for(std::env::consts::OS, |p| Path::new(p).exists())
    }

    /// Detection with an injectable OS name and file probe.
    pub fn detect_for(os: &str, exists: impl Fn(&str) -> bool) -> Option<Self> {
        match os {
            "macos" => ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"]
                .iter()
                .any(|p| exists(p))
                .then_some(PackageManager::Brew),
            "linux" => [
                ("/usr/bin/apt", PackageManager::Apt),
                ("/usr/bin/dnf", PackageManager::Dnf),
                ("/usr/bin/pacman", PackageManager::Pacman),
            ]
            .into_iter()
            .find(|(path, _)| exists(path))
            .map(|(_, manager)| manager),
            _ => None,
        }
    }

    /// Command that installs Tesseract with this package manager.
    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Brew => "brew install tesseract",
            PackageManager::Apt => "sudo apt-get update && sudo apt-get install -y tesseract-ocr",
            PackageManager::Dnf => "sudo dnf install -y tesseract",
            PackageManager::Pacman => "sudo pacman -S --noconfirm tesseract",
        }
    }
}

/// Install instructions for the detected platform.
pub fn install_hint(manager: Option<PackageManager>) -> String {
    match manager {
        Some(manager) => format!(
            "Install Tesseract with {}: {}",
            manager,
            manager.install_command()
        ),
        None => format!(
            "Install Tesseract manually from {} and make sure it is on PATH",
            MANUAL_INSTALL_URL
        ),
    }
}

/// Report from a passing health check.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub backend: &'static str,
    pub version: String,
    pub languages: Vec<String>,
}

/// Verify the OCR backend is reachable and has at least one language.
pub async fn check_backend(backend: &dyn OcrBackend) -> ScribeResult<HealthReport> {
    let unavailable = |message: String| ScribeError::BackendUnavailable {
        message,
        install_hint: Some(install_hint(PackageManager::detect())),
    };

    let version = backend
        .version()
        .await
        .map_err(|e| unavailable(format!("{} not found: {}", backend.name(), e)))?;

    let languages = backend
        .supported_languages()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    if languages.is_empty() {
        return Err(unavailable(
            "No supported languages found. Please check Tesseract installation.".to_string(),
        ));
    }

    Ok(HealthReport {
        backend: backend.name(),
        version,
        languages,
    })
}

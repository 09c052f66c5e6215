use crate::printer::{BrowserBackend, PdfBackend, WkhtmlBackend};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Executable locations resolved once at startup and passed to every
/// component that needs them. Absence of any single tool is not fatal here;
/// the renderer and printer surface it when a conversion actually needs it.
#[derive(Debug, Clone, Serialize)]
pub struct ToolPaths {
    pub npx: Option<PathBuf>,
    pub redoc_cli: Option<PathBuf>,
    pub browser: Option<PathBuf>,
    pub wkhtmltopdf: Option<PathBuf>,
}

impl ToolPaths {
    pub fn locate(explicit_browser: Option<&Path>, explicit_wkhtml: Option<&Path>) -> Self {
        let npx = which_first(&["npx"]);
        let redoc_cli = which_first(&["redoc-cli"]);
        let browser = find_browser(explicit_browser);
        let wkhtmltopdf = find_wkhtml(explicit_wkhtml);
        debug!(?npx, ?redoc_cli, ?browser, ?wkhtmltopdf, "located tools");
        Self {
            npx,
            redoc_cli,
            browser,
            wkhtmltopdf,
        }
    }

    /// Ordered PDF backend chain: browser first for fidelity with the
    /// JS-heavy ReDoc output, wkhtmltopdf as the compatibility fallback.
    pub fn backends(&self, timeout: Duration) -> Vec<Box<dyn PdfBackend>> {
        let mut chain: Vec<Box<dyn PdfBackend>> = Vec::new();
        if let Some(exe) = &self.browser {
            chain.push(Box::new(BrowserBackend::new(exe.clone(), timeout)));
        }
        if let Some(exe) = &self.wkhtmltopdf {
            chain.push(Box::new(WkhtmlBackend::new(exe.clone(), timeout)));
        }
        chain
    }
}

fn which_first(names: &[&str]) -> Option<PathBuf> {
    names.iter().find_map(|n| which::which(n).ok())
}

fn find_browser(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        warn!("browser override does not exist, probing defaults: {}", p.display());
    }

    // PATH first, in Chrome, Edge, Chromium order.
    if let Some(p) = which_first(&[
        "google-chrome",
        "google-chrome-stable",
        "chrome",
        "msedge",
        "chromium",
        "chromium-browser",
    ]) {
        return Some(p);
    }

    well_known_browsers().into_iter().find(|p| p.is_file())
}

/// Fixed install locations probed when nothing is on PATH, in the same
/// Chrome, Edge, Chromium order.
fn well_known_browsers() -> Vec<PathBuf> {
    let guesses: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
            r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/opt/google/chrome/chrome",
            "/usr/bin/microsoft-edge",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };
    guesses.iter().copied().map(PathBuf::from).collect()
}

fn find_wkhtml(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        warn!("wkhtmltopdf override does not exist, probing PATH: {}", p.display());
    }
    which_first(&["wkhtmltopdf"])
}

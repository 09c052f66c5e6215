use crate::error::ConvertError;
use crate::util::{file_uri, run_capture};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Browser,
    Wkhtmltopdf,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Browser => f.write_str("browser"),
            BackendKind::Wkhtmltopdf => f.write_str("wkhtmltopdf"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub landscape: bool,
    /// wkhtmltopdf only; headless browser printing has no margin flag.
    pub margin: String,
}

/// A single backend attempt's failure, folded into the final print error.
#[derive(Debug)]
pub struct BackendFailure(pub String);

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConvertError> for BackendFailure {
    fn from(err: ConvertError) -> Self {
        Self(err.to_string())
    }
}

/// One way of turning an HTML file into a PDF.
pub trait PdfBackend {
    fn kind(&self) -> BackendKind;
    fn attempt(&self, html: &Path, pdf: &Path, opts: &PrintOptions) -> Result<(), BackendFailure>;
}

/// Ordered fallback: the first backend that produces a PDF wins. Partial
/// output from a failed attempt is removed before the next backend runs.
pub fn print_pdf(
    backends: &[Box<dyn PdfBackend>],
    html: &Path,
    pdf: &Path,
    opts: &PrintOptions,
) -> Result<BackendKind, ConvertError> {
    if backends.is_empty() {
        return Err(ConvertError::Print {
            html: html.to_path_buf(),
            detail: "no backend available: neither a Chromium-family browser nor wkhtmltopdf was found"
                .into(),
        });
    }

    let mut attempts = Vec::new();
    for backend in backends {
        match backend.attempt(html, pdf, opts) {
            Ok(()) if pdf.is_file() => return Ok(backend.kind()),
            Ok(()) => {
                attempts.push(format!("{}: exited cleanly but produced no PDF", backend.kind()));
            }
            Err(failure) => {
                warn!("{} backend failed for {}: {}", backend.kind(), html.display(), failure);
                let _ = std::fs::remove_file(pdf);
                attempts.push(format!("{}: {}", backend.kind(), failure));
            }
        }
    }

    Err(ConvertError::Print {
        html: html.to_path_buf(),
        detail: attempts.join("; "),
    })
}

pub struct BrowserBackend {
    exe: PathBuf,
    timeout: Duration,
}

impl BrowserBackend {
    pub fn new(exe: PathBuf, timeout: Duration) -> Self {
        Self { exe, timeout }
    }
}

impl PdfBackend for BrowserBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Browser
    }

    fn attempt(&self, html: &Path, pdf: &Path, opts: &PrintOptions) -> Result<(), BackendFailure> {
        // The browser wants a URL, not a possibly-relative path.
        let html_abs = html
            .canonicalize()
            .map_err(|e| BackendFailure(format!("resolving {}: {e}", html.display())))?;
        let mut cmd = Command::new(&self.exe);
        cmd.args(browser_print_args(&html_abs, pdf, opts));
        let out = run_capture(&mut cmd, "browser", self.timeout)?;
        if !out.status.success() {
            return Err(BackendFailure(format!(
                "exited {}: {}",
                out.status,
                out.stderr_lossy()
            )));
        }
        Ok(())
    }
}

pub struct WkhtmlBackend {
    exe: PathBuf,
    timeout: Duration,
}

impl WkhtmlBackend {
    pub fn new(exe: PathBuf, timeout: Duration) -> Self {
        Self { exe, timeout }
    }
}

impl PdfBackend for WkhtmlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Wkhtmltopdf
    }

    fn attempt(&self, html: &Path, pdf: &Path, opts: &PrintOptions) -> Result<(), BackendFailure> {
        let mut cmd = Command::new(&self.exe);
        cmd.args(wkhtml_print_args(html, pdf, opts));
        let out = run_capture(&mut cmd, "wkhtmltopdf", self.timeout)?;
        if !out.status.success() {
            return Err(BackendFailure(format!(
                "exited {}: {}",
                out.status,
                out.stderr_lossy()
            )));
        }
        Ok(())
    }
}

/// Chromium headless print flags. There is no margin control here; margins
/// apply only to the wkhtmltopdf fallback.
pub fn browser_print_args(html: &Path, pdf: &Path, opts: &PrintOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--headless=new".into(),
        "--disable-gpu".into(),
        format!("--print-to-pdf={}", pdf.display()).into(),
        "--print-to-pdf-no-header".into(),
        "--virtual-time-budget=20000".into(),
    ];
    if opts.landscape {
        args.push("--landscape".into());
    }
    args.push(file_uri(html).into());
    args
}

pub fn wkhtml_print_args(html: &Path, pdf: &Path, opts: &PrintOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--print-media-type".into(),
        "--enable-local-file-access".into(),
    ];
    if opts.landscape {
        args.push("--orientation".into());
        args.push("Landscape".into());
    }
    for side in ["--margin-top", "--margin-right", "--margin-bottom", "--margin-left"] {
        args.push(side.into());
        args.push(opts.margin.clone().into());
    }
    args.push(html.as_os_str().to_os_string());
    args.push(pdf.as_os_str().to_os_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(landscape: bool) -> PrintOptions {
        PrintOptions {
            landscape,
            margin: "8mm".into(),
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn browser_prints_portrait_by_default() {
        let args = strings(&browser_print_args(
            Path::new("/tmp/a.html"),
            Path::new("/tmp/a.pdf"),
            &opts(false),
        ));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--print-to-pdf=/tmp/a.pdf".to_string()));
        assert!(!args.iter().any(|a| a == "--landscape"));
        assert_eq!(args.last().unwrap(), "file:///tmp/a.html");
    }

    #[test]
    fn browser_landscape_flag_toggles() {
        let args = strings(&browser_print_args(
            Path::new("/tmp/a.html"),
            Path::new("/tmp/a.pdf"),
            &opts(true),
        ));
        assert!(args.iter().any(|a| a == "--landscape"));
    }

    #[test]
    fn wkhtml_sets_all_four_margins() {
        let args = strings(&wkhtml_print_args(Path::new("a.html"), Path::new("a.pdf"), &opts(false)));
        for side in ["--margin-top", "--margin-right", "--margin-bottom", "--margin-left"] {
            let i = args.iter().position(|a| a == side).unwrap();
            assert_eq!(args[i + 1], "8mm");
        }
        assert!(!args.iter().any(|a| a == "--orientation"));
        assert_eq!(&args[args.len() - 2..], ["a.html", "a.pdf"]);
    }

    #[test]
    fn wkhtml_landscape_orientation() {
        let args = strings(&wkhtml_print_args(Path::new("a.html"), Path::new("a.pdf"), &opts(true)));
        let i = args.iter().position(|a| a == "--orientation").unwrap();
        assert_eq!(args[i + 1], "Landscape");
    }
}

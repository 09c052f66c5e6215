use crate::discover::SpecFile;
use crate::printer::{print_pdf, BackendKind, PdfBackend, PrintOptions};
use crate::render::HtmlRenderer;
use crate::report::{ConversionResult, RunSummary};
use crate::util::{ensure_dir, now_rfc3339};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct Pipeline<R: HtmlRenderer> {
    renderer: R,
    backends: Vec<Box<dyn PdfBackend>>,
    out_dir: PathBuf,
    print_opts: PrintOptions,
    keep_html: bool,
}

/// One spec's end-to-end conversion, with its derived artifact paths.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub spec: SpecFile,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    pub keep_html: bool,
}

/// Derive one job per spec. PDF paths mirror the source layout under
/// `out_dir`; when two specs would claim the same PDF (same stem, different
/// extension) the later one keeps its full file name: `a.json` -> `a.json.pdf`.
pub fn plan_jobs(
    specs: &[SpecFile],
    out_dir: &Path,
    scratch_dir: &Path,
    keep_html: bool,
) -> Vec<ConversionJob> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    specs
        .iter()
        .map(|spec| {
            let mut pdf_rel = spec.rel.with_extension("pdf");
            if !claimed.insert(pdf_rel.clone()) {
                let mut name = spec.rel.as_os_str().to_os_string();
                name.push(".pdf");
                pdf_rel = PathBuf::from(name);
                claimed.insert(pdf_rel.clone());
            }
            let html_rel = pdf_rel.with_extension("html");
            let html_root = if keep_html { out_dir } else { scratch_dir };
            ConversionJob {
                spec: spec.clone(),
                html_path: html_root.join(&html_rel),
                pdf_path: out_dir.join(&pdf_rel),
                keep_html,
            }
        })
        .collect()
}

impl<R: HtmlRenderer> Pipeline<R> {
    pub fn new(
        renderer: R,
        backends: Vec<Box<dyn PdfBackend>>,
        out_dir: PathBuf,
        print_opts: PrintOptions,
        keep_html: bool,
    ) -> Self {
        Self {
            renderer,
            backends,
            out_dir,
            print_opts,
            keep_html,
        }
    }

    /// Convert every discovered spec in order, continuing past per-file
    /// failures.
    pub fn run(&self, specs: &[SpecFile]) -> Result<RunSummary> {
        let started = now_rfc3339();

        if self.backends.is_empty() {
            warn!("no PDF backend found (browser or wkhtmltopdf); every conversion will fail");
        }

        let scratch =
            tempfile::tempdir().context("creating scratch directory for intermediate HTML")?;
        let jobs = plan_jobs(specs, &self.out_dir, scratch.path(), self.keep_html);

        let mut results = Vec::with_capacity(jobs.len());
        for job in &jobs {
            info!("converting {}", job.spec.rel.display());
            match self.run_job(job) {
                Ok(backend) => {
                    info!("created {} via {}", job.pdf_path.display(), backend);
                    results.push(ConversionResult::ok(job, backend));
                }
                Err(err) => {
                    warn!("failed {}: {:#}", job.spec.rel.display(), err);
                    results.push(ConversionResult::failed(job, format!("{err:#}")));
                }
            }
        }

        Ok(RunSummary::new(started, now_rfc3339(), results))
    }

    fn run_job(&self, job: &ConversionJob) -> Result<BackendKind> {
        if let Some(parent) = job.pdf_path.parent() {
            ensure_dir(parent)?;
        }
        if let Some(parent) = job.html_path.parent() {
            ensure_dir(parent)?;
        }

        self.renderer.render(&job.spec.path, &job.html_path)?;

        let printed = print_pdf(&self.backends, &job.html_path, &job.pdf_path, &self.print_opts);

        // The intermediate HTML only outlives the job when asked for, even
        // when printing failed.
        if !job.keep_html {
            let _ = std::fs::remove_file(&job.html_path);
        }

        Ok(printed?)
    }
}

use crate::pipeline::ConversionJob;
use crate::printer::BackendKind;
use serde::{Deserialize, Serialize};

/// Outcome of a single spec's conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub spec: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn ok(job: &ConversionJob, backend: BackendKind) -> Self {
        Self {
            spec: job.spec.rel.display().to_string(),
            succeeded: true,
            backend: Some(backend),
            pdf: Some(job.pdf_path.display().to_string()),
            error: None,
        }
    }

    pub fn failed(job: &ConversionJob, error: String) -> Self {
        Self {
            spec: job.spec.rel.display().to_string(),
            succeeded: false,
            backend: None,
            pdf: None,
            error: Some(error),
        }
    }
}

/// End-of-run summary, printed to stdout as pretty JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started: String,
    pub finished: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_specs: Vec<String>,
    pub results: Vec<ConversionResult>,
}

impl RunSummary {
    pub fn new(started: String, finished: String, results: Vec<ConversionResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        let failed_specs: Vec<String> = results
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.spec.clone())
            .collect();
        Self {
            started,
            finished,
            total: results.len(),
            succeeded,
            failed: failed_specs.len(),
            failed_specs,
            results,
        }
    }

    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

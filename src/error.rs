//! Error taxonomy for the conversion pipeline.
//!
//! Two failure scopes: fatal errors that abort the run before any conversion
//! (`SourceDir`, `Walk`), and per-job errors (`GeneratorMissing`, `Render`,
//! `Print`) that mark a single spec failed while the batch continues.
//! `Spawn`, `Timeout` and `Wait` describe a single subprocess invocation and
//! are folded into the per-job errors by their callers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// `--src` does not exist or is not a directory. Fatal.
    #[error("source directory does not exist or is not a directory: {path}")]
    SourceDir { path: PathBuf },

    /// Filesystem error while walking the source tree. Fatal.
    #[error("walking source directory: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    /// Neither npx nor a globally installed redoc-cli could be located.
    #[error(
        "no documentation generator found: install Node LTS (provides npx) or `npm i -g redoc-cli`"
    )]
    GeneratorMissing,

    /// The doc generator exited non-zero for one spec.
    #[error("redoc bundle failed for {spec} ({status}): {stderr}")]
    Render {
        spec: PathBuf,
        status: String,
        stderr: String,
    },

    /// Every PDF backend failed, or none was available.
    #[error("could not print {html} to PDF: {detail}")]
    Print { html: PathBuf, detail: String },

    /// A subprocess could not be started at all.
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A subprocess exceeded the per-invocation timeout.
    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    /// Unexpected I/O failure while supervising a subprocess.
    #[error("waiting for {tool}: {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

use crate::error::ConvertError;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use time::format_description::well_known::Rfc3339;
use tracing::warn;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Captured result of one finished subprocess.
pub struct CmdOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CmdOutput {
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Run a subprocess to completion, capturing stdout and stderr, killing it
/// once `timeout` elapses.
pub fn run_capture(
    cmd: &mut Command,
    tool: &str,
    timeout: Duration,
) -> Result<CmdOutput, ConvertError> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ConvertError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    wait_with_timeout(&mut child, tool, timeout)
}

fn wait_with_timeout(
    child: &mut Child,
    tool: &str,
    timeout: Duration,
) -> Result<CmdOutput, ConvertError> {
    // Drain pipes while waiting so a chatty tool can't deadlock the child
    // on a full stdout/stderr buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(|source| ConvertError::Wait {
            tool: tool.to_string(),
            source,
        })? {
            let stdout = join_reader(stdout_thread, tool)?;
            let stderr = join_reader(stderr_thread, tool)?;
            return Ok(CmdOutput {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("{tool} timed out after {:?}; killing it", timeout);
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout_thread.join();
            let _ = stderr_thread.join();
            return Err(ConvertError::Timeout {
                tool: tool.to_string(),
                secs: timeout.as_secs(),
            });
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

fn join_reader(
    handle: JoinHandle<std::io::Result<Vec<u8>>>,
    tool: &str,
) -> Result<Vec<u8>, ConvertError> {
    handle
        .join()
        .map_err(|_| ConvertError::Wait {
            tool: tool.to_string(),
            source: std::io::Error::other("reader thread panicked"),
        })?
        .map_err(|source| ConvertError::Wait {
            tool: tool.to_string(),
            source,
        })
}

/// File URI for an absolute path, as the browser's command line expects.
pub fn file_uri(path: &Path) -> String {
    let p = path.to_string_lossy().replace('\\', "/");
    if p.starts_with('/') {
        format!("file://{p}")
    } else {
        // Windows drive-letter paths need the extra slash: file:///C:/...
        format!("file:///{p}")
    }
}

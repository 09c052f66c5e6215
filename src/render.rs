use crate::error::ConvertError;
use crate::tools::ToolPaths;
use crate::util::run_capture;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Renders one spec file to a single self-contained HTML document.
pub trait HtmlRenderer {
    fn render(&self, spec: &Path, out_html: &Path) -> Result<(), ConvertError>;
}

/// How redoc-cli gets invoked: fetched on demand through npx, or as a
/// globally installed binary.
#[derive(Debug, Clone)]
pub enum DocGenerator {
    Npx(PathBuf),
    RedocCli(PathBuf),
}

pub struct RedocRenderer {
    generator: Option<DocGenerator>,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl RedocRenderer {
    /// Missing generators are not an error yet; they surface as
    /// `GeneratorMissing` once a render is actually attempted.
    pub fn new(tools: &ToolPaths, extra_args: Vec<String>, timeout: Duration) -> Self {
        let generator = tools
            .npx
            .clone()
            .map(DocGenerator::Npx)
            .or_else(|| tools.redoc_cli.clone().map(DocGenerator::RedocCli));
        Self {
            generator,
            extra_args,
            timeout,
        }
    }
}

impl HtmlRenderer for RedocRenderer {
    fn render(&self, spec: &Path, out_html: &Path) -> Result<(), ConvertError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(ConvertError::GeneratorMissing)?;
        let (exe, argv) = bundle_command(generator, spec, out_html, &self.extra_args);
        debug!("bundling {} -> {}", spec.display(), out_html.display());

        let mut cmd = Command::new(exe);
        cmd.args(&argv);
        let out = run_capture(&mut cmd, "redoc-cli", self.timeout)?;
        if !out.status.success() {
            // Leave no partial bundle behind for the printer to pick up.
            let _ = std::fs::remove_file(out_html);
            return Err(ConvertError::Render {
                spec: spec.to_path_buf(),
                status: out.status.to_string(),
                stderr: out.stderr_lossy(),
            });
        }
        Ok(())
    }
}

/// Executable plus argv for the bundle invocation. Extra args are appended
/// verbatim and unvalidated.
fn bundle_command(
    generator: &DocGenerator,
    spec: &Path,
    out_html: &Path,
    extra: &[String],
) -> (PathBuf, Vec<OsString>) {
    let mut argv: Vec<OsString> = Vec::new();
    let exe = match generator {
        DocGenerator::Npx(npx) => {
            argv.push("--yes".into());
            argv.push("redoc-cli".into());
            npx.clone()
        }
        DocGenerator::RedocCli(redoc) => redoc.clone(),
    };
    argv.push("bundle".into());
    argv.push(spec.as_os_str().to_os_string());
    argv.push("-o".into());
    argv.push(out_html.as_os_str().to_os_string());
    for a in extra {
        argv.push(a.into());
    }
    (exe, argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(argv: &[OsString]) -> Vec<String> {
        argv.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn npx_invocation_fetches_redoc_on_demand() {
        let (exe, argv) = bundle_command(
            &DocGenerator::Npx(PathBuf::from("/usr/bin/npx")),
            Path::new("api.yaml"),
            Path::new("api.html"),
            &[],
        );
        assert_eq!(exe, PathBuf::from("/usr/bin/npx"));
        let argv = strings(&argv);
        assert_eq!(argv, ["--yes", "redoc-cli", "bundle", "api.yaml", "-o", "api.html"]);
    }

    #[test]
    fn global_binary_skips_npx_prefix() {
        let (exe, argv) = bundle_command(
            &DocGenerator::RedocCli(PathBuf::from("redoc-cli")),
            Path::new("api.yaml"),
            Path::new("api.html"),
            &[],
        );
        assert_eq!(exe, PathBuf::from("redoc-cli"));
        assert_eq!(strings(&argv), ["bundle", "api.yaml", "-o", "api.html"]);
    }

    #[test]
    fn extra_args_are_appended_verbatim() {
        let extra = vec![
            "--options.theme.colors.primary.main=#f00".to_string(),
            "--title".to_string(),
        ];
        let (_, argv) = bundle_command(
            &DocGenerator::RedocCli(PathBuf::from("redoc-cli")),
            Path::new("api.yaml"),
            Path::new("api.html"),
            &extra,
        );
        let argv = strings(&argv);
        assert_eq!(&argv[argv.len() - 2..], &extra[..]);
    }
}

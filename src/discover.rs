use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A discovered input spec: the source path plus its path relative to the
/// source root, which the output tree mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFile {
    pub path: PathBuf,
    pub rel: PathBuf,
}

const SPEC_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// List the candidate spec files under `src_dir`, lexicographically ordered
/// by relative path so run logs stay reproducible.
pub fn discover(src_dir: &Path, recursive: bool) -> Result<Vec<SpecFile>, ConvertError> {
    if !src_dir.is_dir() {
        return Err(ConvertError::SourceDir {
            path: src_dir.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(src_dir).min_depth(1).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut specs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !has_spec_extension(entry.path()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        specs.push(SpecFile {
            path: entry.path().to_path_buf(),
            rel,
        });
    }

    specs.sort_by(|a, b| a.rel.cmp(&b.rel));
    debug!("discovered {} spec file(s) in {}", specs.len(), src_dir.display());
    Ok(specs)
}

fn has_spec_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SPEC_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

use openapi2pdf::discover::SpecFile;
use openapi2pdf::pipeline::plan_jobs;
use std::path::{Path, PathBuf};

fn spec(rel: &str) -> SpecFile {
    SpecFile {
        path: PathBuf::from("/src").join(rel),
        rel: PathBuf::from(rel),
    }
}

#[test]
fn pdf_paths_mirror_source_subfolders() {
    let jobs = plan_jobs(
        &[spec("api/v1/users.yaml")],
        Path::new("out"),
        Path::new("scratch"),
        false,
    );
    assert_eq!(jobs[0].pdf_path, Path::new("out/api/v1/users.pdf"));
    assert!(jobs[0].html_path.starts_with("scratch"));
}

#[test]
fn keep_html_places_html_next_to_pdf() {
    let jobs = plan_jobs(&[spec("users.yaml")], Path::new("out"), Path::new("scratch"), true);
    assert_eq!(jobs[0].html_path, Path::new("out/users.html"));
    assert_eq!(jobs[0].pdf_path, Path::new("out/users.pdf"));
}

#[test]
fn same_stem_specs_get_distinct_pdfs() {
    let jobs = plan_jobs(
        &[spec("a.yaml"), spec("a.json")],
        Path::new("out"),
        Path::new("scratch"),
        false,
    );
    assert_eq!(jobs[0].pdf_path, Path::new("out/a.pdf"));
    assert_eq!(jobs[1].pdf_path, Path::new("out/a.json.pdf"));
    assert_ne!(jobs[0].html_path, jobs[1].html_path);
}

#[test]
fn same_stem_across_folders_needs_no_disambiguation() {
    let jobs = plan_jobs(
        &[spec("v1/api.yaml"), spec("v2/api.yaml")],
        Path::new("out"),
        Path::new("scratch"),
        false,
    );
    assert_eq!(jobs[0].pdf_path, Path::new("out/v1/api.pdf"));
    assert_eq!(jobs[1].pdf_path, Path::new("out/v2/api.pdf"));
}

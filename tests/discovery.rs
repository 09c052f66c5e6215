use openapi2pdf::discover::discover;
use std::fs;
use std::path::Path;

fn touch(p: &Path) {
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(p, b"openapi: 3.0.0\n").unwrap();
}

#[test]
fn matches_spec_extensions_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.yaml"));
    touch(&dir.path().join("b.YML"));
    touch(&dir.path().join("c.Json"));
    touch(&dir.path().join("notes.txt"));
    touch(&dir.path().join("readme.md"));

    let specs = discover(dir.path(), false).unwrap();
    let names: Vec<String> = specs.iter().map(|s| s.rel.display().to_string()).collect();
    assert_eq!(names, ["a.yaml", "b.YML", "c.Json"]);
}

#[test]
fn non_recursive_skips_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("top.yaml"));
    touch(&dir.path().join("nested/inner.yaml"));

    let specs = discover(dir.path(), false).unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].rel, Path::new("top.yaml"));
}

#[test]
fn recursive_includes_subdirectories_in_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("z.yaml"));
    touch(&dir.path().join("api/v1/users.yaml"));
    touch(&dir.path().join("api/billing.json"));

    let specs = discover(dir.path(), true).unwrap();
    let names: Vec<String> = specs.iter().map(|s| s.rel.display().to_string()).collect();
    assert_eq!(names, ["api/billing.json", "api/v1/users.yaml", "z.yaml"]);
}

#[test]
fn missing_source_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(discover(&missing, false).is_err());
}

#[test]
fn file_as_source_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("api.yaml");
    touch(&file);
    assert!(discover(&file, false).is_err());
}

#[test]
fn empty_directory_yields_no_specs() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover(dir.path(), false).unwrap().is_empty());
}

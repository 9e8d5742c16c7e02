//! The validator run against this repository itself.
//!
//! The required-substring lists in `checks` are hard-coded; this test is the
//! only mechanism keeping them in sync with the actual sample files.

use std::path::PathBuf;

use demo_validator::checks;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

#[test]
fn sample_source_passes() {
    assert!(checks::validate_sample_source(&repo_root()));
}

#[test]
fn launcher_script_passes() {
    assert!(checks::validate_launcher_script(&repo_root()));
}

#[test]
fn documentation_passes() {
    assert!(checks::validate_documentation(&repo_root()));
}

#[test]
fn env_example_passes() {
    assert!(checks::validate_env_example(&repo_root()));
}

#[test]
fn whole_repository_passes() {
    assert!(checks::validate_repo(&repo_root()));
}

//! Text-presence checks for the agent sample and its companion files.
//!
//! Each check opens one fixed repo-relative file and searches it for a list
//! of literal substrings. Nothing is parsed; a check passes when every
//! required substring is present. The lists are hard-coded and can drift
//! from the actual files — the repository self-check test in
//! `tests/repo_validation.rs` is what keeps them honest.

use std::fs;
use std::path::Path;

/// The sample entry point.
pub const SAMPLE_SOURCE: &str = "crates/azure_agent_demo/src/main.rs";
/// The shell launcher script.
pub const LAUNCHER_SCRIPT: &str = "run_demo.sh";
/// The setup and authentication documentation.
pub const DOCUMENTATION: &str = "docs/AZURE_SERVICE_PRINCIPAL_DEMO.md";
/// The example environment file.
pub const ENV_EXAMPLE: &str = ".env.example";

/// The three service principal variables every target file must mention.
const SERVICE_PRINCIPAL_VARS: [&str; 3] =
    ["AZURE_CLIENT_ID", "AZURE_CLIENT_SECRET", "AZURE_TENANT_ID"];

/// Read a target file, printing a failure line if it is missing or unreadable.
fn read_target(path: &Path) -> Option<String> {
    if !path.exists() {
        println!("❌ Error: {} not found", path.display());
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            println!("❌ Error: could not read {}: {err}", path.display());
            None
        }
    }
}

fn check_env_vars(content: &str, label: &str) -> bool {
    for var in SERVICE_PRINCIPAL_VARS {
        if !content.contains(var) {
            println!("❌ Missing environment variable {label}: {var}");
            return false;
        }
    }
    true
}

/// Validate the sample entry point.
pub fn validate_sample_source(root: &Path) -> bool {
    println!("🔍 Validating {SAMPLE_SOURCE}...");

    let Some(content) = read_target(&root.join(SAMPLE_SOURCE)) else {
        return false;
    };

    let required_items = ["async fn main", "resolve_credential", "ChatAgent", "get_weather"];
    for item in required_items {
        if !content.contains(item) {
            println!("❌ Missing required item: {item}");
            return false;
        }
    }
    println!("✅ All required items are present");

    if !check_env_vars(&content, "reference") {
        return false;
    }
    println!("✅ Environment variable references are present");

    true
}

/// Validate the shell launcher script.
pub fn validate_launcher_script(root: &Path) -> bool {
    println!("🔍 Validating {LAUNCHER_SCRIPT}...");

    let path = root.join(LAUNCHER_SCRIPT);
    let Some(content) = read_target(&path) else {
        return false;
    };

    warn_if_not_executable(&path);

    if !content.starts_with("#!/bin/bash") {
        println!("❌ Missing or incorrect shebang");
        return false;
    }
    println!("✅ Shebang is correct");

    if !check_env_vars(&content, "check") {
        return false;
    }
    println!("✅ Environment variable checks are present");

    if !content.contains("az login --service-principal") {
        println!("❌ Missing az login command reference");
        return false;
    }
    println!("✅ az login command reference is present");

    if !content.contains("cargo run") {
        println!("❌ Missing cargo run command");
        return false;
    }
    println!("✅ cargo run command is present");

    true
}

/// Validate the documentation file.
pub fn validate_documentation(root: &Path) -> bool {
    println!("🔍 Validating {DOCUMENTATION}...");

    let Some(content) = read_target(&root.join(DOCUMENTATION)) else {
        return false;
    };

    let required_sections = [
        "Prerequisites",
        "Setup",
        "Running the Demo",
        "Authentication Methods",
        "Troubleshooting",
    ];
    for section in required_sections {
        if !content.contains(section) {
            println!("❌ Missing section: {section}");
            return false;
        }
    }
    println!("✅ All required sections are present");

    if !content.contains("```bash") || !content.contains("```rust") {
        println!("❌ Missing code examples");
        return false;
    }
    println!("✅ Code examples are present");

    if !check_env_vars(&content, "documentation") {
        return false;
    }
    println!("✅ Environment variables are documented");

    true
}

/// Validate the example environment file.
pub fn validate_env_example(root: &Path) -> bool {
    println!("🔍 Validating {ENV_EXAMPLE}...");

    let Some(content) = read_target(&root.join(ENV_EXAMPLE)) else {
        return false;
    };

    if !check_env_vars(&content, "entry") {
        return false;
    }
    println!("✅ All service principal variables are present");

    true
}

/// Run all four file checks, returning true only if every one passes.
///
/// Every check runs even after a failure; failures only affect the
/// aggregate result.
pub fn validate_repo(root: &Path) -> bool {
    tracing::debug!(root = %root.display(), "validating repository");

    let mut all_valid = true;
    all_valid &= validate_sample_source(root);
    println!();
    all_valid &= validate_launcher_script(root);
    println!();
    all_valid &= validate_documentation(root);
    println!();
    all_valid &= validate_env_example(root);
    all_valid
}

#[cfg(unix)]
fn warn_if_not_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) if meta.permissions().mode() & 0o111 != 0 => {
            println!("✅ Script is executable");
        }
        Ok(_) => println!("⚠️  Warning: script is not executable (chmod +x required)"),
        Err(_) => {}
    }
}

#[cfg(not(unix))]
fn warn_if_not_executable(_path: &Path) {}

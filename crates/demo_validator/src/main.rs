//! Validates the agent sample repository layout and companion files.
//!
//! Usage: `demo_validator [repo-root]` (defaults to the current directory).

use std::path::PathBuf;
use std::process::ExitCode;

use demo_validator::checks;

fn main() -> ExitCode {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("{}", "=".repeat(60));
    println!("Azure Service Principal Demo Validation");
    println!("{}", "=".repeat(60));
    println!();

    let all_valid = checks::validate_repo(&root);

    println!();
    println!("{}", "=".repeat(60));
    if all_valid {
        println!("✅ All validations passed!");
        println!("{}", "=".repeat(60));
        ExitCode::SUCCESS
    } else {
        println!("❌ Some validations failed");
        println!("{}", "=".repeat(60));
        ExitCode::from(1)
    }
}

//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Waiting is done on
//! I/O (the completion channel) or with `tokio::time::interval` ticks.
//! **Exceptions**: Test code

use architectural_enforcement::{rust_sources, violation};

fn find_sleep_violations(dir: &str) -> Vec<String> {
    let mut violations = Vec::new();
    for file in rust_sources(dir) {
        for (line_number, code) in file.code_lines() {
            if code.contains("::sleep(") || code.contains(".sleep(") {
                violations.push(violation(&file, line_number, code));
            }
        }
    }
    violations
}

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = find_sleep_violations("predictor/core/src");
    violations.extend(find_sleep_violations("predictor/cli/src"));

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");
        for v in &violations {
            eprintln!("  ❌ {v}");
        }
        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - Awaiting the completion channel");
        eprintln!("  - Frame pacing with tokio::time::interval()");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

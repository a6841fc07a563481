//! Integration Test: Core Library Boundaries
//!
//! **Policy**:
//! - The core library propagates errors; it never calls `unwrap()` or
//!   `expect()` outside tests.
//! - The core library is headless: no terminal or argument-parsing crates.
//!
//! Surfaces (the CLI) may use both.

use std::fs;

use architectural_enforcement::{rust_sources, violation, workspace_root};

const CORE_SRC: &str = "predictor/core/src";

/// Crates that belong to surfaces, not the core
const SURFACE_CRATES: [&str; 4] = ["crossterm", "clap", "ratatui", "tracing_subscriber"];

#[test]
fn test_no_unwrap_or_expect_in_core() {
    let mut violations = Vec::new();
    for file in rust_sources(CORE_SRC) {
        for (line_number, code) in file.code_lines() {
            if code.contains(".unwrap()") || code.contains(".expect(") {
                violations.push(violation(&file, line_number, code));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "\nPanicking calls in core production code:\n  {}\n",
        violations.join("\n  ")
    );
}

#[test]
fn test_core_sources_do_not_use_surface_crates() {
    let mut violations = Vec::new();
    for file in rust_sources(CORE_SRC) {
        for (line_number, code) in file.code_lines() {
            for krate in SURFACE_CRATES {
                if code.contains(&format!("{krate}::")) {
                    violations.push(violation(&file, line_number, code));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "\nSurface crates used in the core library:\n  {}\n",
        violations.join("\n  ")
    );
}

#[test]
fn test_core_manifest_has_no_surface_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("predictor/core/Cargo.toml"))
        .expect("core manifest readable");

    let dependencies = manifest
        .split("[dependencies]")
        .nth(1)
        .and_then(|rest| rest.split("\n[").next())
        .unwrap_or_default();

    for krate in ["crossterm", "clap", "ratatui", "tracing-subscriber"] {
        assert!(
            !dependencies.lines().any(|line| line.trim_start().starts_with(krate)),
            "core must not depend on {krate}"
        );
    }
}

//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code
//! - No panicking shortcuts (`unwrap`/`expect`) in the core library
//! - Separation of concerns: the core stays free of terminal and CLI crates
//!
//! The helpers here walk the workspace sources and hand back the lines that
//! count as production code.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// A source file with its production lines
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// `(line number, text)` of every line before the first `#[cfg(test)]`
    pub production: Vec<(usize, String)>,
}

impl SourceFile {
    /// Production lines with trailing `//` comments removed
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.production.iter().filter_map(|(n, line)| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("//") {
                return None;
            }
            Some((*n, line.split("//").next().unwrap_or(line)))
        })
    }
}

/// Lines before the first `#[cfg(test)]` attribute
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(idx, line)| (idx + 1, line.to_string()))
        .collect()
}

/// Every `.rs` file under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    if !base.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|entry| {
            let content = fs::read_to_string(entry.path()).ok()?;
            Some(SourceFile {
                path: entry
                    .path()
                    .strip_prefix(&root)
                    .unwrap_or(entry.path())
                    .to_path_buf(),
                production: production_lines(&content),
            })
        })
        .collect()
}

/// Format `path:line - text` for a violation report
#[must_use]
pub fn violation(file: &SourceFile, line_number: usize, text: &str) -> String {
    format!("{}:{} - {}", file.path.display(), line_number, text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let content = "fn real() {}\n\n#[cfg(test)]\nmod tests {\n    fn t() { x.unwrap(); }\n}\n";
        let lines = production_lines(content);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (1, "fn real() {}".to_string()));
    }

    #[test]
    fn test_code_lines_skip_comments() {
        let file = SourceFile {
            path: PathBuf::from("x.rs"),
            production: vec![
                (1, "// value.unwrap()".to_string()),
                (2, "let a = b; // c.unwrap()".to_string()),
            ],
        };
        let lines: Vec<_> = file.code_lines().collect();
        assert_eq!(lines, vec![(2, "let a = b; ")]);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
        assert!(!rust_sources("predictor/core/src").is_empty());
    }
}

//! Golden tests for repoflat
//!
//! These tests run against the checked-in fixture project and verify that the
//! jsonl report keeps a stable shape and order. They use --dry-run so the
//! fixture tree is never written next to.

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get the path to the sample project
fn sample_project() -> PathBuf {
    fixtures_dir().join("sample_project")
}

/// Create a dry-run jsonl command over the sample project
fn repoflat_cmd() -> Command {
    let mut cmd = Command::cargo_bin("repoflat").expect("Failed to find repoflat binary");
    cmd.arg(sample_project())
        .arg("--dry-run")
        .arg("--format")
        .arg("jsonl");
    cmd
}

/// Parse JSONL output into a vector of JSON values
fn parse_jsonl(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .collect()
}

fn run(cmd: &mut Command) -> Vec<Value> {
    let output = cmd.output().expect("failed to execute");
    assert!(output.status.success(), "repoflat should exit 0");
    parse_jsonl(&String::from_utf8_lossy(&output.stdout))
}

fn field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_filtered_walk_order() {
        let items = run(&mut repoflat_cmd());

        let rows: Vec<(&str, &str)> = items
            .iter()
            .filter(|v| field(v, "kind") != Some("summary"))
            .map(|v| (field(v, "kind").unwrap(), field(v, "path").unwrap()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("copied", "README.md"),
                ("skipped", "assets/logo.svg"),
                ("copied", "docs/guide.md"),
                ("skipped", "node_modules"),
                ("copied", "package.json"),
                ("copied", "src/app.py"),
                ("copied", "src/components/Button.jsx"),
                ("skipped", "src/main.rs"),
                ("copied", "src/utils/validation.js"),
                ("skipped", "yarn.lock"),
            ]
        );
    }

    #[test]
    fn golden_flat_names() {
        let items = run(&mut repoflat_cmd());

        let dests: Vec<&str> = items
            .iter()
            .filter(|v| field(v, "kind") == Some("copied"))
            .filter_map(|v| field(v, "dest"))
            .collect();

        assert_eq!(
            dests,
            vec![
                "README.md",
                "docs__guide.md",
                "package.json",
                "src__app.py",
                "src__components__Button.jsx",
                "src__utils__validation.js",
            ]
        );
    }

    #[test]
    fn golden_skip_reasons() {
        let items = run(&mut repoflat_cmd());

        let reasons: Vec<(&str, &str)> = items
            .iter()
            .filter(|v| field(v, "kind") == Some("skipped"))
            .map(|v| (field(v, "path").unwrap(), field(v, "reason").unwrap()))
            .collect();

        assert_eq!(
            reasons,
            vec![
                ("assets/logo.svg", "excluded_extension"),
                ("node_modules", "excluded_dir"),
                ("src/main.rs", "not_included"),
                ("yarn.lock", "excluded_name"),
            ]
        );
    }

    #[test]
    fn golden_copied_metadata() {
        let items = run(&mut repoflat_cmd());

        for item in items.iter().filter(|v| field(v, "kind") == Some("copied")) {
            let meta = item.get("meta").expect("meta required");
            assert!(meta.get("size").and_then(|s| s.as_u64()).is_some());
            let hash = meta.get("hash").and_then(|h| h.as_str()).expect("hash");
            assert_eq!(hash.len(), 16);
            assert!(meta.get("ambiguous").is_none());
        }
    }

    #[test]
    fn golden_summary_line() {
        let items = run(&mut repoflat_cmd());
        let summary = items.last().expect("summary line");

        assert_eq!(field(summary, "kind"), Some("summary"));
        assert_eq!(field(summary, "mode"), Some("filtered"));
        assert_eq!(summary.get("dry_run"), Some(&Value::Bool(true)));
        assert_eq!(summary.get("copied").and_then(|v| v.as_u64()), Some(6));
        assert_eq!(summary.get("skipped").and_then(|v| v.as_u64()), Some(4));
        assert_eq!(summary.get("failed").and_then(|v| v.as_u64()), Some(0));
        assert_eq!(summary.get("collisions").and_then(|v| v.as_u64()), Some(0));
        assert!(field(summary, "output")
            .unwrap()
            .ends_with("sample_project_flat"));
    }

    #[test]
    fn golden_include_all_adds_unlisted_extensions() {
        let items = run(repoflat_cmd().arg("--include-all"));
        let summary = items.last().expect("summary line");

        assert_eq!(field(summary, "mode"), Some("include-all"));
        assert_eq!(summary.get("copied").and_then(|v| v.as_u64()), Some(7));
        assert!(items
            .iter()
            .any(|v| field(v, "dest") == Some("src__main.rs")));
        // Excluded extensions stay excluded
        assert!(!items.iter().any(|v| {
            field(v, "kind") == Some("copied") && field(v, "path") == Some("assets/logo.svg")
        }));
    }

    #[test]
    fn golden_dry_run_leaves_no_output() {
        run(&mut repoflat_cmd());
        assert!(!fixtures_dir().join("sample_project_flat").exists());
    }
}

//! Hygiene: source-level checks run as tests.
//!
//! Scans the engine's production sources for patterns that crash the page or
//! swallow errors. Every pattern has a budget of zero.

use std::fs;
use std::path::{Path, PathBuf};

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, test siblings excluded.
fn source_files() -> Vec<SourceFile> {
    let mut paths = Vec::new();
    collect(Path::new("src"), &mut paths);
    paths
        .into_iter()
        .filter(|p| !p.to_string_lossy().ends_with("_test.rs"))
        .filter_map(|p| {
            let content = fs::read_to_string(&p).ok()?;
            Some(SourceFile { path: p.to_string_lossy().into_owned(), content })
        })
        .collect()
}

fn collect(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

/// Lines containing `pattern`, outside `//` comments.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| {
                    let code = line.split("//").next().unwrap_or_default();
                    code.contains(pattern)
                })
                .map(move |(n, line)| format!("  {}:{}: {}", file.path, n + 1, line.trim()))
        })
        .collect()
}

fn assert_absent(pattern: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");
    let found = hits(&files, pattern);
    assert!(found.is_empty(), "`{pattern}` is not allowed in production code:\n{}", found.join("\n"));
}

// Panics crash the page.

#[test]
fn no_unwrap() {
    assert_absent(".unwrap()");
}

#[test]
fn no_expect() {
    assert_absent(".expect(");
}

#[test]
fn no_panic() {
    assert_absent("panic!(");
}

#[test]
fn no_unreachable() {
    assert_absent("unreachable!(");
}

#[test]
fn no_todo() {
    assert_absent("todo!(");
}

#[test]
fn no_unimplemented() {
    assert_absent("unimplemented!(");
}

// Silent loss discards errors without inspecting them.

#[test]
fn no_silent_discard() {
    assert_absent("let _ =");
}

#[test]
fn no_dot_ok() {
    assert_absent(".ok()");
}

#[test]
fn no_allow_dead_code() {
    assert_absent("#[allow(dead_code)]");
}

/// Each `foo_test.rs` must be wired into `foo.rs`, or its tests never run.
#[test]
fn test_siblings_are_wired() {
    let mut paths = Vec::new();
    collect(Path::new("src"), &mut paths);
    let mut unwired = Vec::new();
    for path in &paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name.strip_suffix("_test.rs") else {
            continue;
        };
        let parent = path.with_file_name(format!("{stem}.rs"));
        let wired = fs::read_to_string(&parent)
            .is_ok_and(|src| src.contains(&format!("#[path = \"{name}\"]")));
        if !wired {
            unwired.push(path.display().to_string());
        }
    }
    assert!(unwired.is_empty(), "test files not included by their module:\n{}", unwired.join("\n"));
}

//! Directory traversal
//!
//! Uses walkdir for the walk itself and the ignore crate's gitignore matcher
//! when `.gitignore` rules are requested. Excluded directories are pruned
//! with `skip_current_dir`, so nothing beneath them is ever visited.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::filter::{FilterConfig, SkipReason};
use crate::core::paths::{is_within, make_relative, normalize_path};

/// One thing the walk found under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    /// A regular file, or a symlink resolving to one
    File { path: PathBuf, relative: String },
    /// A directory or file left out before file-level filtering
    Skipped { relative: String, reason: SkipReason },
    /// An entry that could not be inspected
    Unreadable { relative: String, message: String },
}

#[derive(Debug, Clone, Copy)]
pub struct WalkOptions<'a> {
    pub filter: &'a FilterConfig,
    /// Never descended into, typically the output root
    pub exclude_root: Option<&'a Path>,
    pub gitignore: bool,
}

impl<'a> WalkOptions<'a> {
    pub fn new(filter: &'a FilterConfig) -> Self {
        Self {
            filter,
            exclude_root: None,
            gitignore: false,
        }
    }

    pub fn exclude_root(mut self, path: &'a Path) -> Self {
        self.exclude_root = Some(path);
        self
    }

    pub fn gitignore(mut self, enabled: bool) -> Self {
        self.gitignore = enabled;
        self
    }
}

/// Load `<root>/.gitignore`, if present
pub fn load_gitignore(root: &Path) -> Result<Option<Gitignore>> {
    let path = root.join(".gitignore");
    if !path.is_file() {
        return Ok(None);
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(&path) {
        return Err(err).with_context(|| format!("Failed to parse {:?}", path));
    }
    let gitignore = builder
        .build()
        .with_context(|| format!("Failed to build matcher from {:?}", path))?;
    Ok(Some(gitignore))
}

/// Walk `root` in file-name order and classify every entry
pub fn walk(root: &Path, options: WalkOptions<'_>) -> Result<Vec<WalkEntry>> {
    let gitignore = if options.gitignore {
        load_gitignore(root)?
    } else {
        None
    };
    let ignored = |path: &Path, is_dir: bool| {
        gitignore
            .as_ref()
            .map(|gi| gi.matched_path_or_any_parents(path, is_dir).is_ignore())
            .unwrap_or(false)
    };

    let mut entries = Vec::new();
    let mut it = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let relative = err
                    .path()
                    .and_then(|p| make_relative(p, root))
                    .unwrap_or_default();
                entries.push(WalkEntry::Unreadable {
                    relative,
                    message: err.to_string(),
                });
                continue;
            }
        };

        // Skip the root itself
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        let relative = match make_relative(path, root) {
            Some(r) => r,
            None => normalize_path(path),
        };

        if entry.file_type().is_dir() {
            if options.exclude_root.is_some_and(|out| is_within(path, out)) {
                it.skip_current_dir();
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let reason = if options.filter.should_skip_directory(&name) {
                Some(SkipReason::ExcludedDir)
            } else if ignored(path, true) {
                Some(SkipReason::Gitignored)
            } else {
                None
            };

            if let Some(reason) = reason {
                it.skip_current_dir();
                entries.push(WalkEntry::Skipped { relative, reason });
            }
            continue;
        }

        // Symlinks are never walked into; a link to a file is treated as that file
        if entry.path_is_symlink() {
            match std::fs::metadata(path) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {}
                Err(err) => {
                    entries.push(WalkEntry::Unreadable {
                        relative,
                        message: format!("broken symlink: {}", err),
                    });
                    continue;
                }
            }
        }

        if ignored(path, false) {
            entries.push(WalkEntry::Skipped {
                relative,
                reason: SkipReason::Gitignored,
            });
            continue;
        }

        entries.push(WalkEntry::File {
            path: path.to_path_buf(),
            relative,
        });
    }

    Ok(entries)
}

//! Flatten flow - Copy a directory tree into one flat directory
//!
//! Combines the walk, the filter configuration and the path encoding into a
//! single pass. Every retained file is copied exactly once, under a name that
//! encodes its path relative to the source root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::backends::copy::{
    copy_file, is_marked, mark_output_root, prepare_output_root, CopyError,
};
use crate::backends::walk::{walk, WalkEntry, WalkOptions};
use crate::core::console::Console;
use crate::core::error::FlattenError;
use crate::core::filter::{FilterConfig, Mode};
use crate::core::model::{FlatItem, FlatReport, ItemError, Meta};
use crate::core::paths::{
    absolutize, canonicalize_lenient, decodes_unambiguously, default_output_root, encode_path,
    is_within, normalize_path, validate_join_token, with_counter, DEFAULT_JOIN_TOKEN,
};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{get_file_size, hash_file};

/// What to do when two paths flatten to the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the first file, report the others
    #[default]
    Skip,
    /// Give later files a `~N` suffix
    Rename,
    /// Abort the run
    Fail,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(CollisionPolicy::Skip),
            "rename" => Ok(CollisionPolicy::Rename),
            "fail" | "error" => Ok(CollisionPolicy::Fail),
            _ => Err(format!("Unknown collision policy: {}", s)),
        }
    }
}

/// Options for a flatten run
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    pub mode: Mode,
    pub filter: FilterConfig,
    pub join_token: String,
    /// Overrides the `<source>_flat` sibling
    pub output: Option<PathBuf>,
    pub on_collision: CollisionPolicy,
    pub gitignore: bool,
    /// Empty the output root before copying
    pub clean: bool,
    pub dry_run: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            filter: FilterConfig::default(),
            join_token: DEFAULT_JOIN_TOKEN.to_string(),
            output: None,
            on_collision: CollisionPolicy::default(),
            gitignore: false,
            clean: true,
            dry_run: false,
        }
    }
}

pub struct Flattener {
    options: FlattenOptions,
    console: Console,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self {
            options,
            console: Console::default(),
        }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Canonical source directory, or why it cannot be flattened
    pub fn resolve_source(source: &Path) -> Result<PathBuf, FlattenError> {
        if !source.exists() {
            return Err(FlattenError::SourceMissing(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(FlattenError::SourceNotDirectory(source.to_path_buf()));
        }
        source
            .canonicalize()
            .map_err(|_| FlattenError::SourceMissing(source.to_path_buf()))
    }

    /// Where the flat copies go for a canonical `source`
    pub fn output_root(&self, source: &Path) -> Result<PathBuf> {
        let output = match &self.options.output {
            Some(out) => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                canonicalize_lenient(&absolutize(out, &cwd))
            }
            None => default_output_root(source)?,
        };

        // An existing directory inside the source holds source files unless a
        // previous run marked it as output
        let nested_in_use = is_within(&output, source) && output.exists() && !is_marked(&output);
        if is_within(source, &output) || nested_in_use {
            return Err(FlattenError::OutputOverlapsSource {
                output,
                root: source.to_path_buf(),
            }
            .into());
        }

        Ok(output)
    }

    /// Flatten `source` and return what happened to every walked entry
    pub fn run(&self, source: &Path) -> Result<FlatReport> {
        let opts = &self.options;
        validate_join_token(&opts.join_token)?;

        let source = Self::resolve_source(source)?;
        let output = self.output_root(&source)?;

        let mut report =
            FlatReport::new(normalize_path(&source), normalize_path(&output), opts.mode);
        report.dry_run = opts.dry_run;

        self.console.debug(format!(
            "flattening {} into {} ({:?} mode)",
            source.display(),
            output.display(),
            opts.mode
        ));

        if opts.dry_run {
            self.console
                .info(format!("Dry run: nothing will be written to {}", output.display()));
        } else {
            prepare_output_root(&output, opts.clean)?;
            if is_within(&output, &source) {
                mark_output_root(&output)?;
            }
        }

        let walk_options = WalkOptions::new(&opts.filter)
            .exclude_root(&output)
            .gitignore(opts.gitignore);
        let entries = walk(&source, walk_options)?;

        // flat name -> relative path that claimed it
        let mut taken: HashMap<String, String> = HashMap::new();

        for entry in entries {
            match entry {
                WalkEntry::Skipped { relative, reason } => {
                    self.console
                        .debug(format!("skipped {} ({})", relative, reason.as_str()));
                    report.push(FlatItem::skipped(relative, reason));
                }
                WalkEntry::Unreadable { relative, message } => {
                    self.console
                        .warn(format!("Error reading {}: {}", relative, message));
                    report.push(FlatItem::failed(
                        relative,
                        ItemError::new("UNREADABLE_FILE", message),
                    ));
                }
                WalkEntry::File { path, relative } => {
                    if let Some(reason) = opts.filter.skip_reason_for_path(&path, opts.mode) {
                        report.push(FlatItem::skipped(relative, reason));
                        continue;
                    }

                    let Some(name) = self.claim_name(&relative, &taken, &mut report)? else {
                        continue;
                    };

                    let item = if opts.dry_run {
                        self.inspect(&path, &relative, &name)
                    } else {
                        self.copy(&path, &relative, &name, &output)?
                    };

                    if item.dest.is_some() {
                        taken.insert(name, relative);
                    }
                    report.push(item);
                }
            }
        }

        Ok(report)
    }

    /// Pick the flat name for `relative`, applying the collision policy.
    /// `None` means the file is dropped and already reported.
    fn claim_name(
        &self,
        relative: &str,
        taken: &HashMap<String, String>,
        report: &mut FlatReport,
    ) -> Result<Option<String>> {
        let name = encode_path(relative, &self.options.join_token);

        let Some(first) = taken.get(&name) else {
            return Ok(Some(name));
        };

        match self.options.on_collision {
            CollisionPolicy::Skip => {
                self.console.warn(format!(
                    "Duplicate file name detected: {} (flattens to {}, already used by {})",
                    relative, name, first
                ));
                report.push(FlatItem::collision(relative, name.as_str(), first));
                Ok(None)
            }
            CollisionPolicy::Rename => {
                let renamed = (2..)
                    .map(|n| with_counter(&name, n, &self.options.join_token))
                    .find(|candidate| !taken.contains_key(candidate))
                    .unwrap_or_else(|| name.clone());
                self.console.warn(format!(
                    "Duplicate file name detected: {} renamed to {} ({} already used by {})",
                    relative, renamed, name, first
                ));
                Ok(Some(renamed))
            }
            CollisionPolicy::Fail => Err(FlattenError::Collision {
                name,
                first: first.clone(),
                second: relative.to_string(),
            }
            .into()),
        }
    }

    fn copy(&self, path: &Path, relative: &str, name: &str, output: &Path) -> Result<FlatItem> {
        let dest = output.join(name);

        match copy_file(path, &dest) {
            Ok(copied) => {
                let meta = Meta {
                    size: Some(copied.size),
                    hash: Some(copied.hash),
                    ambiguous: self.is_ambiguous(relative),
                };
                Ok(FlatItem::copied(relative, name).with_meta(meta))
            }
            Err(CopyError::Read(err)) => {
                self.console
                    .warn(format!("Error copying {}: {}", relative, err));
                Ok(FlatItem::failed(
                    relative,
                    ItemError::new("UNREADABLE_FILE", err.to_string()),
                ))
            }
            Err(CopyError::Write(err)) => Err(FlattenError::output_write(dest, err).into()),
        }
    }

    /// Dry-run counterpart of [`copy`](Self::copy): read, but never write
    fn inspect(&self, path: &Path, relative: &str, name: &str) -> FlatItem {
        match (get_file_size(path), hash_file(path)) {
            (Ok(size), Ok(hash)) => {
                let meta = Meta {
                    size: Some(size),
                    hash: Some(hash),
                    ambiguous: self.is_ambiguous(relative),
                };
                FlatItem::copied(relative, name).with_meta(meta)
            }
            (Err(err), _) | (_, Err(err)) => {
                self.console
                    .warn(format!("Error reading {}: {}", relative, err));
                FlatItem::failed(relative, ItemError::new("UNREADABLE_FILE", err.to_string()))
            }
        }
    }

    fn is_ambiguous(&self, relative: &str) -> bool {
        let ambiguous = !decodes_unambiguously(relative, &self.options.join_token);
        if ambiguous {
            self.console.debug(format!(
                "{} contains {:?}; its flat name does not decode back to it",
                relative, self.options.join_token
            ));
        }
        ambiguous
    }
}

/// Run the flatten command
pub fn run_flatten(
    source: &Path,
    options: FlattenOptions,
    console: Console,
    config: RenderConfig,
) -> Result<()> {
    let report = Flattener::new(options).with_console(console).run(source)?;

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&report));

    Ok(())
}

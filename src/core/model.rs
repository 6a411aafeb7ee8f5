//! Flatten result model
//!
//! Every file the walk touches maps to one `FlatItem`; a run produces a
//! `FlatReport` that the renderer turns into text, jsonl, json or markdown.

use serde::Serialize;

use crate::core::filter::{Mode, SkipReason};

/// What happened to a walked entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Copied,
    Skipped,
    Collision,
    Failed,
}

/// Metadata for a copied file
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// XXH3 content hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// The flat name does not decode back to exactly this path
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ambiguous: bool,
}

/// Error information attached to an item
#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatItem {
    pub kind: Kind,

    /// Path relative to the source root, using '/' as separator
    pub path: String,

    /// Flat file name inside the output root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl FlatItem {
    pub fn copied(path: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            kind: Kind::Copied,
            path: path.into(),
            dest: Some(dest.into()),
            reason: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    pub fn skipped(path: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            kind: Kind::Skipped,
            path: path.into(),
            dest: None,
            reason: Some(reason),
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// `dest` is the name already taken by `first`
    pub fn collision(path: impl Into<String>, dest: impl Into<String>, first: &str) -> Self {
        let path = path.into();
        let dest = dest.into();
        let message = format!("{} flattens to {}, already used by {}", path, dest, first);
        Self {
            kind: Kind::Collision,
            path,
            dest: Some(dest),
            reason: None,
            meta: Meta::default(),
            errors: vec![ItemError::new("COLLISION", message)],
        }
    }

    pub fn failed(path: impl Into<String>, error: ItemError) -> Self {
        Self {
            kind: Kind::Failed,
            path: path.into(),
            dest: None,
            reason: None,
            meta: Meta::default(),
            errors: vec![error],
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// Per-kind counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub collisions: usize,
}

/// Outcome of one flatten run
#[derive(Debug, Clone, Serialize)]
pub struct FlatReport {
    pub source: String,
    pub output: String,
    pub mode: Mode,
    pub dry_run: bool,
    pub items: Vec<FlatItem>,
}

impl FlatReport {
    pub fn new(source: impl Into<String>, output: impl Into<String>, mode: Mode) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            mode,
            dry_run: false,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: FlatItem) {
        self.items.push(item);
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            match item.kind {
                Kind::Copied => summary.copied += 1,
                Kind::Skipped => summary.skipped += 1,
                Kind::Failed => summary.failed += 1,
                Kind::Collision => summary.collisions += 1,
            }
        }
        summary
    }

    /// Items of one kind, in walk order
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &FlatItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    /// Last component of the output root, for messages
    pub fn output_name(&self) -> &str {
        self.output
            .rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .unwrap_or(&self.output)
    }
}

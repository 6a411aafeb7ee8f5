//! Filter configuration
//!
//! Four name/extension sets decide what gets flattened. Exclusions always win
//! over the inclusion allowlist.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    "dist",
    "build",
    "data",
];

const EXCLUDED_FILES: &[&str] = &[
    ".gitignore",
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "uv.lock",
    "__init__.py",
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.test",
    ".env.staging",
];

const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pyc", ".pyo", // Python bytecode
    ".jpg", ".jpeg", ".png", ".gif", ".ico", ".svg", // Images
    ".pdf", ".lock", ".log", // Binary and lock files
    ".map", // Source maps
];

const INCLUDED_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", // Source code
    ".json", ".yaml", ".yml", ".toml", // Config
    ".md", ".txt", ".rst", // Docs
];

/// Whether the included-extensions allowlist applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Filtered,
    IncludeAll,
}

impl Mode {
    pub fn from_include_all(include_all: bool) -> Self {
        if include_all {
            Mode::IncludeAll
        } else {
            Mode::Filtered
        }
    }
}

/// Why a file was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ExcludedDir,
    ExcludedName,
    ExcludedExtension,
    NotIncluded,
    Gitignored,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ExcludedDir => "excluded directory",
            SkipReason::ExcludedName => "excluded file name",
            SkipReason::ExcludedExtension => "excluded extension",
            SkipReason::NotIncluded => "extension not included",
            SkipReason::Gitignored => "ignored by .gitignore",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub excluded_dirs: BTreeSet<String>,
    pub excluded_files: BTreeSet<String>,
    pub excluded_extensions: BTreeSet<String>,
    pub included_extensions: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            excluded_files: EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            excluded_extensions: EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| normalize_extension(s))
                .collect(),
            included_extensions: INCLUDED_EXTENSIONS
                .iter()
                .map(|s| normalize_extension(s))
                .collect(),
        }
    }
}

impl FilterConfig {
    /// A configuration with all four sets empty
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            excluded_dirs: BTreeSet::new(),
            excluded_files: BTreeSet::new(),
            excluded_extensions: BTreeSet::new(),
            included_extensions: BTreeSet::new(),
        }
    }

    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_files.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_extensions
            .extend(exts.into_iter().map(|e| normalize_extension(e.as_ref())));
        self
    }

    pub fn include_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.included_extensions
            .extend(exts.into_iter().map(|e| normalize_extension(e.as_ref())));
        self
    }

    /// True iff the directory name prunes its whole subtree
    pub fn should_skip_directory(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// True iff the file must not be copied
    pub fn should_skip_file(&self, name: &str, extension: &str, mode: Mode) -> bool {
        self.skip_reason(name, extension, mode).is_some()
    }

    /// Which rule, if any, excludes the file. `extension` is matched
    /// case-insensitively, with or without its leading dot.
    pub fn skip_reason(&self, name: &str, extension: &str, mode: Mode) -> Option<SkipReason> {
        if self.excluded_files.contains(name) {
            return Some(SkipReason::ExcludedName);
        }

        let ext = normalize_extension(extension);
        if !ext.is_empty() && self.excluded_extensions.contains(&ext) {
            return Some(SkipReason::ExcludedExtension);
        }

        if mode == Mode::Filtered && !self.included_extensions.contains(&ext) {
            return Some(SkipReason::NotIncluded);
        }

        None
    }

    /// [`should_skip_file`](Self::should_skip_file) for a path, with the
    /// rule that fired
    pub fn skip_reason_for_path(&self, path: &Path, mode: Mode) -> Option<SkipReason> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let extension = extension_of(path);
        if !self.should_skip_file(&name, &extension, mode) {
            return None;
        }
        self.skip_reason(&name, &extension, mode)
    }
}

/// Lower-case extension with leading dot, or empty when there is none.
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// `RS`, `rs` and `.rs` all become `.rs`
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() {
        return String::new();
    }
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let config = FilterConfig::default();
        assert!(config.excluded_dirs.contains("node_modules"));
        assert!(config.excluded_files.contains("yarn.lock"));
        assert!(config.excluded_extensions.contains(".png"));
        assert!(config.included_extensions.contains(".py"));
        assert_eq!(config.included_extensions.len(), 12);
    }

    #[test]
    fn test_should_skip_directory() {
        let config = FilterConfig::default();
        assert!(config.should_skip_directory("node_modules"));
        assert!(config.should_skip_directory(".git"));
        assert!(!config.should_skip_directory("src"));
        // Exact name match only
        assert!(!config.should_skip_directory("node_modules_backup"));
    }

    #[test]
    fn test_filtered_mode_uses_allowlist() {
        let config = FilterConfig::default();
        assert!(!config.should_skip_file("main.py", ".py", Mode::Filtered));
        assert!(config.should_skip_file("main.rs", ".rs", Mode::Filtered));
        assert!(!config.should_skip_file("main.rs", ".rs", Mode::IncludeAll));
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let config = FilterConfig::default().include_extensions([".png"]);
        assert_eq!(
            config.skip_reason("logo.png", ".png", Mode::Filtered),
            Some(SkipReason::ExcludedExtension)
        );
        assert_eq!(
            config.skip_reason("logo.png", ".png", Mode::IncludeAll),
            Some(SkipReason::ExcludedExtension)
        );
        // package-lock.json has an included extension but an excluded name
        assert_eq!(
            config.skip_reason("package-lock.json", ".json", Mode::Filtered),
            Some(SkipReason::ExcludedName)
        );
    }

    #[test]
    fn test_extension_case_insensitive() {
        let config = FilterConfig::default();
        assert!(config.should_skip_file("PHOTO.JPG", ".JPG", Mode::IncludeAll));
        assert!(!config.should_skip_file("README.MD", "MD", Mode::Filtered));
    }

    #[test]
    fn test_no_extension() {
        let config = FilterConfig::default();
        assert_eq!(
            config.skip_reason("Makefile", "", Mode::Filtered),
            Some(SkipReason::NotIncluded)
        );
        assert_eq!(config.skip_reason("Makefile", "", Mode::IncludeAll), None);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("src/App.TSX")), ".tsx");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new(".env")), "");
        assert_eq!(extension_of(Path::new("Makefile")), "");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("RS"), ".rs");
        assert_eq!(normalize_extension(".Rs"), ".rs");
        assert_eq!(normalize_extension(" "), "");
    }

    #[test]
    fn test_builder_overrides() {
        let config = FilterConfig::empty()
            .exclude_dirs(["target"])
            .exclude_files(["Cargo.lock"])
            .exclude_extensions(["bin"])
            .include_extensions(["rs"]);

        assert!(config.should_skip_directory("target"));
        assert!(config.should_skip_file("Cargo.lock", ".lock", Mode::IncludeAll));
        assert!(config.should_skip_file("blob.bin", ".bin", Mode::IncludeAll));
        assert!(!config.should_skip_file("lib.rs", ".rs", Mode::Filtered));
    }

    #[test]
    fn test_path_and_name_checks_agree() {
        let config = FilterConfig::default();
        for path in ["a/.env", "b/logo.PNG", "c/app.tsx", "d/Makefile", "e/lib.rs"] {
            let path = Path::new(path);
            let name = path.file_name().unwrap().to_string_lossy();
            for mode in [Mode::Filtered, Mode::IncludeAll] {
                assert_eq!(
                    config.skip_reason_for_path(path, mode).is_some(),
                    config.should_skip_file(&name, &extension_of(path), mode),
                    "{} in {:?}",
                    path.display(),
                    mode
                );
            }
        }
    }

    #[test]
    fn test_skip_reason_for_path() {
        let config = FilterConfig::default();
        assert_eq!(
            config.skip_reason_for_path(Path::new("a/b/.DS_Store"), Mode::IncludeAll),
            Some(SkipReason::ExcludedName)
        );
        assert_eq!(
            config.skip_reason_for_path(Path::new("a/b/c.ts"), Mode::Filtered),
            None
        );
    }
}

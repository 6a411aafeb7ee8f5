//! CLI module - Command-line interface definition and handler

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::console::{Console, Verbosity};
use crate::core::filter::{FilterConfig, Mode};
use crate::core::paths::DEFAULT_JOIN_TOKEN;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::flows::flatten::{run_flatten, FlattenOptions};

/// repoflat - flatten a directory tree into one directory of path-encoded files.
#[derive(Parser, Debug)]
#[command(name = "repoflat")]
#[command(
    author,
    version,
    about,
    long_about = r#"repoflat copies every retained file under SOURCE into a sibling directory
named <SOURCE>_flat. Each copy is named after its path relative to SOURCE, with
path separators replaced by a join token (default "__"):

    my-app/src/components/Button.jsx  ->  my-app_flat/src__components__Button.jsx

This is useful for tools that only accept a flat list of files (LLM uploads,
chat attachments) while keeping the original layout readable.

By default only common source, config and documentation extensions are copied.
Dependency and build directories (node_modules, .git, dist, ...), lock files,
images and other binary artefacts are always skipped.

Examples:
    repoflat
    repoflat path/to/project --include-all
    repoflat . --exclude-dir target --include-ext rs,go
    repoflat . --dry-run --format jsonl
"#
)]
pub struct Cli {
    /// Source directory to flatten.
    #[arg(
        value_name = "SOURCE",
        default_value = ".",
        long_help = "Source directory to flatten (defaults to the current directory).\n\n\
The directory must exist. Output goes to a sibling directory named <SOURCE>_flat\n\
unless --output is given."
    )]
    pub source: PathBuf,

    /// Include all file extensions except those explicitly excluded.
    #[arg(
        long,
        long_help = "Bypass the included-extensions allowlist.\n\n\
Excluded directories, file names and extensions are still honored: an excluded\n\
extension is never copied, even with --include-all."
    )]
    pub include_all: bool,

    /// Output directory (default: <SOURCE>_flat next to SOURCE).
    #[arg(
        short,
        long,
        value_name = "DIR",
        long_help = "Write flat copies to DIR instead of <SOURCE>_flat.\n\n\
DIR may live inside SOURCE; it is never walked. DIR must not be SOURCE or one of\n\
its ancestors, and an existing directory inside SOURCE is only reused when an\n\
earlier run created it (it then holds a .repoflat marker file)."
    )]
    pub output: Option<PathBuf>,

    /// Token substituted for path separators.
    #[arg(
        long,
        value_name = "TOKEN",
        default_value = DEFAULT_JOIN_TOKEN,
        env = "REPOFLAT_JOIN_TOKEN",
        long_help = "Token substituted for path separators in flat file names.\n\n\
Must be non-empty and must not contain '/' or '\\'."
    )]
    pub join_token: String,

    /// Additional directory names to prune (comma-separated or repeated).
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub exclude_dir: Vec<String>,

    /// Additional file names to skip (comma-separated or repeated).
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub exclude_file: Vec<String>,

    /// Additional extensions to skip, e.g. "bin" or ".bin".
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Additional extensions to copy in filtered mode, e.g. "rs".
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub include_ext: Vec<String>,

    /// What to do when two paths flatten to the same name (skip/rename/fail).
    #[arg(
        long,
        value_name = "POLICY",
        default_value = "skip",
        value_parser = ["skip", "rename", "fail"],
        long_help = "What to do when two different paths flatten to the same file name,\n\
e.g. a/b.txt and a__b.txt.\n\n\
Supported values:\n\
- skip (default): keep the first file in walk order, report the others\n\
- rename: give later files a ~N suffix before the extension\n\
- fail: abort with a non-zero exit status"
    )]
    pub on_collision: String,

    /// Also skip paths ignored by SOURCE/.gitignore.
    #[arg(long)]
    pub gitignore: bool,

    /// Keep existing files in the output directory.
    #[arg(
        long,
        long_help = "Do not empty the output directory before copying.\n\n\
By default the output directory is cleared so repeated runs produce identical output."
    )]
    pub no_clean: bool,

    /// Show what would be copied without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (text/jsonl/json/md).
    #[arg(
        long,
        default_value = "text",
        value_name = "FORMAT",
        value_parser = ["text", "jsonl", "json", "md", "markdown"],
        long_help = "Select the report format printed to stdout.\n\n\
Supported values:\n\
- text (default): one 'Copied: <path>' line per file and a summary\n\
- jsonl: one JSON object per walked entry, then a summary object\n\
- json: a single JSON document\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Quiet mode (summary only).
    #[arg(
        short,
        long,
        long_help = "Only print the summary in text mode. Warnings are still written to stderr,\n\
and structured formats are unaffected."
    )]
    pub quiet: bool,

    /// Verbose mode (list skipped files, more diagnostics).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    pub fn console(&self) -> Console {
        Console::new(Verbosity::from_flags(self.quiet, self.verbose), self.no_color)
    }

    /// Default filter sets extended with the command-line additions
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::default()
            .exclude_dirs(self.exclude_dir.iter().cloned())
            .exclude_files(self.exclude_file.iter().cloned())
            .exclude_extensions(&self.exclude_ext)
            .include_extensions(&self.include_ext)
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            mode: Mode::from_include_all(self.include_all),
            filter: self.filter_config(),
            join_token: self.join_token.clone(),
            output: self.output.clone(),
            on_collision: self.on_collision.parse().unwrap_or_default(),
            gitignore: self.gitignore,
            clean: !self.no_clean,
            dry_run: self.dry_run,
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli, console: Console) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::new(format)
        .with_pretty(cli.pretty)
        .with_verbosity(console.verbosity());

    let options = cli.flatten_options();
    run_flatten(&cli.source, options, console, render_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::flatten::CollisionPolicy;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["repoflat"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("."));
        assert_eq!(cli.join_token, "__");

        let options = cli.flatten_options();
        assert_eq!(options.mode, Mode::Filtered);
        assert_eq!(options.on_collision, CollisionPolicy::Skip);
        assert!(options.clean);
        assert!(!options.dry_run);
        assert_eq!(options.filter, FilterConfig::default());
    }

    #[test]
    fn test_filter_overrides() {
        let cli = Cli::try_parse_from([
            "repoflat",
            "proj",
            "--include-all",
            "--exclude-dir",
            "target,out",
            "--exclude-ext",
            "BIN",
            "--include-ext",
            "rs",
            "--on-collision",
            "rename",
        ])
        .unwrap();

        let options = cli.flatten_options();
        assert_eq!(options.mode, Mode::IncludeAll);
        assert_eq!(options.on_collision, CollisionPolicy::Rename);
        assert!(options.filter.should_skip_directory("target"));
        assert!(options.filter.should_skip_directory("out"));
        assert!(options.filter.excluded_extensions.contains(".bin"));
        assert!(options.filter.included_extensions.contains(".rs"));
        // Defaults are kept
        assert!(options.filter.should_skip_directory("node_modules"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["repoflat", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["repoflat", "--on-collision", "overwrite"]).is_err());
    }
}

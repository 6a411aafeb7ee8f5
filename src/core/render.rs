//! Renderer module
//!
//! Renders a FlatReport to different output formats: text, jsonl, json, md

use serde::Serialize;
use serde_json::json;

use crate::core::console::Verbosity;
use crate::core::model::{FlatItem, FlatReport, Kind, Summary};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub verbosity: Verbosity,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a FlatReport,
    summary: Summary,
}

/// Renderer for flatten reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report to a string
    pub fn render(&self, report: &FlatReport) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(report),
            OutputFormat::Jsonl => self.render_jsonl(report),
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Markdown => self.render_markdown(report),
        }
    }

    fn verbose(&self) -> bool {
        self.config.verbosity >= Verbosity::Verbose
    }

    /// Human-readable progress lines followed by a summary
    fn render_text(&self, report: &FlatReport) -> String {
        let mut output = String::new();

        if self.config.verbosity > Verbosity::Quiet {
            for item in &report.items {
                match item.kind {
                    Kind::Copied => {
                        let verb = if report.dry_run { "Would copy" } else { "Copied" };
                        output.push_str(&format!("{}: {}", verb, item.path));
                        if self.verbose() || report.dry_run {
                            if let Some(dest) = &item.dest {
                                output.push_str(&format!(" -> {}", dest));
                            }
                        }
                        output.push('\n');
                    }
                    Kind::Skipped if self.verbose() => {
                        let reason = item.reason.map(|r| r.as_str()).unwrap_or("skipped");
                        output.push_str(&format!("Skipped: {} ({})\n", item.path, reason));
                    }
                    // Collisions and failures are reported on stderr as they happen
                    _ => {}
                }
            }
            output.push('\n');
        }

        let summary = report.summary();
        if report.dry_run {
            output.push_str(&format!(
                "Dry run: {} files would be flattened into '{}'\n",
                summary.copied,
                report.output_name()
            ));
        } else {
            output.push_str(&format!(
                "Repository flattened successfully in '{}'\n",
                report.output_name()
            ));
        }
        output.push_str(&format!(
            "Copied: {}, skipped: {}, failed: {}, collisions: {}",
            summary.copied, summary.skipped, summary.failed, summary.collisions
        ));

        output
    }

    /// Render as JSON Lines: one object per item, then a summary object
    fn render_jsonl(&self, report: &FlatReport) -> String {
        let summary = report.summary();
        let summary_line = json!({
            "kind": "summary",
            "source": report.source,
            "output": report.output,
            "mode": report.mode,
            "dry_run": report.dry_run,
            "copied": summary.copied,
            "skipped": summary.skipped,
            "failed": summary.failed,
            "collisions": summary.collisions,
        });

        let mut lines: Vec<String> = report
            .items
            .iter()
            .filter_map(|item| self.to_json(item))
            .collect();
        lines.extend(self.to_json(&summary_line));

        lines.join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON document
    fn render_json(&self, report: &FlatReport) -> String {
        let doc = JsonReport {
            report,
            summary: report.summary(),
        };
        self.to_json(&doc).unwrap_or_else(|| "{}".to_string())
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Option<String> {
        if self.config.pretty {
            serde_json::to_string_pretty(value).ok()
        } else {
            serde_json::to_string(value).ok()
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, report: &FlatReport) -> String {
        let mut output = String::new();
        let summary = report.summary();

        output.push_str(&format!("# Flattened `{}`\n\n", report.source));
        output.push_str(&format!("- Output: `{}`\n", report.output));
        if report.dry_run {
            output.push_str("- Dry run: nothing was written\n");
        }
        output.push_str(&format!(
            "- Copied: {}, skipped: {}, failed: {}, collisions: {}\n\n",
            summary.copied, summary.skipped, summary.failed, summary.collisions
        ));

        let failures: Vec<&FlatItem> = report
            .items
            .iter()
            .filter(|item| matches!(item.kind, Kind::Failed | Kind::Collision))
            .collect();
        if !failures.is_empty() {
            output.push_str("## Errors\n\n");
            for item in failures {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        let mut copied = report.of_kind(Kind::Copied).peekable();
        if copied.peek().is_some() {
            output.push_str("## Files\n\n");
            for item in copied {
                output.push_str(&format!("- `{}`", item.path));
                if let Some(dest) = &item.dest {
                    output.push_str(&format!(" → `{}`", dest));
                }
                if let Some(size) = item.meta.size {
                    output.push_str(&format!(" ({} bytes)", size));
                }
                if item.meta.ambiguous {
                    output.push_str(" ⚠️ ambiguous name");
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if self.verbose() {
            let mut skipped = report.of_kind(Kind::Skipped).peekable();
            if skipped.peek().is_some() {
                output.push_str("## Skipped\n\n");
                for item in skipped {
                    let reason = item.reason.map(|r| r.as_str()).unwrap_or("skipped");
                    output.push_str(&format!("- `{}`: {}\n", item.path, reason));
                }
                output.push('\n');
            }
        }

        output
    }
}

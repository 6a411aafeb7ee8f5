//! Diagnostics on stderr
//!
//! Results go to stdout through the renderer; everything here is for the
//! person watching the run.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// `--verbose` wins when both flags are given
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    pub fn new(verbosity: Verbosity, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Progress notes, hidden by `--quiet`
    pub fn info(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{}", message.as_ref());
        }
    }

    /// Only shown with `--verbose`
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.is_verbose() {
            eprintln!("{} {}", "debug:".dimmed(), message.as_ref());
        }
    }

    /// Recoverable problems. Always shown.
    pub fn warn(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", "Warning:".yellow().bold(), message.as_ref());
    }

    /// Fatal problems. Always shown.
    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", "Error:".red().bold(), message.as_ref());
    }
}

use crate::error::{Error, Result};
use crate::rules::{CombineMode, Rule, RuleSet};
use crate::utils;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rulesweep",
    about = "A rule-driven file cleanup tool — scan and remove files matching filters",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Preview files matching the filter rules (dry-run, no deletion)
    Scan {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Delete files matching the filter rules (requires --confirm)
    Clean {
        #[command(flatten)]
        filter: FilterArgs,

        /// Actually delete files. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Remove directories left empty after deletion
        #[arg(long)]
        prune_empty: bool,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// Root path to scan (defaults to the home directory)
    #[arg(long)]
    pub path: Option<String>,

    /// Extensions to match, comma-separated (e.g. "tmp,log,bak")
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Minimum file size (e.g. "10MB", "512KB")
    #[arg(long)]
    pub min_size: Option<String>,

    /// Maximum file size (e.g. "1GB")
    #[arg(long)]
    pub max_size: Option<String>,

    /// Only files last modified at least this long ago (e.g. "30d", "48h")
    #[arg(long)]
    pub older_than: Option<String>,

    /// Only files last modified less than this long ago
    #[arg(long)]
    pub newer_than: Option<String>,

    /// Glob the path relative to the root must match (repeatable)
    #[arg(long)]
    pub pattern: Vec<String>,

    /// Glob for paths to exclude unconditionally (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Match files satisfying any rule instead of all rules
    #[arg(long)]
    pub match_any: bool,

    /// Maximum directory depth to walk
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl FilterArgs {
    /// Build the rule set from the parsed flags. Fails fast on any
    /// malformed size, duration, or glob, and when no positive filter
    /// was given at all.
    pub fn to_rule_set(&self) -> Result<RuleSet> {
        let mode = if self.match_any {
            CombineMode::Any
        } else {
            CombineMode::All
        };
        let mut set = RuleSet::new(mode);

        if !self.ext.is_empty() {
            set.push(Rule::extensions(&self.ext)?);
        }
        if let Some(s) = &self.min_size {
            set.push(Rule::min_size(utils::parse_size(s)?));
        }
        if let Some(s) = &self.max_size {
            set.push(Rule::max_size(utils::parse_size(s)?));
        }
        if let Some(s) = &self.older_than {
            set.push(Rule::older_than(utils::parse_duration(s)?));
        }
        if let Some(s) = &self.newer_than {
            set.push(Rule::newer_than(utils::parse_duration(s)?));
        }
        for pattern in &self.pattern {
            set.push(Rule::path_pattern(pattern)?);
        }
        for pattern in &self.exclude {
            set.push(Rule::exclude_path(pattern)?);
        }

        if set.is_empty() {
            return Err(Error::NoRules);
        }
        Ok(set)
    }
}

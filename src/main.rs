use anyhow::{Context, Result};
use clap::Parser;
use rulesweep::cli::{Cli, Command, FilterArgs};
use rulesweep::manager::{FileManager, ScanResult};
use rulesweep::{output, utils};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { filter } => run_scan(&filter),
        Command::Clean {
            filter,
            confirm,
            prune_empty,
        } => run_clean(&filter, confirm, prune_empty),
    }
}

fn scan_root(filter: &FilterArgs) -> PathBuf {
    filter
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(utils::home_dir)
}

fn manager_for(filter: &FilterArgs) -> FileManager {
    let mut manager = FileManager::new();
    if let Some(depth) = filter.max_depth {
        manager = manager.with_max_depth(depth);
    }
    manager
}

fn run_scan(filter: &FilterArgs) -> Result<()> {
    let rules = filter.to_rule_set().context("invalid filter rules")?;
    let root = scan_root(filter);

    output::print_scan_header(&utils::display_path(&root));
    let result = manager_for(filter).scan(&root, &rules);

    for entry in &result.entries {
        output::print_scan_entry(
            &utils::display_path(&entry.path),
            &utils::format_size(entry.size_bytes),
        );
    }
    if result.entries.is_empty() {
        output::print_no_matches();
    }

    report_summary(&result);
    output::print_dry_run_footer();
    Ok(())
}

fn run_clean(filter: &FilterArgs, confirm: bool, prune_empty: bool) -> Result<()> {
    if !confirm {
        output::print_no_confirm_warning();
        return run_scan(filter);
    }

    let rules = filter.to_rule_set().context("invalid filter rules")?;
    let root = scan_root(filter);

    output::print_scan_header(&utils::display_path(&root));
    let manager = manager_for(filter).with_prune_empty_dirs(prune_empty);
    let result = manager.clean(&root, &rules, false);

    for entry in &result.entries {
        output::print_deleted(
            &utils::display_path(&entry.path),
            &utils::format_size(entry.size_bytes),
        );
    }
    for dir in &result.pruned_dirs {
        output::print_pruned_dir(&utils::display_path(dir));
    }
    if result.entries.is_empty() {
        output::print_no_matches();
    }

    report_summary(&result);
    output::print_clean_complete(&utils::format_size(result.total_bytes));
    Ok(())
}

fn report_summary(result: &ScanResult) {
    output::print_summary(
        result.matched_count(),
        &utils::format_size(result.total_bytes),
    );
    if !result.errors.is_empty() {
        output::print_error_count(result.error_count());
        for err in &result.errors {
            output::print_error(&err.to_string());
        }
    }
}

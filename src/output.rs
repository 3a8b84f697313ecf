use colored::Colorize;

pub fn print_scan_header(root: &str) {
    println!("{}", format!("=== Scanning {root} ===").bold().white());
}

pub fn print_scan_entry(path: &str, size: &str) {
    println!("  {}  {}", path.dimmed(), size.yellow());
}

pub fn print_deleted(path: &str, size: &str) {
    println!("  {} {}  {}", "Deleted".red(), path.dimmed(), size.yellow());
}

pub fn print_pruned_dir(path: &str) {
    println!("  {} {}", "Pruned".red(), path.dimmed());
}

pub fn print_summary(count: usize, total: &str) {
    println!();
    println!("{}", "=== Summary ===".bold().white());
    println!("  {:<20} {}", "Files matched:".bold(), count);
    println!("  {:<20} {}", "Total size:".bold(), total.green().bold());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "Error:".red().bold(), msg.red());
}

pub fn print_error_count(count: usize) {
    println!("  {:<20} {}", "Errors:".bold(), count.to_string().red());
}

pub fn print_dry_run_footer() {
    println!();
    println!(
        "{}",
        "This was a dry run. Run `rulesweep clean --confirm` to delete."
            .yellow()
            .bold()
    );
}

pub fn print_clean_complete(freed: &str) {
    println!();
    println!(
        "{} {}",
        "Cleaned!".green().bold(),
        format!("{freed} freed.").green()
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run scan."
            .yellow()
            .bold()
    );
    println!();
}

pub fn print_no_matches() {
    println!("  {}", "No files matched the given rules.".dimmed());
}

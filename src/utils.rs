use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get home directory or panic with a clear message.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Could not determine home directory")
}

/// Parse human-readable size string ("100MB") into bytes.
pub fn parse_size(s: &str) -> Result<u64> {
    let trimmed = s.trim();
    let (num_str, multiplier) = if let Some(n) = trimmed.strip_suffix("GB") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = trimmed.strip_suffix("gb") {
        (n, 1_073_741_824)
    } else if let Some(n) = trimmed.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = trimmed.strip_suffix("mb") {
        (n, 1_048_576)
    } else if let Some(n) = trimmed.strip_suffix("KB") {
        (n, 1_024)
    } else if let Some(n) = trimmed.strip_suffix("kb") {
        (n, 1_024)
    } else if let Some(n) = trimmed.strip_suffix("B") {
        (n, 1)
    } else if let Some(n) = trimmed.strip_suffix("b") {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (trimmed, 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSize(s.to_string()))?;

    if num < 0.0 {
        return Err(Error::InvalidSize(s.to_string()));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Parse a duration string with an optional unit suffix.
/// Supports h (hours), d (days), w (weeks), m (months, 30 days).
/// Plain numbers default to days. Examples: "15", "15d", "2w", "48h".
pub fn parse_duration(s: &str) -> Result<Duration> {
    let trimmed = s.trim();

    let (num_str, unit) = match trimmed.find(|c: char| c.is_alphabetic()) {
        Some(pos) => {
            let (num, unit) = trimmed.split_at(pos);
            (num, Some(unit))
        }
        None => (trimmed, None),
    };

    let value: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| Error::InvalidDuration(s.to_string()))?;

    let seconds = match unit {
        None | Some("d") | Some("D") => value * 24 * 60 * 60,
        Some("h") | Some("H") => value * 60 * 60,
        Some("w") | Some("W") => value * 7 * 24 * 60 * 60,
        Some("m") | Some("M") => value * 30 * 24 * 60 * 60,
        Some(_) => return Err(Error::InvalidDuration(s.to_string())),
    };

    Ok(Duration::from_secs(seconds))
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorten a path for display by replacing home dir with ~.
pub fn display_path(path: &Path) -> String {
    let home = home_dir();
    if let Ok(relative) = path.strip_prefix(&home) {
        format!("~/{}", relative.display())
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_plain_bytes() {
        assert_eq!(parse_size("512").unwrap(), 512);
    }

    #[test]
    fn parse_size_megabytes() {
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1_048_576);
        assert_eq!(parse_size("100mb").unwrap(), 100 * 1_048_576);
    }

    #[test]
    fn parse_size_fractional_gigabytes() {
        assert_eq!(parse_size("1.5GB").unwrap(), (1.5 * 1_073_741_824.0) as u64);
    }

    #[test]
    fn parse_size_whitespace() {
        assert_eq!(parse_size("  10KB  ").unwrap(), 10 * 1_024);
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-5MB").is_err());
    }

    #[test]
    fn parse_duration_default_days() {
        assert_eq!(parse_duration("15").unwrap().as_secs(), 15 * 24 * 60 * 60);
        assert_eq!(parse_duration("15d").unwrap().as_secs(), 15 * 24 * 60 * 60);
    }

    #[test]
    fn parse_duration_hours_and_weeks() {
        assert_eq!(parse_duration("48h").unwrap().as_secs(), 48 * 60 * 60);
        assert_eq!(
            parse_duration("2w").unwrap().as_secs(),
            2 * 7 * 24 * 60 * 60
        );
    }

    #[test]
    fn parse_duration_months_approximate() {
        assert_eq!(
            parse_duration("3m").unwrap().as_secs(),
            3 * 30 * 24 * 60 * 60
        );
    }

    #[test]
    fn parse_duration_rejects_unknown_unit() {
        assert!(parse_duration("15x").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2 * 1_048_576), "2.00 MB");
    }
}

use crate::error::{Error, Result};
use crate::manager::FileEntry;
use globset::{Glob, GlobMatcher};
use std::collections::HashSet;
use std::time::{Duration, SystemTime};

/// One filter criterion. Immutable once constructed; globs are compiled
/// up front so a bad pattern fails here instead of mid-scan.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Extension is a member of the set (lowercase, no leading dot).
    Extension(HashSet<String>),
    /// Size is at least this many bytes (inclusive).
    MinSize(u64),
    /// Size is at most this many bytes (inclusive).
    MaxSize(u64),
    /// Last modified at least this long ago.
    OlderThan(Duration),
    /// Last modified less than this long ago.
    NewerThan(Duration),
    /// Path relative to the scan root matches this glob.
    PathPattern(GlobMatcher),
    /// Matching paths are excluded unconditionally.
    ExcludePath(GlobMatcher),
}

impl Rule {
    /// Build an extension rule. Extensions are matched case-insensitively
    /// and a leading dot is accepted ("tmp" and ".tmp" are equivalent).
    pub fn extensions<I, S>(exts: I) -> Result<Rule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = exts
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if set.is_empty() {
            return Err(Error::EmptyExtensions);
        }
        Ok(Rule::Extension(set))
    }

    pub fn min_size(bytes: u64) -> Rule {
        Rule::MinSize(bytes)
    }

    pub fn max_size(bytes: u64) -> Rule {
        Rule::MaxSize(bytes)
    }

    pub fn older_than(age: Duration) -> Rule {
        Rule::OlderThan(age)
    }

    pub fn newer_than(age: Duration) -> Rule {
        Rule::NewerThan(age)
    }

    pub fn path_pattern(pattern: &str) -> Result<Rule> {
        Ok(Rule::PathPattern(compile_glob(pattern)?))
    }

    pub fn exclude_path(pattern: &str) -> Result<Rule> {
        Ok(Rule::ExcludePath(compile_glob(pattern)?))
    }

    /// Exclusion rules are evaluated before everything else and always win.
    pub fn is_exclusion(&self) -> bool {
        matches!(self, Rule::ExcludePath(_))
    }

    fn matches(&self, entry: &FileEntry, now: SystemTime) -> bool {
        match self {
            Rule::Extension(set) => match entry.path.extension() {
                Some(ext) => set.contains(&ext.to_string_lossy().to_lowercase()),
                None => false,
            },
            Rule::MinSize(min) => entry.size_bytes >= *min,
            Rule::MaxSize(max) => entry.size_bytes <= *max,
            Rule::OlderThan(age) => file_age(entry, now) >= *age,
            Rule::NewerThan(age) => file_age(entry, now) < *age,
            Rule::PathPattern(glob) => glob.is_match(&entry.rel_path),
            Rule::ExcludePath(glob) => glob.is_match(&entry.rel_path),
        }
    }
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(glob.compile_matcher())
}

/// Age relative to the scan-start timestamp. Files modified in the
/// future (clock skew) count as age zero.
fn file_age(entry: &FileEntry, now: SystemTime) -> Duration {
    now.duration_since(entry.modified).unwrap_or(Duration::ZERO)
}

/// How the positive rules in a set are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    /// Every rule must match (conjunction).
    All,
    /// At least one rule must match (disjunction).
    Any,
}

/// An ordered collection of rules plus a combination mode.
///
/// A set with no positive rules matches nothing, so an unconfigured
/// cleaner can never match the whole tree. Evaluation is side-effect-free;
/// one set can be shared across concurrent scans of different roots.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    mode: CombineMode,
}

impl RuleSet {
    pub fn new(mode: CombineMode) -> Self {
        Self {
            rules: Vec::new(),
            mode,
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn mode(&self) -> CombineMode {
        self.mode
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// True when the set has no positive (non-exclusion) rules.
    pub fn is_empty(&self) -> bool {
        !self.rules.iter().any(|r| !r.is_exclusion())
    }

    /// Decide whether `entry` is a deletion candidate. `now` is captured
    /// once per scan by the caller so age checks are consistent across
    /// the whole run.
    pub fn matches(&self, entry: &FileEntry, now: SystemTime) -> bool {
        if entry.is_dir {
            return false;
        }

        // Exclusions short-circuit before any other rule is considered.
        for rule in &self.rules {
            if rule.is_exclusion() && rule.matches(entry, now) {
                return false;
            }
        }

        let mut saw_positive = false;
        let mut all_matched = true;
        let mut any_matched = false;

        for rule in &self.rules {
            if rule.is_exclusion() {
                continue;
            }
            saw_positive = true;
            if rule.matches(entry, now) {
                any_matched = true;
            } else {
                all_matched = false;
            }
        }

        if !saw_positive {
            return false;
        }

        match self.mode {
            CombineMode::All => all_matched,
            CombineMode::Any => any_matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn entry(rel: &str, size: u64, modified: SystemTime) -> FileEntry {
        FileEntry {
            path: Path::new("/scan").join(rel),
            rel_path: PathBuf::from(rel),
            size_bytes: size,
            modified,
            is_dir: false,
            is_symlink: false,
        }
    }

    #[test]
    fn empty_set_matches_nothing() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All);
        assert!(!set.matches(&entry("a.tmp", 10, now), now));

        let set = RuleSet::new(CombineMode::Any);
        assert!(!set.matches(&entry("a.tmp", 10, now), now));
    }

    #[test]
    fn exclusions_alone_match_nothing() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::Any)
            .with_rule(Rule::exclude_path("keep/**").unwrap());
        assert!(!set.matches(&entry("a.tmp", 10, now), now));
    }

    #[test]
    fn all_requires_every_rule() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::extensions(["tmp"]).unwrap())
            .with_rule(Rule::min_size(100));
        assert!(set.matches(&entry("big.tmp", 200, now), now));
        assert!(!set.matches(&entry("small.tmp", 10, now), now));
        assert!(!set.matches(&entry("big.log", 200, now), now));
    }

    #[test]
    fn any_requires_one_rule() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::Any)
            .with_rule(Rule::extensions(["tmp"]).unwrap())
            .with_rule(Rule::min_size(100));
        assert!(set.matches(&entry("small.tmp", 10, now), now));
        assert!(set.matches(&entry("big.log", 200, now), now));
        assert!(!set.matches(&entry("small.log", 10, now), now));
    }

    #[test]
    fn exclusion_wins_in_both_modes() {
        let now = SystemTime::now();
        for mode in [CombineMode::All, CombineMode::Any] {
            let set = RuleSet::new(mode)
                .with_rule(Rule::extensions(["tmp"]).unwrap())
                .with_rule(Rule::exclude_path("keep/**").unwrap());
            assert!(set.matches(&entry("junk/a.tmp", 10, now), now));
            assert!(!set.matches(&entry("keep/a.tmp", 10, now), now));
        }
    }

    #[test]
    fn extension_is_case_insensitive_and_dot_tolerant() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::extensions([".TMP"]).unwrap());
        assert!(set.matches(&entry("a.tmp", 10, now), now));
        assert!(set.matches(&entry("b.Tmp", 10, now), now));
        assert!(!set.matches(&entry("noext", 10, now), now));
    }

    #[test]
    fn extension_rule_rejects_empty_set() {
        assert!(Rule::extensions(Vec::<String>::new()).is_err());
        assert!(Rule::extensions(["", "  "]).is_err());
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::min_size(10))
            .with_rule(Rule::max_size(20));
        assert!(set.matches(&entry("a", 10, now), now));
        assert!(set.matches(&entry("b", 20, now), now));
        assert!(!set.matches(&entry("c", 9, now), now));
        assert!(!set.matches(&entry("d", 21, now), now));
    }

    #[test]
    fn older_than_threshold() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::older_than(30 * DAY));
        assert!(set.matches(&entry("old", 1, now - 31 * DAY), now));
        assert!(!set.matches(&entry("new", 1, now - 29 * DAY), now));
    }

    #[test]
    fn newer_than_threshold() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::newer_than(30 * DAY));
        assert!(set.matches(&entry("new", 1, now - 29 * DAY), now));
        assert!(!set.matches(&entry("old", 1, now - 31 * DAY), now));
    }

    #[test]
    fn future_mtime_counts_as_age_zero() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::newer_than(DAY));
        assert!(set.matches(&entry("skewed", 1, now + DAY), now));
    }

    #[test]
    fn path_pattern_matches_relative_path() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::All)
            .with_rule(Rule::path_pattern("logs/**/*.log").unwrap());
        assert!(set.matches(&entry("logs/web/access.log", 1, now), now));
        assert!(!set.matches(&entry("data/access.log", 1, now), now));
    }

    #[test]
    fn invalid_glob_fails_at_construction() {
        assert!(Rule::path_pattern("a[").is_err());
        assert!(Rule::exclude_path("a[").is_err());
    }

    #[test]
    fn directories_never_match() {
        let now = SystemTime::now();
        let set = RuleSet::new(CombineMode::Any)
            .with_rule(Rule::min_size(0));
        let mut dir = entry("somedir", 0, now);
        dir.is_dir = true;
        assert!(!set.matches(&dir, now));
    }
}

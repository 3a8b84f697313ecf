use crate::rules::RuleSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Scan-time snapshot of one filesystem object. Built fresh on every
/// walk; never cached across scans.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path as encountered during the walk.
    pub path: PathBuf,
    /// Path relative to the scan root, used for glob matching.
    pub rel_path: PathBuf,
    pub size_bytes: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
    pub is_symlink: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// A directory could not be listed; its subtree was skipped.
    Walk,
    /// A matched file could not be removed.
    Delete,
}

/// One per-entry failure recorded during a walk. These never abort the
/// operation; the worst case is a result with a non-empty error list.
#[derive(Debug)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ScanErrorKind::Walk => "walk error",
            ScanErrorKind::Delete => "delete failed",
        };
        match &self.path {
            Some(path) => write!(f, "{label} at {}: {}", path.display(), self.message),
            None => write!(f, "{label}: {}", self.message),
        }
    }
}

/// Aggregate outcome of one scan or clean invocation.
///
/// After `clean` with deletion enabled, `entries` holds only the files
/// that were actually removed and `total_bytes` is the space really
/// freed. In dry-run mode both reflect every match.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub entries: Vec<FileEntry>,
    pub total_bytes: u64,
    pub errors: Vec<ScanError>,
    /// Directories removed by the empty-dir pruning pass, if enabled.
    pub pruned_dirs: Vec<PathBuf>,
}

impl ScanResult {
    pub fn matched_count(&self) -> usize {
        self.entries.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Walks a directory tree once, classifies entries via a [`RuleSet`],
/// and deletes matches or reports what would be deleted.
///
/// One invocation is one sequential depth-first walk. The manager holds
/// no per-walk state, so independent scans of different roots can run
/// on parallel threads sharing the same rule set.
#[derive(Debug, Default, Clone)]
pub struct FileManager {
    max_depth: Option<usize>,
    prune_empty_dirs: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how deep the walk descends below the root.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// After deletion, remove directories left empty (deepest first).
    /// The scan root itself is never removed.
    pub fn with_prune_empty_dirs(mut self, prune: bool) -> Self {
        self.prune_empty_dirs = prune;
        self
    }

    /// Install a cancel flag, checked once per directory entry. When it
    /// flips, the walk stops and returns whatever it accumulated.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Walk the tree and report matches without deleting anything.
    pub fn scan(&self, root: &Path, rules: &RuleSet) -> ScanResult {
        let now = SystemTime::now();
        let mut result = ScanResult::default();
        self.collect_matches(root, rules, now, &mut result);
        result.total_bytes = result.entries.iter().map(|e| e.size_bytes).sum();
        result
    }

    /// Walk the tree and delete matches. With `dry_run` set this is
    /// identical to [`scan`](Self::scan). Deletion failures are recorded
    /// per entry and never abort the walk.
    pub fn clean(&self, root: &Path, rules: &RuleSet, dry_run: bool) -> ScanResult {
        if dry_run {
            return self.scan(root, rules);
        }

        let now = SystemTime::now();
        let mut result = ScanResult::default();
        self.collect_matches(root, rules, now, &mut result);

        // Deletion happens after the walk, so an emptied directory is
        // never re-entered in the same pass.
        let mut deleted = Vec::new();
        let mut freed = 0u64;
        for entry in result.entries.drain(..) {
            match fs::remove_file(&entry.path) {
                Ok(()) => {
                    freed += entry.size_bytes;
                    deleted.push(entry);
                }
                Err(e) => result.errors.push(ScanError {
                    kind: ScanErrorKind::Delete,
                    path: Some(entry.path.clone()),
                    message: e.to_string(),
                }),
            }
        }
        result.entries = deleted;
        result.total_bytes = freed;

        if self.prune_empty_dirs && !self.cancelled() {
            self.prune_empty(root, &mut result);
        }

        result
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Single depth-first pass. Directories are never matched; regular
    /// files and symlinks (not followed) are evaluated against the rules.
    /// Per-directory lexicographic order keeps results reproducible for
    /// the same tree contents.
    fn collect_matches(
        &self,
        root: &Path,
        rules: &RuleSet,
        now: SystemTime,
        result: &mut ScanResult,
    ) {
        let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            if self.cancelled() {
                break;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.errors.push(ScanError {
                        kind: ScanErrorKind::Walk,
                        path: e.path().map(Path::to_path_buf),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            // The root itself is never a candidate.
            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }

            // With follow_links(false) this is the symlink's own metadata.
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    result.errors.push(ScanError {
                        kind: ScanErrorKind::Walk,
                        path: Some(entry.path().to_path_buf()),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let rel_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();

            let file_entry = FileEntry {
                path: entry.path().to_path_buf(),
                rel_path,
                size_bytes: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                is_dir: false,
                is_symlink: entry.file_type().is_symlink(),
            };

            if rules.matches(&file_entry, now) {
                result.entries.push(file_entry);
            }
        }
    }

    /// Remove directories left empty by the deletion pass, deepest
    /// first so emptied parents are caught in the same sweep.
    fn prune_empty(&self, root: &Path, result: &mut ScanResult) {
        let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut dirs: Vec<(usize, PathBuf)> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.depth() > 0 && e.file_type().is_dir())
            .map(|e| (e.depth(), e.path().to_path_buf()))
            .collect();
        dirs.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, path) in dirs {
            if !is_empty_dir(&path) {
                continue;
            }
            match fs::remove_dir(&path) {
                Ok(()) => result.pruned_dirs.push(path),
                Err(e) => result.errors.push(ScanError {
                    kind: ScanErrorKind::Delete,
                    path: Some(path),
                    message: e.to_string(),
                }),
            }
        }
    }
}

fn is_empty_dir(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut rd) => rd.next().is_none(),
        Err(_) => false,
    }
}

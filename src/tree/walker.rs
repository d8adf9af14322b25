//! Walker - lazy depth-first traversal producing `DirectoryEntry` records

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{AccessOp, EntryAccessError, WalkError};

use super::config::{SymlinkPolicy, WalkerConfig};
use super::entry::{DirectoryEntry, EntryKind, LinkTarget, SymlinkInfo};
use super::utils::{get_name, read_sorted_names, should_skip_name};

/// Walks a directory tree according to a [`WalkerConfig`].
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Open `root` and return a lazy pre-order iterator over its entries.
    ///
    /// The root itself is validated and listed here, so a missing or
    /// unreadable root fails before any entry is produced.
    pub fn walk(&self, root: &Path) -> Result<Walk, WalkError> {
        let canonical = root.canonicalize().map_err(|e| WalkError::root(root, e))?;
        let metadata = fs::metadata(&canonical).map_err(|e| WalkError::root(root, e))?;
        if !metadata.is_dir() {
            return Err(WalkError::RootNotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut stack = Vec::new();
        if !self.config.at_max_depth(0) {
            let children = read_sorted_names(root).map_err(|e| WalkError::root(root, e))?;
            stack.push(Frame {
                path: root.to_path_buf(),
                canonical: canonical.clone(),
                real: canonical.clone(),
                depth: 0,
                children: children.into_iter(),
            });
        }

        debug!(root = %root.display(), canonical = %canonical.display(), "starting walk");

        let root_entry = DirectoryEntry {
            path: root.to_path_buf(),
            name: get_name(root),
            kind: EntryKind::Directory,
            depth: 0,
            parent_path: None,
            canonical_path: canonical,
            symlink: None,
            failure: None,
        };

        Ok(Walk {
            config: self.config.clone(),
            pending_root: Some(root_entry),
            stack,
            emitted: 0,
            truncated: false,
        })
    }
}

/// Shorthand for `Walker::new(config.clone()).walk(root)`.
pub fn walk(root: &Path, config: &WalkerConfig) -> Result<Walk, WalkError> {
    Walker::new(config.clone()).walk(root)
}

/// An open directory on the current descent path.
struct Frame {
    path: PathBuf,
    canonical: PathBuf,
    /// Symlink-free location, used to detect cycles.
    real: PathBuf,
    depth: usize,
    children: std::vec::IntoIter<OsString>,
}

/// Parent facts copied out of the top frame before visiting a child.
struct Parent {
    path: PathBuf,
    canonical: PathBuf,
    real: PathBuf,
    depth: usize,
}

/// Lazy, finite, single-pass sequence of entries in pre-order.
///
/// The stack of open frames doubles as the visited-ancestor set: a
/// directory is an ancestor of the current entry exactly when it has a
/// frame on the stack.
pub struct Walk {
    config: WalkerConfig,
    pending_root: Option<DirectoryEntry>,
    stack: Vec<Frame>,
    emitted: usize,
    truncated: bool,
}

impl Walk {
    /// True when the walk stopped early at `max_entries`.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_entries
            .is_some_and(|max| self.emitted >= max)
    }

    fn truncate(&mut self) -> Option<DirectoryEntry> {
        warn!(limit = self.emitted, "entry limit reached, output is truncated");
        self.truncated = true;
        self.stack.clear();
        None
    }

    fn is_ancestor(&self, real: &Path) -> bool {
        self.stack.iter().any(|frame| frame.real == real)
    }

    /// Classify one child. Directories to descend into come back as their
    /// symlink-free path; nothing is listed here.
    fn visit(&self, parent: &Parent, name: OsString) -> (DirectoryEntry, Option<PathBuf>) {
        let path = parent.path.join(&name);
        let mut entry = DirectoryEntry {
            name: name.to_string_lossy().to_string(),
            kind: EntryKind::Other,
            depth: parent.depth + 1,
            parent_path: Some(parent.path.clone()),
            canonical_path: parent.canonical.join(&name),
            symlink: None,
            failure: None,
            path,
        };
        let real = parent.real.join(&name);

        let metadata = match fs::symlink_metadata(&entry.path) {
            Ok(m) => m,
            Err(err) => {
                warn!(path = %entry.path.display(), error = %err, "cannot stat entry");
                entry.failure = Some(EntryAccessError::new(&entry.path, AccessOp::Stat, &err));
                return (entry, None);
            }
        };
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            return self.visit_symlink(entry);
        }

        if file_type.is_dir() {
            entry.kind = EntryKind::Directory;
            return (entry, Some(real));
        }

        if file_type.is_file() {
            entry.kind = EntryKind::File;
        }
        (entry, None)
    }

    fn visit_symlink(&self, mut entry: DirectoryEntry) -> (DirectoryEntry, Option<PathBuf>) {
        entry.kind = EntryKind::Symlink;
        let policy = self.config.symlinks;

        let (target_kind, resolved) = match fs::canonicalize(&entry.path) {
            Ok(real) => match fs::metadata(&real) {
                Ok(m) if m.is_dir() => (LinkTarget::Directory, Some(real)),
                Ok(_) => (LinkTarget::File, Some(real)),
                Err(_) => (LinkTarget::Broken, None),
            },
            Err(_) => (LinkTarget::Broken, None),
        };

        let mut link = SymlinkInfo {
            target: fs::read_link(&entry.path).ok(),
            resolved,
            target_kind,
            policy,
            descended: false,
            cycle: false,
        };

        let mut descend = None;
        if policy == SymlinkPolicy::Follow && target_kind == LinkTarget::Directory {
            if let Some(real) = link.resolved.clone() {
                if self.is_ancestor(&real) {
                    info!(
                        path = %entry.path.display(),
                        target = %real.display(),
                        "symlink cycle detected, not descending"
                    );
                    link.cycle = true;
                } else {
                    descend = Some(real);
                }
            }
        }

        entry.symlink = Some(link);
        (entry, descend)
    }

    /// List a directory about to be emitted. A listing failure turns the
    /// entry into `Other` with the failure attached.
    fn open_dir(&self, entry: &mut DirectoryEntry, real: PathBuf) -> Option<Frame> {
        if self.config.at_max_depth(entry.depth) {
            return None;
        }
        match read_sorted_names(&entry.path) {
            Ok(children) => {
                if let Some(link) = entry.symlink.as_mut() {
                    link.descended = true;
                }
                Some(Frame {
                    path: entry.path.clone(),
                    canonical: entry.canonical_path.clone(),
                    real,
                    depth: entry.depth,
                    children: children.into_iter(),
                })
            }
            Err(err) => {
                warn!(path = %entry.path.display(), error = %err, "cannot list directory");
                entry.kind = EntryKind::Other;
                entry.failure = Some(EntryAccessError::new(&entry.path, AccessOp::List, &err));
                None
            }
        }
    }

    /// Decide whether a visited entry survives the dirs-only filter.
    fn keep(&self, entry: &DirectoryEntry) -> bool {
        if !self.config.dirs_only {
            return true;
        }
        match entry.kind {
            EntryKind::Directory => true,
            EntryKind::Symlink => entry
                .symlink
                .as_ref()
                .is_some_and(|s| s.target_kind == LinkTarget::Directory),
            EntryKind::Other => entry.failure.is_some(),
            EntryKind::File => false,
        }
    }
}

impl Iterator for Walk {
    type Item = DirectoryEntry;

    fn next(&mut self) -> Option<DirectoryEntry> {
        if let Some(root) = self.pending_root.take() {
            self.emitted += 1;
            return Some(root);
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(name) = frame.children.next() else {
                self.stack.pop();
                continue;
            };
            let parent = Parent {
                path: frame.path.clone(),
                canonical: frame.canonical.clone(),
                real: frame.real.clone(),
                depth: frame.depth,
            };

            if should_skip_name(&name.to_string_lossy(), &self.config) {
                continue;
            }

            // dirs-only needs the entry's kind before it can count
            if !self.config.dirs_only && self.limit_reached() {
                return self.truncate();
            }

            let (mut entry, descend) = self.visit(&parent, name);
            if !self.keep(&entry) {
                continue;
            }
            if self.limit_reached() {
                return self.truncate();
            }

            if let Some(frame) = descend.and_then(|real| self.open_dir(&mut entry, real)) {
                self.stack.push(frame);
            }
            self.emitted += 1;
            return Some(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HiddenEntries;
    use tempfile::TempDir;

    fn names(walk: Walk) -> Vec<(usize, String)> {
        walk.map(|e| (e.depth, e.name)).collect()
    }

    fn sample() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b/inner/deep.txt"), "").unwrap();
        fs::write(dir.path().join("b/z.txt"), "").unwrap();
        fs::write(dir.path().join("a/one.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    #[test]
    fn test_preorder_sorted() {
        let dir = sample();
        let walk = walk(dir.path(), &WalkerConfig::default()).unwrap();
        let got: Vec<_> = names(walk).into_iter().skip(1).collect();
        assert_eq!(
            got,
            vec![
                (1, "a".to_string()),
                (2, "one.txt".to_string()),
                (1, "b".to_string()),
                (2, "inner".to_string()),
                (3, "deep.txt".to_string()),
                (2, "z.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_entry_first() {
        let dir = sample();
        let mut walk = walk(dir.path(), &WalkerConfig::default()).unwrap();
        let root = walk.next().unwrap();
        assert_eq!(root.depth, 0);
        assert!(root.is_root());
        assert!(root.is_dir());
        assert_eq!(root.canonical_path, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_parent_paths_precede_children() {
        let dir = sample();
        let mut seen = std::collections::HashSet::new();
        for entry in walk(dir.path(), &WalkerConfig::default()).unwrap() {
            if let Some(parent) = &entry.parent_path {
                assert!(seen.contains(parent), "parent of {:?} not seen", entry.path);
            }
            seen.insert(entry.path.clone());
        }
    }

    #[test]
    fn test_hidden_entries() {
        let dir = sample();
        let hidden = |config: &WalkerConfig| {
            walk(dir.path(), config)
                .unwrap()
                .any(|e| e.name == ".hidden")
        };
        assert!(!hidden(&WalkerConfig::default()));
        assert!(hidden(&WalkerConfig {
            hidden: HiddenEntries::Include,
            ..Default::default()
        }));
    }

    #[test]
    fn test_max_depth() {
        let dir = sample();
        let config = WalkerConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let got = names(walk(dir.path(), &config).unwrap());
        assert!(got.iter().all(|(depth, _)| *depth <= 1));
        assert!(got.iter().any(|(_, name)| name == "b"));

        let config = WalkerConfig {
            max_depth: Some(0),
            ..Default::default()
        };
        assert_eq!(walk(dir.path(), &config).unwrap().count(), 1);
    }

    #[test]
    fn test_ignore_patterns_and_dirs_only() {
        let dir = sample();
        let config = WalkerConfig {
            ignore_patterns: vec!["inner".to_string()],
            dirs_only: true,
            ..Default::default()
        };
        let got: Vec<_> = names(walk(dir.path(), &config).unwrap())
            .into_iter()
            .map(|(_, n)| n)
            .skip(1)
            .collect();
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn test_max_entries_truncates() {
        let dir = sample();
        let config = WalkerConfig {
            max_entries: Some(3),
            ..Default::default()
        };
        let mut walk = walk(dir.path(), &config).unwrap();
        let count = walk.by_ref().count();
        assert_eq!(count, 3);
        assert!(walk.is_truncated());
    }

    #[test]
    fn test_max_entries_zero_still_emits_root() {
        let dir = sample();
        let config = WalkerConfig {
            max_entries: Some(0),
            ..Default::default()
        };
        let mut walk = walk(dir.path(), &config).unwrap();
        let entries: Vec<_> = walk.by_ref().collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_root());
        assert!(walk.is_truncated());
    }

    #[test]
    fn test_max_entries_with_dirs_only() {
        let dir = sample();
        let config = WalkerConfig {
            max_entries: Some(2),
            dirs_only: true,
            ..Default::default()
        };
        let mut walk = walk(dir.path(), &config).unwrap();
        let got: Vec<_> = walk.by_ref().map(|e| e.name).skip(1).collect();
        assert_eq!(got, vec!["a"]);
        assert!(walk.is_truncated());
    }

    #[test]
    fn test_limit_exactly_met_is_not_truncated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.txt"), "").unwrap();
        let config = WalkerConfig {
            max_entries: Some(2),
            ..Default::default()
        };
        let mut walk = walk(dir.path(), &config).unwrap();
        assert_eq!(walk.by_ref().count(), 2);
        assert!(!walk.is_truncated());
    }

    #[test]
    fn test_root_errors() {
        let dir = sample();
        let missing = dir.path().join("missing");
        assert!(matches!(
            walk(&missing, &WalkerConfig::default()),
            Err(WalkError::RootNotFound { .. })
        ));
        let file = dir.path().join("a/one.txt");
        assert!(matches!(
            walk(&file, &WalkerConfig::default()),
            Err(WalkError::RootNotADirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_follow() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        fs::create_dir(&a).unwrap();
        symlink(&a, a.join("link")).unwrap();

        let config = WalkerConfig {
            symlinks: SymlinkPolicy::Follow,
            ..Default::default()
        };
        let entries: Vec<_> = walk(dir.path(), &config).unwrap().collect();
        let links: Vec<_> = entries.iter().filter(|e| e.name == "link").collect();
        assert_eq!(links.len(), 1);
        let info = links[0].symlink.as_ref().unwrap();
        assert!(info.cycle);
        assert!(!info.descended);
        assert_eq!(entries.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_follow_descends() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/file.txt"), "").unwrap();
        symlink(dir.path().join("real"), dir.path().join("view")).unwrap();

        let follow = WalkerConfig {
            symlinks: SymlinkPolicy::Follow,
            ..Default::default()
        };
        let entries: Vec<_> = walk(dir.path(), &follow).unwrap().collect();
        let under_view: Vec<_> = entries
            .iter()
            .filter(|e| e.parent_path.as_deref() == Some(dir.path().join("view").as_path()))
            .collect();
        assert_eq!(under_view.len(), 1);
        assert_eq!(under_view[0].name, "file.txt");

        let skip = WalkerConfig {
            symlinks: SymlinkPolicy::Skip,
            ..Default::default()
        };
        let entries: Vec<_> = walk(dir.path(), &skip).unwrap().collect();
        assert_eq!(entries.len(), 4);
        let view = entries.iter().find(|e| e.name == "view").unwrap();
        assert_eq!(view.kind, EntryKind::Symlink);
        assert!(!view.symlink.as_ref().unwrap().descended);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        symlink("nowhere", dir.path().join("dangling")).unwrap();
        symlink("self", dir.path().join("self")).unwrap();

        for entry in walk(dir.path(), &WalkerConfig::default()).unwrap().skip(1) {
            let info = entry.symlink.unwrap();
            assert_eq!(info.target_kind, LinkTarget::Broken);
            assert_eq!(info.resolved, None);
        }
    }

    /// Nest directories past PATH_MAX by building two halves and moving one
    /// under the other, so the deepest entries cannot be reached by path.
    #[cfg(target_os = "linux")]
    fn nest_past_path_max(base: &Path) -> PathBuf {
        let segment = "n".repeat(200);
        let mut outer = base.join("outer");
        let mut inner = base.join("inner");
        for _ in 0..12 {
            outer.push(&segment);
            inner.push(&segment);
        }
        fs::create_dir_all(&outer).unwrap();
        fs::create_dir_all(&inner).unwrap();
        fs::rename(base.join("inner"), outer.join("inner")).unwrap();
        outer
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreachable_entry_is_other_for_any_user() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sibling.txt"), "").unwrap();
        nest_past_path_max(dir.path());

        let entries: Vec<_> = walk(dir.path(), &WalkerConfig::default())
            .unwrap()
            .collect();

        let failed: Vec<_> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Other)
            .collect();
        assert_eq!(failed.len(), 1);
        let failure = failed[0].failure.as_ref().unwrap();
        assert_eq!(failure.op, AccessOp::Stat);
        assert!(failed[0].path.as_os_str().len() >= 4096);
        // the walk carries on past the failure
        assert_eq!(entries.last().unwrap().name, "sibling.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_is_other() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(dir.path().join("sibling.txt"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // privileged users can still list it
        let listable = fs::read_dir(&locked).is_ok();

        let entries: Vec<_> = walk(dir.path(), &WalkerConfig::default())
            .unwrap()
            .collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let locked_entry = entries.iter().find(|e| e.name == "locked").unwrap();
        if !listable {
            assert_eq!(locked_entry.kind, EntryKind::Other);
            assert_eq!(locked_entry.failure.as_ref().unwrap().op, AccessOp::List);
        }
        assert!(entries.iter().any(|e| e.name == "sibling.txt"));
    }
}

//! Directory hierarchy materialization.

use crate::error::{Error, Result};
use crate::separator::is_separator;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Creates exactly one directory level.
///
/// Implementations must report success when the directory already exists,
/// which is what makes [`make_dir_with`] idempotent.
pub trait DirCreator {
    /// Create the last component of `path`; its parent must already exist.
    fn create_one_level(&self, path: &Path) -> io::Result<()>;
}

/// [`DirCreator`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirCreator;

impl DirCreator for FsDirCreator {
    fn create_one_level(&self, path: &Path) -> io::Result<()> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Ensure every directory level of `path` exists on the local filesystem.
pub fn make_dir(path: &str) -> Result<()> {
    make_dir_with(&FsDirCreator, path)
}

/// Ensure every directory level of `path` exists, using `creator` for each level.
///
/// One trailing separator is ignored. The full path is tried first; if that
/// fails, each prefix ending before a separator is created in turn, starting
/// after the first character so a leading root separator is never tried on
/// its own. The first failing level aborts the walk and its error is returned.
pub fn make_dir_with<C: DirCreator + ?Sized>(creator: &C, path: &str) -> Result<()> {
    let path = match path.as_bytes().last() {
        Some(&b) if is_separator(b) => &path[..path.len() - 1],
        _ => path,
    };
    if path.is_empty() {
        return Ok(());
    }

    if creator.create_one_level(Path::new(path)).is_ok() {
        trace!(path, "created directory");
        return Ok(());
    }

    debug!(path, "creating directory levels one at a time");

    let bytes = path.as_bytes();
    let mut idx = 1;
    loop {
        while idx < bytes.len() && !is_separator(bytes[idx]) {
            idx += 1;
        }

        let prefix = &path[..idx];
        if let Err(e) = creator.create_one_level(Path::new(prefix)) {
            warn!(path = prefix, error = %e, "failed to create directory");
            return Err(Error::create_dir(prefix, e));
        }
        trace!(path = prefix, "created directory level");

        if idx == bytes.len() {
            return Ok(());
        }
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::truncate_to_parent;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use tempfile::TempDir;

    /// In-memory creator that needs each parent to exist first.
    #[derive(Default)]
    struct MockCreator {
        existing: RefCell<HashSet<String>>,
        fail_on: Option<String>,
        calls: RefCell<Vec<String>>,
    }

    impl MockCreator {
        fn with_existing(dirs: &[&str]) -> Self {
            let creator = Self::default();
            creator
                .existing
                .borrow_mut()
                .extend(dirs.iter().map(|d| d.to_string()));
            creator
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl DirCreator for MockCreator {
        fn create_one_level(&self, path: &Path) -> io::Result<()> {
            let path = path.to_str().unwrap().to_string();
            self.calls.borrow_mut().push(path.clone());

            if self.fail_on.as_deref() == Some(path.as_str()) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }

            let mut parent = path.clone();
            truncate_to_parent(&mut parent);
            if parent != path && !self.existing.borrow().contains(&parent) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "parent missing"));
            }

            self.existing.borrow_mut().insert(path);
            Ok(())
        }
    }

    #[test]
    fn test_single_shot_when_parents_exist() {
        let creator = MockCreator::with_existing(&["a", "a/b"]);
        make_dir_with(&creator, "a/b/c").unwrap();
        assert_eq!(creator.calls(), vec!["a/b/c"]);
    }

    #[test]
    fn test_incremental_walk_when_parents_missing() {
        let creator = MockCreator::default();
        make_dir_with(&creator, "a/b/c").unwrap();
        assert_eq!(creator.calls(), vec!["a/b/c", "a", "a/b", "a/b/c"]);
    }

    #[test]
    fn test_trailing_separator_is_ignored() {
        let creator = MockCreator::with_existing(&["a"]);
        make_dir_with(&creator, "a/b/").unwrap();
        assert_eq!(creator.calls(), vec!["a/b"]);
    }

    #[test]
    fn test_mixed_separators() {
        let creator = MockCreator::default();
        make_dir_with(&creator, "a\\b/c").unwrap();
        assert_eq!(creator.calls(), vec!["a\\b/c", "a", "a\\b", "a\\b/c"]);
    }

    #[test]
    fn test_leading_root_not_tried_alone() {
        let creator = MockCreator::default();
        make_dir_with(&creator, "/x/y").unwrap();
        assert_eq!(creator.calls(), vec!["/x/y", "/x", "/x/y"]);
    }

    #[test]
    fn test_first_failure_aborts() {
        let creator = MockCreator {
            fail_on: Some("a/b".to_string()),
            ..MockCreator::default()
        };
        let err = make_dir_with(&creator, "a/b/c").unwrap_err();

        match err {
            Error::CreateDir { path, source } => {
                assert_eq!(path, Path::new("a/b"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(creator.calls(), vec!["a/b/c", "a", "a/b"]);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let creator = MockCreator::default();
        make_dir_with(&creator, "").unwrap();
        make_dir_with(&creator, "/").unwrap();
        assert!(creator.calls().is_empty());
    }

    #[test]
    fn test_make_dir_creates_hierarchy() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a/b/c");

        make_dir(target.to_str().unwrap()).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_make_dir_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a/b/c");
        let target = target.to_str().unwrap();

        make_dir(target).unwrap();
        make_dir(target).unwrap();
        assert!(Path::new(target).is_dir());
    }

    #[test]
    fn test_make_dir_partial_hierarchy() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("a")).unwrap();

        let target = temp_dir.path().join("a/b/c/");
        make_dir(target.to_str().unwrap()).unwrap();
        assert!(temp_dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn test_make_dir_file_in_the_way() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a"), b"not a directory").unwrap();

        let target = temp_dir.path().join("a/b");
        let result = make_dir(target.to_str().unwrap());
        assert!(matches!(result, Err(Error::CreateDir { .. })));
    }

    #[test]
    fn test_fs_creator_existing_dir_is_success() {
        let temp_dir = TempDir::new().unwrap();
        FsDirCreator.create_one_level(temp_dir.path()).unwrap();
    }
}

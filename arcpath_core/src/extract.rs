//! Output path preparation for archive entries.

use crate::error::{Error, Result};
use crate::mkdir::{DirCreator, make_dir_with};
use crate::path::{combine, resolve, truncate_to_parent};
use crate::separator::{is_separator, is_separator_char};
use tracing::debug;

/// Turn an archive entry name into a path below `dest` and create its parent directories.
///
/// The entry name is resolved lexically, stripped of leading separators and
/// joined onto `dest`; all separators in the result become `/`. Names that end
/// in a separator, or resolve to `.`, are directory entries and have the
/// directory itself created. Returns the prepared path, at most `max_path - 1`
/// bytes long. The path is never truncated: nothing is created for an entry
/// whose full path does not fit.
///
/// # Errors
///
/// `InvalidArgument` when `max_path` is zero or the prepared path would exceed
/// `max_path - 1` bytes. `Internal` when the name is empty or resolves to
/// nothing (`a/..`). Otherwise whatever the path operations or `creator` report.
pub fn prepare_entry_path<C: DirCreator + ?Sized>(
    creator: &C,
    dest: &str,
    entry_name: &str,
    max_path: usize,
) -> Result<String> {
    if max_path == 0 {
        return Err(Error::invalid_argument("path capacity must be non-zero"));
    }

    // Resolution never lengthens a path, so this capacity cannot truncate.
    let resolved = resolve(entry_name, entry_name.len() + 1)?;
    let relative = resolved.trim_start_matches(is_separator_char);
    if relative.is_empty() {
        return Err(Error::internal(format!(
            "entry name {:?} resolves to an empty path",
            entry_name
        )));
    }

    let is_directory = relative == "." || relative.bytes().last().is_some_and(is_separator);

    let joined_len = match (dest.is_empty(), relative == ".") {
        (_, true) => dest.len(),
        (true, false) => relative.len(),
        (false, false) if dest.bytes().last().is_some_and(is_separator) => {
            dest.len() + relative.len()
        }
        (false, false) => dest.len() + 1 + relative.len(),
    };
    if joined_len >= max_path {
        return Err(Error::invalid_argument(format!(
            "output path for entry {:?} needs {} bytes, limit is {}",
            entry_name,
            joined_len,
            max_path - 1
        )));
    }

    let mut target = String::new();
    let needed = joined_len + 1;
    target
        .try_reserve(needed)
        .map_err(|_| Error::out_of_memory(needed))?;
    combine(&mut target, dest, max_path)?;
    if relative != "." {
        combine(&mut target, relative, max_path)?;
    }
    let target = target.replace('\\', "/");

    if is_directory {
        make_dir_with(creator, &target)?;
    } else {
        let mut parent = target.clone();
        truncate_to_parent(&mut parent);
        if parent != target {
            make_dir_with(creator, &parent)?;
        }
    }

    debug!(entry = entry_name, path = %target, "prepared entry path");
    Ok(target)
}

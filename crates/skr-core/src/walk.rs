use std::path::{Path, PathBuf};

/// Maximum number of directories inspected by [`find_upward`].
pub const MAX_WALK_DEPTH: usize = 100;

/// Walk from `start` up through its ancestors, returning the first value
/// `probe` yields.
///
/// Each directory is probed once, nearest first. The walk stops at the
/// filesystem root or after [`MAX_WALK_DEPTH`] directories.
pub fn find_upward<T, F>(start: &Path, probe: F) -> Option<T>
where
    F: FnMut(&Path) -> Option<T>,
{
    start
        .ancestors()
        .take(MAX_WALK_DEPTH)
        .find_map(probe)
}

/// Convenience wrapper: first existing `dir/<relative>` that is a directory.
pub fn find_dir_upward(start: &Path, relative: &Path) -> Option<PathBuf> {
    find_upward(start, |dir| {
        let candidate = dir.join(relative);
        candidate.is_dir().then_some(candidate)
    })
}

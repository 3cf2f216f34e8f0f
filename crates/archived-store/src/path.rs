//! Mapping between archive paths and filesystem locations.
//!
//! An archive path is the list of encoded directory names from the root to
//! an entry. The empty path is the root itself.

use std::path::{Component, Path, PathBuf};

use archived_types::{decode, EntryName};

use crate::error::{StoreError, StoreResult};

/// Join `segments` onto `root` in order.
///
/// Never fails and never touches the filesystem. Callers that take paths
/// from outside should run [`validate`] first so a segment cannot climb out
/// of the root.
pub fn resolve<S: AsRef<str>>(root: &Path, segments: &[S]) -> PathBuf {
    segments
        .iter()
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment.as_ref()))
}

/// Check that every segment is a single decodable directory name.
///
/// Returns the decoded names in order.
pub fn validate<S: AsRef<str>>(segments: &[S]) -> StoreResult<Vec<EntryName>> {
    segments
        .iter()
        .map(|segment| validate_segment(segment.as_ref()))
        .collect()
}

fn validate_segment(segment: &str) -> StoreResult<EntryName> {
    let mut components = Path::new(segment).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || segment.contains(['/', '\\']) {
        return Err(StoreError::MalformedName {
            name: segment.to_string(),
            reason: "path segment must be a single directory name".into(),
        });
    }
    Ok(decode(segment)?)
}

/// Turn a location under `root` back into path segments.
///
/// Returns `None` if `path` is outside `root` or has a component that is not
/// valid UTF-8.
pub fn relative_segments(root: &Path, path: &Path) -> Option<Vec<String>> {
    path.strip_prefix(root)
        .ok()?
        .components()
        .map(|c| match c {
            Component::Normal(name) => name.to_str().map(str::to_string),
            _ => None,
        })
        .collect()
}

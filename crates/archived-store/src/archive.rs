use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use archived_types::{decode, EntryKind, EntryMetadata, EntryName};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::metadata::{read_metadata, write_metadata};
use crate::path;

/// Encoded names of a container's immediate children, split by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children {
    pub items: Vec<String>,
    pub containers: Vec<String>,
}

impl Children {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.containers.is_empty()
    }
}

/// Result of [`Archive::read`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadResult {
    pub metadata: EntryMetadata,
    /// Present for the root and for containers.
    pub children: Option<Children>,
}

/// A directory-backed archive rooted at a `.container` directory.
///
/// Holds only the root path. Cloning is cheap and clones share nothing
/// else, so any number of them may operate on the same tree at once.
#[derive(Clone, Debug)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Open the archive rooted at `root`.
    ///
    /// The root's own directory name must decode as a container. Nothing is
    /// read from or written to disk here.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let dirname = root
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                StoreError::Config(format!(
                    "archive root {} has no usable directory name",
                    root.display()
                ))
            })?;

        match decode(dirname) {
            Ok(name) if name.kind == EntryKind::Container => Ok(Self { root }),
            _ => Err(StoreError::Config(format!(
                "the archive root must be a directory with a .container extension, {dirname:?} does not have one"
            ))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of an archive path. Does not validate.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> PathBuf {
        path::resolve(&self.root, segments)
    }

    /// Read an entry's metadata, plus its children if it is a container.
    pub fn read<S: AsRef<str>>(&self, segments: &[S]) -> StoreResult<ReadResult> {
        path::validate(segments)?;
        let dir = self.resolve(segments);
        debug!(dir = %dir.display(), "reading entry");

        require_dir(&dir)?;
        let metadata = read_metadata(&dir)?;
        let children = if segments.is_empty() || metadata.kind.is_container() {
            Some(list_children(&dir)?)
        } else {
            None
        };

        Ok(ReadResult { metadata, children })
    }

    /// Create a new entry inside the container at `parent`.
    ///
    /// The entry's own directory name is computed from `metadata`. Returns
    /// the full archive path of the new entry.
    pub fn create<S: AsRef<str>>(
        &self,
        parent: &[S],
        metadata: &EntryMetadata,
    ) -> StoreResult<Vec<String>> {
        let parent_names = path::validate(parent)?;
        metadata.validate()?;
        if let Some(last) = parent_names.last() {
            require_container(last)?;
        }

        let parent_dir = self.resolve(parent);
        require_dir(&parent_dir)?;
        if let Some(existing) = sibling_with_id(&parent_dir, &metadata.id, None)? {
            return Err(StoreError::AlreadyExists(existing));
        }

        let dir = write_metadata(&parent_dir, metadata)?;
        debug!(dir = %dir.display(), kind = %metadata.kind, "created entry");

        let mut created: Vec<String> = parent.iter().map(|s| s.as_ref().to_string()).collect();
        created.push(metadata.encoded_name());
        Ok(created)
    }

    /// Rename the entry at `src` to `dest`, carrying its whole subtree.
    ///
    /// `dest` is the full new path, including the entry's new name. The
    /// entry keeps its kind; the destination container must already exist
    /// and must not hold another entry with the same id.
    pub fn move_entry<S: AsRef<str>, D: AsRef<str>>(&self, src: &[S], dest: &[D]) -> StoreResult<()> {
        if src.is_empty() || dest.is_empty() {
            return Err(StoreError::RootPath);
        }
        let src_names = path::validate(src)?;
        let dest_names = path::validate(dest)?;

        let src_dir = self.resolve(src);
        let dest_dir = self.resolve(dest);
        require_dir(&src_dir)?;

        let (src_name, dest_name) = match (src_names.last(), dest_names.split_last()) {
            (Some(s), Some((d, dest_parents))) => {
                if let Some(parent) = dest_parents.last() {
                    require_container(parent)?;
                }
                (s, d)
            }
            _ => return Err(StoreError::RootPath),
        };
        if src_name.kind != dest_name.kind {
            return Err(StoreError::KindMismatch {
                expected: src_name.kind,
                found: dest_name.kind,
            });
        }

        if fs::symlink_metadata(&dest_dir).is_ok() {
            return Err(StoreError::AlreadyExists(dest_dir));
        }
        if dest_dir.starts_with(&src_dir) {
            return Err(StoreError::MoveIntoSelf(src_dir));
        }
        let dest_parent = dest_dir.parent().unwrap_or(&self.root);
        require_dir(dest_parent)?;
        if let Some(existing) = sibling_with_id(dest_parent, &dest_name.id, Some(&src_dir))? {
            return Err(StoreError::AlreadyExists(existing));
        }

        debug!(src = %src_dir.display(), dest = %dest_dir.display(), "moving entry");
        fs::rename(&src_dir, &dest_dir).map_err(|e| StoreError::io(&dest_dir, e))
    }

    /// Remove the entry at `path` and everything beneath it.
    ///
    /// Not idempotent: deleting a missing entry fails with `NotFound`. The
    /// removal is recursive and best effort; an error part way through can
    /// leave some descendants behind.
    pub fn delete<S: AsRef<str>>(&self, segments: &[S]) -> StoreResult<()> {
        if segments.is_empty() {
            return Err(StoreError::RootPath);
        }
        path::validate(segments)?;
        let dir = self.resolve(segments);
        fs::symlink_metadata(&dir).map_err(|e| StoreError::io(&dir, e))?;

        debug!(dir = %dir.display(), "deleting entry");
        fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))
    }
}

fn require_dir(dir: &Path) -> StoreResult<()> {
    let meta = fs::metadata(dir).map_err(|e| StoreError::io(dir, e))?;
    if meta.is_dir() {
        Ok(())
    } else {
        Err(StoreError::NotFound(dir.to_path_buf()))
    }
}

fn require_container(name: &EntryName) -> StoreResult<()> {
    match name.kind {
        EntryKind::Container => Ok(()),
        found => Err(StoreError::KindMismatch {
            expected: EntryKind::Container,
            found,
        }),
    }
}

/// Every immediate subdirectory of `dir` whose name decodes, sorted by name.
pub(crate) fn list_entries(dir: &Path) -> StoreResult<Vec<(String, EntryName)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))? {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| StoreError::io(entry.path(), e))?
            .is_dir();
        if !is_dir {
            continue;
        }
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if let Ok(name) = decode(&file_name) {
            entries.push((file_name, name));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn list_children(dir: &Path) -> StoreResult<Children> {
    let mut children = Children::default();
    for (file_name, name) in list_entries(dir)? {
        match name.kind {
            EntryKind::Item => children.items.push(file_name),
            EntryKind::Container => children.containers.push(file_name),
        }
    }
    Ok(children)
}

/// A child of `dir` (other than `except`) already using `id`, of either kind.
fn sibling_with_id(dir: &Path, id: &str, except: Option<&Path>) -> StoreResult<Option<PathBuf>> {
    Ok(list_entries(dir)?
        .into_iter()
        .map(|(file_name, name)| (dir.join(file_name), name))
        .find(|(path, name)| name.id == id && Some(path.as_path()) != except)
        .map(|(path, _)| path))
}

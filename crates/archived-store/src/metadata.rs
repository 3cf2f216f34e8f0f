//! The files inside a single entry directory.
//!
//! Reading is lenient: a missing or unreadable `description.txt` or image
//! only leaves that field unset, with a warning for anything other than
//! "not found". Writing is not atomic: the directory, the description and
//! the image are three separate calls, and a failure part way through leaves
//! what was already written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use archived_types::{decode, EntryMetadata, Image, ImageFormat};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Name of the description file inside an entry directory.
pub const DESCRIPTION_FILE: &str = "description.txt";

/// Name of the image file for `format` inside an entry directory.
pub fn image_file_name(format: ImageFormat) -> String {
    format!("image.{}", format.extension())
}

/// Read the metadata of the entry stored at `dir`.
///
/// The id, tags and kind come from the last path component. Fails only if
/// that component does not decode.
pub fn read_metadata(dir: &Path) -> StoreResult<EntryMetadata> {
    let file_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StoreError::MalformedName {
            name: dir.display().to_string(),
            reason: "directory name is missing or not valid UTF-8".into(),
        })?;
    let name = decode(file_name)?;

    let mut metadata = EntryMetadata::from_name(name);
    metadata.image = read_image(dir);
    metadata.description = read_description(dir);
    Ok(metadata)
}

/// The first image found in [`ImageFormat::ALL`] order, if any.
fn read_image(dir: &Path) -> Option<Image> {
    for format in ImageFormat::ALL {
        let path = dir.join(image_file_name(format));
        match fs::read(&path) {
            Ok(data) => return Some(Image::new(format, data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read image file");
            }
        }
    }
    None
}

fn read_description(dir: &Path) -> Option<String> {
    let path = dir.join(DESCRIPTION_FILE);
    match fs::read(&path) {
        Ok(bytes) => Some(String::from_utf8(bytes).unwrap_or_else(|e| {
            warn!(path = %path.display(), "description is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        })),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read description");
            None
        }
    }
}

/// Create the directory for `metadata` under `parent` and write its files.
///
/// `description.txt` is always written (empty when the description is
/// unset). The image file is written only when image data is present and
/// non-empty. Returns the new directory.
pub fn write_metadata(parent: &Path, metadata: &EntryMetadata) -> StoreResult<PathBuf> {
    let dir = parent.join(metadata.encoded_name());
    fs::create_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
    debug!(dir = %dir.display(), "created entry directory");

    let description_path = dir.join(DESCRIPTION_FILE);
    fs::write(
        &description_path,
        metadata.description.as_deref().unwrap_or_default(),
    )
    .map_err(|e| StoreError::io(&description_path, e))?;

    if let Some(image) = metadata.image.as_ref().filter(|img| !img.data.is_empty()) {
        let image_path = dir.join(image_file_name(image.format));
        fs::write(&image_path, &image.data).map_err(|e| StoreError::io(&image_path, e))?;
    }

    Ok(dir)
}

//! Foundation types for the item archive.
//!
//! The archive is a tree of directories. Every directory that belongs to the
//! archive carries an *encoded name* of the form
//! `<id>[.<tag>...].{item|container}`, so the id, the tags, and the entry
//! kind can all be recovered from the directory name alone.
//!
//! # Key Types
//!
//! - [`EntryName`] -- the decoded `(id, tags, kind)` triple of a directory name
//! - [`EntryKind`] -- leaf item or container
//! - [`EntryMetadata`] -- the full record of an entry, including the optional
//!   description and image stored inside its directory
//! - [`ImageFormat`] / [`Image`] -- the fixed set of supported image formats
//!
//! The [`name`] module holds the codec itself plus the validation rules
//! applied to ids and tags of newly created entries.

pub mod entry;
pub mod error;
pub mod name;

pub use entry::{EntryKind, EntryMetadata, Image, ImageFormat};
pub use error::TypeError;
pub use name::{decode, encode, validate_id, validate_tag, EntryName, DELIMITER};

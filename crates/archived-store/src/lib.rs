//! Directory-backed entry storage for the item archive.
//!
//! The filesystem is the only source of truth. An [`Archive`] holds nothing
//! but the path of its root container; every call re-reads the directories
//! it needs.
//!
//! # On-disk layout
//!
//! ```text
//! archive.container/
//!   description.txt
//!   pantry.food.container/
//!     description.txt
//!     image.png
//!     apple.fruit.item/
//!       description.txt
//!       image.jpg
//! ```
//!
//! Each entry is one directory named by the codec in [`archived_types::name`].
//! Inside it live an optional `description.txt` and an optional
//! `image.{jpg,png,gif,svg}`. Subdirectories whose names do not decode are
//! not entries and are ignored everywhere.
//!
//! # Modules
//!
//! - [`metadata`] -- reading and writing the files inside one entry directory
//! - [`path`] -- mapping path segments to locations under the root
//! - [`archive`] -- the [`Archive`] type with Read, Create, Move and Delete
//! - [`search`] -- depth-first search over the whole tree
//!
//! # Consistency
//!
//! There is no locking. Each single filesystem call (mkdir, rename, recursive
//! remove) is as atomic as the platform makes it; sequences of calls are not.
//! A failed Create can leave a directory with only some of its files.

pub mod archive;
pub mod error;
pub mod metadata;
pub mod path;
pub mod search;

pub use archive::{Archive, Children, ReadResult};
pub use error::{StoreError, StoreResult};
pub use metadata::{read_metadata, write_metadata, DESCRIPTION_FILE};
pub use search::{Matcher, SearchHit, TermMatcher};

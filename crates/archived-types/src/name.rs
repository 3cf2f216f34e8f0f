//! Encoded directory names.
//!
//! An entry's directory name is its id, followed by each tag, followed by the
//! kind suffix, all joined with [`DELIMITER`]:
//!
//! ```text
//! some_cool_thing.multiple.fruit.item
//! ^ id            ^ tags         ^ kind
//! ```
//!
//! Only the position of a segment decides its role. A tag may be spelled
//! `item` or `container`; it is only read as the kind when it is the last
//! segment. The codec does not escape the delimiter, so ids and tags that
//! contain it cannot round-trip. [`validate_id`] and [`validate_tag`] reject
//! such names before a new entry is written.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;
use crate::error::TypeError;

/// Separator between the id, the tags, and the kind suffix.
pub const DELIMITER: char = '.';

/// Characters that must never appear in an id or tag of a new entry.
const FORBIDDEN_CHARS: &[char] = &[DELIMITER, '/', '\\', '\0'];

/// The decoded form of an encoded directory name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryName {
    pub id: String,
    pub tags: Vec<String>,
    pub kind: EntryKind,
}

impl EntryName {
    pub fn new(id: impl Into<String>, tags: Vec<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            tags,
            kind,
        }
    }

    /// The directory name for this entry.
    pub fn encode(&self) -> String {
        encode(&self.id, &self.tags, self.kind)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for EntryName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Build the directory name for `(id, tags, kind)`.
///
/// # Examples
///
/// ```
/// use archived_types::{encode, EntryKind};
///
/// assert_eq!(encode("apple", &["fruit"], EntryKind::Item), "apple.fruit.item");
/// assert_eq!(encode::<&str>("shelf", &[], EntryKind::Container), "shelf.container");
/// ```
pub fn encode<S: AsRef<str>>(id: &str, tags: &[S], kind: EntryKind) -> String {
    let mut name = String::with_capacity(id.len() + kind.suffix().len() + 1);
    name.push_str(id);
    for tag in tags {
        name.push(DELIMITER);
        name.push_str(tag.as_ref());
    }
    name.push(DELIMITER);
    name.push_str(kind.suffix());
    name
}

/// Split a directory name back into `(id, tags, kind)`.
///
/// Fails with [`TypeError::MalformedName`] when the name has no delimiter,
/// when the id is empty, or when the last segment is not a kind suffix.
///
/// # Examples
///
/// ```
/// use archived_types::{decode, EntryKind};
///
/// let name = decode("x.y.z.container").unwrap();
/// assert_eq!(name.id, "x");
/// assert_eq!(name.tags, vec!["y", "z"]);
/// assert_eq!(name.kind, EntryKind::Container);
///
/// assert!(decode("x").is_err());
/// ```
pub fn decode(name: &str) -> Result<EntryName, TypeError> {
    let segments: Vec<&str> = name.split(DELIMITER).collect();
    let (suffix, rest) = match segments.split_last() {
        Some((suffix, rest)) if !rest.is_empty() => (*suffix, rest),
        _ => {
            return Err(malformed(name, "expected at least an id and a kind suffix"));
        }
    };

    let kind = EntryKind::from_suffix(suffix)
        .ok_or_else(|| malformed(name, &format!("unknown kind suffix {suffix:?}")))?;

    let (id, tags) = rest
        .split_first()
        .ok_or_else(|| malformed(name, "missing id"))?;
    if id.is_empty() {
        return Err(malformed(name, "id must not be empty"));
    }

    Ok(EntryName {
        id: (*id).to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        kind,
    })
}

fn malformed(name: &str, reason: &str) -> TypeError {
    TypeError::MalformedName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate the id of a new entry.
pub fn validate_id(id: &str) -> Result<(), TypeError> {
    validate_segment(id, "id")
}

/// Validate a tag of a new entry. Same rules as ids.
pub fn validate_tag(tag: &str) -> Result<(), TypeError> {
    validate_segment(tag, "tag")
}

fn validate_segment(value: &str, what: &str) -> Result<(), TypeError> {
    if value.is_empty() {
        return Err(TypeError::InvalidName {
            name: value.to_string(),
            reason: format!("{what} must not be empty"),
        });
    }
    if let Some(ch) = value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(TypeError::InvalidName {
            name: value.to_string(),
            reason: format!("{what} contains forbidden character: {ch:?}"),
        });
    }
    Ok(())
}

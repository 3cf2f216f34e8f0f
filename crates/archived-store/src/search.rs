//! Depth-first search over the archive tree.
//!
//! The walk starts below the root and visits children in name order,
//! reporting each entry before its descendants. Item directories are never
//! descended into. A subtree that cannot be read is logged and skipped; the
//! search as a whole never fails.

use archived_types::{decode, EntryMetadata};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::archive::Archive;
use crate::metadata::read_metadata;
use crate::path::relative_segments;

/// Decides whether an entry belongs in the search results.
///
/// Implementations must be deterministic and must not fail.
pub trait Matcher {
    fn matches(&self, metadata: &EntryMetadata) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&EntryMetadata) -> bool,
{
    fn matches(&self, metadata: &EntryMetadata) -> bool {
        self(metadata)
    }
}

/// The default matcher.
///
/// The query is split on whitespace. An entry matches when every term is a
/// case-insensitive substring of its id, of one of its tags, or of its
/// description. An empty query matches everything.
#[derive(Clone, Debug, Default)]
pub struct TermMatcher {
    terms: Vec<String>,
}

impl TermMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl Matcher for TermMatcher {
    fn matches(&self, metadata: &EntryMetadata) -> bool {
        let fields: Vec<String> = std::iter::once(&metadata.id)
            .chain(metadata.tags.iter())
            .chain(metadata.description.iter())
            .map(|field| field.to_lowercase())
            .collect();

        self.terms
            .iter()
            .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
    }
}

/// One search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    /// Encoded names from the root to the entry; usable as-is with
    /// [`Archive::read`], [`Archive::move_entry`] and [`Archive::delete`].
    pub path: Vec<String>,
    pub metadata: EntryMetadata,
}

fn is_entry_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| decode(name).is_ok())
}

impl Archive {
    /// Search with the default [`TermMatcher`].
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_with(&TermMatcher::new(query))
    }

    /// Walk every entry below the root and collect those `matcher` accepts.
    ///
    /// The root itself is not a candidate.
    pub fn search_with<M: Matcher + ?Sized>(&self, matcher: &M) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        let mut walker = WalkDir::new(self.root())
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_entry_dir);

        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = ?err.path(), error = %err, "skipping unreadable subtree during search");
                    continue;
                }
            };

            let metadata = match read_metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(path = %entry.path().display(), error = %err, "skipping entry during search");
                    if entry.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                    continue;
                }
            };
            if !metadata.kind.is_container() {
                walker.skip_current_dir();
            }

            if !matcher.matches(&metadata) {
                continue;
            }
            match relative_segments(self.root(), entry.path()) {
                Some(path) => hits.push(SearchHit { path, metadata }),
                None => warn!(path = %entry.path().display(), "entry outside archive root"),
            }
        }

        debug!(hits = hits.len(), "search complete");
        hits
    }
}

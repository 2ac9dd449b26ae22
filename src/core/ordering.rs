//! First-match ordering of documents into export position
//!
//! An [`OrderingSpec`] is an ordered list of path globs. Each document is
//! placed at the position of the first glob it matches; documents that
//! match nothing go last or are dropped, depending on `include_unmatched`.

use crate::core::document::DocumentNode;
use crate::error::{ExportError, Result};
use glob::{MatchOptions, Pattern};
use log::{debug, info};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled, ordered list of path globs
#[derive(Debug, Clone, Default)]
pub struct GlobList {
    patterns: Vec<Pattern>,
}

impl GlobList {
    /// Compile `patterns`, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| ExportError::invalid_pattern(p, e.msg))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Index of the first pattern matching `path`
    pub fn first_match(&self, path: &str) -> Option<usize> {
        self.patterns
            .iter()
            .position(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    /// Whether any pattern matches `path`
    pub fn is_match(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// Pattern source strings in declaration order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Declared export order
#[derive(Debug, Clone, Default)]
pub struct OrderingSpec {
    globs: GlobList,
    include_unmatched: bool,
}

/// Where a document was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Placed by the pattern at this index
    Pattern(usize),
    /// Matched no pattern; appended at the end
    Unmatched,
}

/// A document together with the slot that placed it
#[derive(Debug, Clone)]
pub struct Placement {
    pub document: DocumentNode,
    pub slot: Slot,
}

/// Result of ordering a document set
#[derive(Debug, Clone, Default)]
pub struct OrderedDocuments {
    /// Documents in final export order
    pub placed: Vec<Placement>,
    /// Unmatched documents excluded because `include_unmatched` is off
    pub dropped: Vec<DocumentNode>,
}

impl OrderedDocuments {
    /// Documents in final order
    pub fn documents(&self) -> impl Iterator<Item = &DocumentNode> {
        self.placed.iter().map(|p| &p.document)
    }

    /// Paths in final order
    pub fn paths(&self) -> Vec<&str> {
        self.documents().map(DocumentNode::path).collect()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

impl OrderingSpec {
    /// Compile an ordering spec from glob patterns
    pub fn new<S: AsRef<str>>(patterns: &[S], include_unmatched: bool) -> Result<Self> {
        Ok(Self {
            globs: GlobList::new(patterns)?,
            include_unmatched,
        })
    }

    /// Pattern source strings in declaration order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.sources()
    }

    pub fn include_unmatched(&self) -> bool {
        self.include_unmatched
    }

    /// The slot `path` would be placed in, or `None` if it would be dropped
    pub fn slot_for(&self, path: &str) -> Option<Slot> {
        match self.globs.first_match(path) {
            Some(idx) => Some(Slot::Pattern(idx)),
            None if self.include_unmatched => Some(Slot::Unmatched),
            None => None,
        }
    }

    /// Order `documents`.
    ///
    /// Patterns are visited in declaration order; each takes every
    /// not-yet-placed document it matches, in ordering-key order. Leftovers
    /// follow in the same order when `include_unmatched` is set.
    pub fn order(&self, mut documents: Vec<DocumentNode>) -> OrderedDocuments {
        documents.sort_by_cached_key(DocumentNode::ordering_key);

        let mut pending: Vec<Option<DocumentNode>> = documents.into_iter().map(Some).collect();
        let mut result = OrderedDocuments::default();

        for (idx, pattern) in self.globs.patterns.iter().enumerate() {
            let before = result.placed.len();
            for entry in pending.iter_mut() {
                let matches = entry
                    .as_ref()
                    .map(|doc| pattern.matches_with(doc.path(), MATCH_OPTIONS))
                    .unwrap_or(false);
                if matches {
                    if let Some(document) = entry.take() {
                        result.placed.push(Placement {
                            document,
                            slot: Slot::Pattern(idx),
                        });
                    }
                }
            }
            debug!(
                "Pattern '{}' placed {} documents",
                pattern.as_str(),
                result.placed.len() - before
            );
        }

        for document in pending.into_iter().flatten() {
            if self.include_unmatched {
                result.placed.push(Placement {
                    document,
                    slot: Slot::Unmatched,
                });
            } else {
                debug!("Dropping unmatched document: {}", document.path());
                result.dropped.push(document);
            }
        }

        if !result.dropped.is_empty() {
            info!(
                "{} documents matched no ordering pattern and were excluded",
                result.dropped.len()
            );
        }

        result
    }
}

//! Core types and logic of the export pipeline
//!
//! - DocumentNode: one Markdown file with its front matter
//! - OrderingSpec: first-match glob ordering
//! - Exporter: renders the index and full artifacts
//! - AdmonitionNormalizer: rewrites `:::` admonitions into block quotes
//! - VideoSelector: landing-page video picker state

pub mod admonition;
pub mod document;
pub mod export;
pub mod ordering;
pub mod video;

pub use admonition::{AdmonitionKind, AdmonitionNormalizer, CleanOutcome, UrlFix};
pub use document::{DocumentNode, OrderingKey, FRONT_MATTER_KEYS};
pub use export::{ExportArtifact, ExportArtifacts, Exporter};
pub use ordering::{GlobList, OrderedDocuments, OrderingSpec, Placement, Slot};
pub use video::{Video, VideoSelector};

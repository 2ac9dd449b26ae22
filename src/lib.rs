//! llmsexport: export an ordered Markdown documentation tree as llms.txt artifacts
//!
//! The library reads a Docusaurus-style content tree, orders its documents
//! with a first-match glob list, and renders two flat text artifacts:
//!
//! - an index (`llms.txt`) with one link per document
//! - a full concatenation (`llms-full.txt`) of every document body
//!
//! A post-processing pass rewrites `:::` admonitions into plain block quotes
//! and fixes known-broken URLs, so the artifacts read well outside the site.
//!
//! # Quick Start
//!
//! ## Rendering without touching the disk
//!
//! ```rust
//! use llmsexport::{DocumentNode, ExportConfig, MemorySink, Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let config = ExportConfig {
//!         title: "EVVM Documentation".to_string(),
//!         include_order: vec!["01-*/**".to_string()],
//!         ..Default::default()
//!     };
//!     let pipeline = Pipeline::new(config)?;
//!
//!     let documents = vec![DocumentNode::body_only(
//!         "01-Intro/index.md",
//!         ":::info[Setup]\nInstall the CLI.\n:::\n",
//!     )];
//!     let artifacts = pipeline.render_documents(documents, true)?;
//!     assert!(artifacts.full().content.contains("> **Note: Setup**"));
//!
//!     let mut sink = MemorySink::new();
//!     llmsexport::io::write_artifacts(&mut sink, &artifacts)?;
//!     assert_eq!(sink.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Building into the output directory
//!
//! ```rust,no_run
//! use llmsexport::{ArtifactWriter, ExportConfig, Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let config = ExportConfig::from_file("llmsexport.yaml")?;
//!     let mut writer = ArtifactWriter::new(&config.out_dir);
//!     let pipeline = Pipeline::new(config)?;
//!     pipeline.build(&mut writer, true)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`](self::core): document model, ordering, rendering, admonition rules, video picker
//! - [`io`]: content tree reading and artifact sinks
//! - [`config`]: typed YAML configuration with defaults
//! - [`pipeline`]: the end-to-end build and clean passes
//! - [`error`]: error taxonomy

// Public API exports
pub use error::{ExportError, Result};

// Core types
pub use self::core::{
    AdmonitionKind, AdmonitionNormalizer, CleanOutcome, DocumentNode, ExportArtifact,
    ExportArtifacts, Exporter, OrderedDocuments, OrderingSpec, Slot, UrlFix, Video,
    VideoSelector,
};

// IO types
pub use io::{
    ArtifactSink, ArtifactWriter, DocumentReader, LineEndings, MemorySink, ReaderConfig,
    WriteResult, WriterConfig,
};

pub use config::{AdmonitionConfig, ExportConfig};
pub use pipeline::Pipeline;

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;

// CLI components are available only in the binary, not as part of the library API

/// Convenience functions for common operations
pub mod convenience {
    //! Convenience functions with default settings, for scripts that do not
    //! need fine-grained control.

    use crate::{AdmonitionNormalizer, CleanOutcome, DocumentNode, DocumentReader, Result};
    use std::path::Path;

    /// Read every document under `root`
    pub fn read_documents<P: AsRef<Path>>(root: P) -> Result<Vec<DocumentNode>> {
        DocumentReader::new().read_tree(root)
    }

    /// Normalize admonitions in a string with the default URL fixes
    pub fn normalize_text(text: &str) -> Result<String> {
        Ok(AdmonitionNormalizer::with_defaults()?.normalize(text))
    }

    /// Normalize one file in place with the default URL fixes
    pub fn clean_file<P: AsRef<Path>>(path: P) -> Result<CleanOutcome> {
        AdmonitionNormalizer::with_defaults()?.clean_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_end_to_end_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("docs");
        fs::create_dir_all(docs.join("01-Intro")).unwrap();
        fs::write(
            docs.join("01-Intro/index.md"),
            "---\ntitle: Welcome\ndescription: Start here\n---\n# Welcome\n\n:::tip[Faucet]\nGet test tokens.\n:::\n",
        )
        .unwrap();

        let config = ExportConfig {
            title: "Docs".to_string(),
            docs_dir: docs,
            out_dir: temp_dir.path().join("build"),
            include_order: vec!["01-*/**".to_string()],
            ..Default::default()
        };
        let mut writer = ArtifactWriter::new(&config.out_dir);
        let pipeline = Pipeline::new(config).unwrap();

        let results = pipeline.build(&mut writer, false).unwrap();
        assert_eq!(results.len(), 2);

        let full_path = temp_dir.path().join("build/llms-full.txt");
        assert!(fs::read_to_string(&full_path).unwrap().contains(":::tip[Faucet]"));

        let outcomes = pipeline.clean().unwrap();
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, CleanOutcome::Cleaned { .. })));

        let cleaned = fs::read_to_string(&full_path).unwrap();
        assert!(cleaned.contains("> **Tip: Faucet**\nGet test tokens."));
        assert!(!cleaned.contains(":::"));
    }

    #[test]
    fn test_convenience_functions() {
        assert_eq!(
            convenience::normalize_text(":::warning Be careful").unwrap(),
            "> **Warning: Be careful**"
        );

        let temp_dir = TempDir::new().unwrap();
        let outcome = convenience::clean_file(temp_dir.path().join("missing.txt")).unwrap();
        assert!(matches!(outcome, CleanOutcome::Skipped { .. }));
    }

    #[test]
    fn test_error_handling() {
        let config = ExportConfig {
            include_order: vec!["docs/a**".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(config).err(),
            Some(ExportError::InvalidPattern { .. })
        ));

        let temp_dir = TempDir::new().unwrap();
        let result = convenience::read_documents(temp_dir.path().join("nope"));
        assert!(matches!(
            result.unwrap_err(),
            ExportError::FileNotFound { .. }
        ));
    }
}

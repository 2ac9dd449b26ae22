//! End-to-end export pipeline
//!
//! read content tree → order → render artifacts → (normalize) → sink.
//! The `clean` pass is also available on its own, over the artifacts
//! already sitting in the output directory.

use crate::config::ExportConfig;
use crate::core::{
    AdmonitionNormalizer, CleanOutcome, DocumentNode, ExportArtifacts, Exporter, OrderedDocuments,
};
use crate::error::Result;
use crate::io::{write_artifacts, ArtifactSink, DocumentReader, WriteResult};
use log::info;

/// A configured export pipeline
pub struct Pipeline {
    reader: DocumentReader,
    exporter: Exporter,
    normalizer: AdmonitionNormalizer,
}

impl Pipeline {
    /// Compile every glob and rule of `config`
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = AdmonitionNormalizer::new(&config.admonitions.url_fixes)?;
        let exporter = Exporter::new(config)?;

        Ok(Self {
            reader: DocumentReader::new(),
            exporter,
            normalizer,
        })
    }

    /// Replace the content tree reader
    pub fn with_reader(mut self, reader: DocumentReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        self.exporter.config()
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn normalizer(&self) -> &AdmonitionNormalizer {
        &self.normalizer
    }

    /// Read the configured docs directory
    pub fn read(&self) -> Result<Vec<DocumentNode>> {
        self.reader.read_tree(&self.config().docs_dir)
    }

    /// Read and order the content tree
    pub fn order(&self) -> Result<OrderedDocuments> {
        Ok(self.exporter.order(self.read()?))
    }

    /// Render both artifacts, normalizing admonitions when `normalize` is set
    pub fn render(&self, normalize: bool) -> Result<ExportArtifacts> {
        let artifacts = self.exporter.render(&self.order()?)?;
        Ok(self.finish(artifacts, normalize))
    }

    /// Render `documents` instead of reading the docs directory
    pub fn render_documents(
        &self,
        documents: Vec<DocumentNode>,
        normalize: bool,
    ) -> Result<ExportArtifacts> {
        Ok(self.finish(self.exporter.build(documents)?, normalize))
    }

    /// Render and hand both artifacts to `sink`
    pub fn build<S: ArtifactSink + ?Sized>(
        &self,
        sink: &mut S,
        normalize: bool,
    ) -> Result<Vec<WriteResult>> {
        let artifacts = self.render(normalize)?;
        write_artifacts(sink, &artifacts)
    }

    /// Normalize the artifacts in the output directory in place
    pub fn clean(&self) -> Result<Vec<CleanOutcome>> {
        self.normalizer.clean_files(&self.config().artifact_paths())
    }

    fn finish(&self, artifacts: ExportArtifacts, normalize: bool) -> ExportArtifacts {
        if normalize {
            info!("Normalizing admonitions in rendered artifacts");
            artifacts.map_content(|content| self.normalizer.normalize(content))
        } else {
            artifacts
        }
    }
}

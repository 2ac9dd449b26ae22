//! Rendering of the two export artifacts
//!
//! The [`Exporter`] orders a document set with the configured
//! [`OrderingSpec`], transforms each body, and renders:
//!
//! - the index artifact: one link per document, in final order
//! - the full artifact: every document body concatenated in final order
//!
//! Rendering is pure. Writing the result is left to an
//! [`ArtifactSink`](crate::io::ArtifactSink).

use crate::config::ExportConfig;
use crate::core::document::{DocumentNode, FenceState};
use crate::core::ordering::{GlobList, OrderedDocuments, OrderingSpec};
use crate::error::Result;
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashSet;

const IMPORT_PATTERN: &str =
    r#"^\s*import\s+(?:[\w*{}\s,$]+\s+from\s+)?['"][^'"]+['"]\s*;?\s*$"#;

const FULL_PREAMBLE: &str = "This file contains all documentation content in a single document following the llmstxt.org standard.";

/// One generated flat-text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name relative to the output directory
    pub name: String,
    pub content: String,
}

/// The index and full artifacts of one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifacts {
    index: ExportArtifact,
    full: ExportArtifact,
}

impl ExportArtifacts {
    /// The link index (`llms.txt`)
    pub fn index(&self) -> &ExportArtifact {
        &self.index
    }

    /// The full concatenation (`llms-full.txt`)
    pub fn full(&self) -> &ExportArtifact {
        &self.full
    }

    /// Content of the artifact called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|a| a.name == name)
            .map(|a| a.content.as_str())
    }

    /// Both artifacts, index first
    pub fn iter(&self) -> impl Iterator<Item = &ExportArtifact> {
        [&self.index, &self.full].into_iter()
    }

    /// Rewrite the content of both artifacts with `f`
    pub fn map_content<F: Fn(&str) -> String>(mut self, f: F) -> Self {
        self.index.content = f(&self.index.content);
        self.full.content = f(&self.full.content);
        self
    }
}

/// Orders documents and renders export artifacts
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
    ordering: OrderingSpec,
    ignore: GlobList,
    import_re: Regex,
}

impl Exporter {
    /// Compile the globs and patterns of `config`
    pub fn new(config: ExportConfig) -> Result<Self> {
        let ordering = OrderingSpec::new(&config.include_order, config.include_unmatched_last)?;
        let ignore = GlobList::new(&config.ignore_files)?;
        let import_re = Regex::new(IMPORT_PATTERN)?;

        Ok(Self {
            config,
            ordering,
            ignore,
            import_re,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn ordering(&self) -> &OrderingSpec {
        &self.ordering
    }

    /// Remove ignored documents, then apply the ordering spec
    pub fn order(&self, documents: Vec<DocumentNode>) -> OrderedDocuments {
        let documents: Vec<DocumentNode> = documents
            .into_iter()
            .filter(|doc| {
                let ignored = self.ignore.is_match(doc.path());
                if ignored {
                    debug!("Ignoring document: {}", doc.path());
                }
                !ignored
            })
            .collect();

        self.ordering.order(documents)
    }

    /// Order `documents` and render both artifacts
    pub fn build(&self, documents: Vec<DocumentNode>) -> Result<ExportArtifacts> {
        let ordered = self.order(documents);
        self.render(&ordered)
    }

    /// Render both artifacts from an already ordered document set
    pub fn render(&self, ordered: &OrderedDocuments) -> Result<ExportArtifacts> {
        if ordered.is_empty() {
            warn!("No documents to export");
        }

        let index = ExportArtifact {
            name: self.config.llms_txt_filename.clone(),
            content: self.render_index(ordered),
        };
        let full = ExportArtifact {
            name: self.config.llms_full_txt_filename.clone(),
            content: self.render_full(ordered)?,
        };

        info!(
            "Rendered {} ({} bytes) and {} ({} bytes) from {} documents",
            index.name,
            index.content.len(),
            full.name,
            full.content.len(),
            ordered.len()
        );

        Ok(ExportArtifacts { index, full })
    }

    fn render_header(&self) -> String {
        let mut out = format!("# {}\n\n", self.config.title);
        if !self.config.description.trim().is_empty() {
            out.push_str(&format!("> {}\n\n", self.config.description.trim()));
        }
        out
    }

    fn render_index(&self, ordered: &OrderedDocuments) -> String {
        let mut out = self.render_header();
        out.push_str("## Table of Contents\n\n");

        for doc in ordered.documents() {
            let url = self.page_url(doc);
            match doc.description() {
                Some(description) => {
                    out.push_str(&format!("- [{}]({}): {}\n", doc.title(), url, description))
                }
                None => out.push_str(&format!("- [{}]({})\n", doc.title(), url)),
            }
        }

        out
    }

    fn render_full(&self, ordered: &OrderedDocuments) -> Result<String> {
        let mut out = self.render_header();
        out.push_str(FULL_PREAMBLE);
        out.push_str("\n\n");

        let mut seen_headings: HashSet<String> = HashSet::new();
        let mut sections = Vec::with_capacity(ordered.len());

        for doc in ordered.documents() {
            let title = doc.title();
            seen_headings.insert(title.clone());

            let mut section = format!("## {}\n\n", title);
            if let Some(block) = self.front_matter_block(doc)? {
                section.push_str(&block);
                section.push_str("\n\n");
            }

            let body = self.transform_body(doc.body(), &mut seen_headings);
            section.push_str(&body);
            sections.push(section.trim_end().to_string());
        }

        out.push_str(&sections.join("\n\n---\n\n"));
        out.push('\n');
        Ok(out)
    }

    /// Apply import stripping and heading dedupe to one body
    pub fn transform_body(&self, body: &str, seen_headings: &mut HashSet<String>) -> String {
        let body = if self.config.exclude_imports {
            strip_imports(body, &self.import_re)
        } else {
            body.lines().collect::<Vec<_>>().join("\n")
        };

        let body = if self.config.remove_duplicate_headings {
            remove_duplicate_headings(&body, seen_headings)
        } else {
            body
        };

        body.trim_matches('\n').to_string()
    }

    fn front_matter_block(&self, doc: &DocumentNode) -> Result<Option<String>> {
        let retained = doc.retained_front_matter(&self.config.keep_front_matter);
        if retained.is_empty() {
            return Ok(None);
        }

        let map: serde_yaml::Mapping = retained
            .into_iter()
            .map(|(key, value)| (serde_yaml::Value::String(key.to_string()), value))
            .collect();

        let yaml = serde_yaml::to_string(&map)?;
        Ok(Some(format!(
            "---\n{}\n---",
            yaml.trim_start_matches("---").trim()
        )))
    }

    /// Absolute URL of a document's rendered page
    pub fn page_url(&self, doc: &DocumentNode) -> String {
        let site = self.config.site_url.trim_end_matches('/');
        let base = self.config.docs_route_base.trim_matches('/');
        let route = doc.route();

        let mut url = site.to_string();
        if !base.is_empty() {
            url.push('/');
            url.push_str(base);
        }
        if !route.is_empty() {
            url.push('/');
            url.push_str(&route);
        }
        url
    }
}

/// Remove import statement lines, collapsing the blank lines they leave
pub fn strip_imports(body: &str, import_re: &Regex) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut after_import = false;

    for line in body.lines() {
        if import_re.is_match(line) {
            after_import = true;
            continue;
        }

        let blank = line.trim().is_empty();
        if blank && after_import && out.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }

        after_import = false;
        out.push(line);
    }

    out.join("\n")
}

/// Drop level-1 headings whose text is already in `seen`
pub fn remove_duplicate_headings(body: &str, seen: &mut HashSet<String>) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fence = FenceState::default();
    let mut dropped_last = false;

    for line in body.lines() {
        if !fence.advance(line) {
            if let Some(text) = line.trim_start().strip_prefix("# ") {
                let text = text.trim().to_string();
                if seen.contains(&text) {
                    debug!("Removing duplicate heading: {}", text);
                    dropped_last = true;
                    continue;
                }
                seen.insert(text);
            }
        }

        if dropped_last && line.trim().is_empty() && out.last().map_or(true, |l| l.trim().is_empty())
        {
            continue;
        }

        dropped_last = false;
        out.push(line);
    }

    out.join("\n")
}

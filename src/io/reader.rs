//! Content tree reading and front matter parsing
//!
//! Walks the docs directory, parses each Markdown file's YAML front matter
//! with `gray_matter`, and produces [`DocumentNode`]s keyed by their path
//! relative to the content root.

use crate::core::DocumentNode;
use crate::error::{ExportError, Result};
use gray_matter::{engine::YAML, Matter};
use log::{debug, warn};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Configuration for the content tree reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Extensions treated as documents (lowercase, no dot)
    pub extensions: Vec<String>,
    /// Include files and directories whose name starts with `.`
    pub include_hidden: bool,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
            include_hidden: false,
            follow_links: false,
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// Reads a Markdown content tree into document nodes
pub struct DocumentReader {
    config: ReaderConfig,
    matter: Matter<YAML>,
}

impl DocumentReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            matter: Matter::<YAML>::new(),
        }
    }

    /// Read every document under `root`, in file-name order
    pub fn read_tree<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DocumentNode>> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ExportError::file_not_found(root));
        }

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || self.config.include_hidden || !is_hidden(e));

        let mut documents = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                ExportError::path_resolution(format!("Error traversing directory: {}", e))
            })?;

            if !entry.file_type().is_file() || !self.is_document(entry.path()) {
                continue;
            }

            let relative = entry.path().strip_prefix(root).map_err(|e| {
                ExportError::path_resolution(format!(
                    "{} is outside {}: {}",
                    entry.path().display(),
                    root.display(),
                    e
                ))
            })?;
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            debug!("Reading document: {}", relative);
            documents.push(self.read_file(entry.path(), relative)?);
        }

        if documents.is_empty() {
            warn!("No documents found under {}", root.display());
        }

        Ok(documents)
    }

    /// Read one file, recording it under `relative_path`
    pub fn read_file<P: AsRef<Path>>(
        &self,
        path: P,
        relative_path: impl Into<String>,
    ) -> Result<DocumentNode> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ExportError::file_not_found(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path)?;
            if metadata.len() > max_size {
                return Err(ExportError::validation(format!(
                    "File too large: {} ({} bytes, limit: {} bytes)",
                    path.display(),
                    metadata.len(),
                    max_size
                )));
            }
        }

        let content = fs::read_to_string(path)?;
        self.parse_content(&content, relative_path)
    }

    /// Split front matter from body and build a node
    pub fn parse_content(
        &self,
        content: &str,
        relative_path: impl Into<String>,
    ) -> Result<DocumentNode> {
        let relative_path = relative_path.into();

        if !content.trim_start().starts_with("---") {
            return Ok(DocumentNode::body_only(relative_path, content));
        }

        let parsed = self.matter.parse(content);
        let front_matter = match parsed.data {
            Some(data) => match data.deserialize::<serde_yaml::Value>() {
                Ok(value) => Some(value),
                Err(e) => {
                    return Err(ExportError::invalid_front_matter(
                        &relative_path,
                        format!("Failed to deserialize front matter: {}", e),
                    ));
                }
            },
            None => None,
        };

        DocumentNode::from_yaml_value(relative_path, front_matter, parsed.content)
    }

    /// Whether `path` has one of the configured extensions
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.config.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

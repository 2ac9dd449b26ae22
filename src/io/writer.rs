//! Artifact writing: atomic file output, dry-run diffs, in-memory capture
//!
//! Rendering never touches the disk. Writing goes through an
//! [`ArtifactSink`], so the pipeline can target the output directory
//! ([`ArtifactWriter`]) or memory ([`MemorySink`]).

use crate::core::{ExportArtifact, ExportArtifacts};
use crate::error::{ExportError, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for rendered artifacts
pub trait ArtifactSink {
    /// Store one artifact, replacing any previous content under its name
    fn write_artifact(&mut self, artifact: &ExportArtifact) -> Result<WriteResult>;
}

/// Write both artifacts of a build to `sink`, index first
pub fn write_artifacts<S: ArtifactSink + ?Sized>(
    sink: &mut S,
    artifacts: &ExportArtifacts,
) -> Result<Vec<WriteResult>> {
    artifacts
        .iter()
        .map(|artifact| sink.write_artifact(artifact))
        .collect()
}

/// Configuration for the artifact writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
    /// Generate a diff instead of writing
    pub dry_run: bool,
    /// Line ending style
    pub line_endings: LineEndings,
}

/// Line ending styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEndings {
    /// Unix-style line endings (\n)
    Unix,
    /// Windows-style line endings (\r\n)
    Windows,
    /// Keep the rendered line endings
    Preserve,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            dry_run: false,
            line_endings: LineEndings::Preserve,
        }
    }
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Artifact name
    pub name: String,
    /// Whether the stored content differs from what was there before
    pub modified: bool,
    /// Path where the content was written (None for in-memory sinks)
    pub output_path: Option<PathBuf>,
    /// Unified diff showing changes (dry run only)
    pub diff: Option<String>,
}

/// Writes artifacts into an output directory
pub struct ArtifactWriter {
    out_dir: PathBuf,
    config: WriterConfig,
}

impl ArtifactWriter {
    /// Create a new writer with default configuration
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(out_dir, WriterConfig::default())
    }

    /// Create a new writer with custom configuration
    pub fn with_config(out_dir: impl Into<PathBuf>, config: WriterConfig) -> Self {
        Self {
            out_dir: out_dir.into(),
            config,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Normalize line endings based on configuration
    fn normalize_line_endings(&self, content: &str) -> String {
        match self.config.line_endings {
            LineEndings::Unix => content.replace("\r\n", "\n").replace('\r', "\n"),
            LineEndings::Windows => content
                .replace("\r\n", "\n")
                .replace('\r', "\n")
                .replace('\n', "\r\n"),
            LineEndings::Preserve => content.to_string(),
        }
    }
}

impl ArtifactSink for ArtifactWriter {
    fn write_artifact(&mut self, artifact: &ExportArtifact) -> Result<WriteResult> {
        let path = self.out_dir.join(&artifact.name);
        let content = self.normalize_line_endings(&artifact.content);

        let original = if path.is_file() {
            Some(fs::read_to_string(&path)?)
        } else {
            None
        };
        let modified = original.as_deref() != Some(content.as_str());

        if self.config.dry_run {
            let diff = generate_diff(original.as_deref().unwrap_or(""), &content, &path);
            return Ok(WriteResult {
                name: artifact.name.clone(),
                modified,
                output_path: Some(path),
                diff,
            });
        }

        fs::create_dir_all(&self.out_dir)?;

        if self.config.atomic_writes {
            write_atomic(&path, &content)?;
        } else {
            fs::write(&path, &content)?;
        }
        info!("Wrote {} ({} bytes)", path.display(), content.len());

        Ok(WriteResult {
            name: artifact.name.clone(),
            modified,
            output_path: Some(path),
            diff: None,
        })
    }
}

/// Keeps artifacts in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn write_artifact(&mut self, artifact: &ExportArtifact) -> Result<WriteResult> {
        let previous = self
            .artifacts
            .insert(artifact.name.clone(), artifact.content.clone());
        debug!("Captured {} in memory", artifact.name);

        Ok(WriteResult {
            name: artifact.name.clone(),
            modified: previous.as_deref() != Some(artifact.content.as_str()),
            output_path: None,
            diff: None,
        })
    }
}

/// Write file atomically using temporary file
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;

    temp_file.persist(path).map_err(|e| {
        ExportError::Io(std::io::Error::other(format!(
            "Failed to persist temporary file: {}",
            e
        )))
    })?;

    Ok(())
}

/// Generate unified diff between old and new content
pub fn generate_diff(old_content: &str, new_content: &str, path: &Path) -> Option<String> {
    if old_content == new_content {
        return None;
    }

    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let mut diff_lines = Vec::new();
    diff_lines.push(format!("--- {}", path.display()));
    diff_lines.push(format!("+++ {}", path.display()));

    // Trim the common prefix and suffix; one hunk covers the rest.
    let common_prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let old_rest = &old_lines[common_prefix..];
    let new_rest = &new_lines[common_prefix..];

    let common_suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old_rest[..old_rest.len() - common_suffix];
    let new_middle = &new_rest[..new_rest.len() - common_suffix];

    if !old_middle.is_empty() || !new_middle.is_empty() {
        diff_lines.push(format!(
            "@@ -{},{} +{},{} @@",
            common_prefix + 1,
            old_middle.len(),
            common_prefix + 1,
            new_middle.len()
        ));

        for line in old_middle {
            diff_lines.push(format!("-{}", line));
        }
        for line in new_middle {
            diff_lines.push(format!("+{}", line));
        }
    }

    if diff_lines.len() > 2 {
        Some(diff_lines.join("\n"))
    } else {
        None
    }
}

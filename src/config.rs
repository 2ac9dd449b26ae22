//! Typed configuration for the export pipeline
//!
//! One YAML file configures the generator (site metadata, include order,
//! transform flags), the admonition normalizer, and the landing-page video
//! list. Every field has a default, so an empty file is valid.

use crate::core::admonition::UrlFix;
use crate::core::document::FRONT_MATTER_KEYS;
use crate::core::video::Video;
use crate::error::{ExportError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "llmsexport.yaml";

/// Generator, normalizer and site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Site title, the first heading of both artifacts
    pub title: String,
    /// Site description, quoted under the title
    pub description: String,
    /// Base URL of the deployed site, e.g. `https://www.evvm.info`
    pub site_url: String,
    /// Route the docs plugin serves content under
    pub docs_route_base: String,
    /// Root of the Markdown content tree
    pub docs_dir: PathBuf,
    /// Build output directory
    pub out_dir: PathBuf,
    /// File name of the index artifact
    pub llms_txt_filename: String,
    /// File name of the full artifact
    pub llms_full_txt_filename: String,
    /// Ordered globs, matched against content-root relative paths
    pub include_order: Vec<String>,
    /// Append documents no glob matched; otherwise they are excluded
    pub include_unmatched_last: bool,
    /// Drop level-1 headings already emitted earlier in the full artifact
    pub remove_duplicate_headings: bool,
    /// Strip `import ... from '...'` lines from bodies
    pub exclude_imports: bool,
    /// Front matter keys kept in the full artifact
    pub keep_front_matter: Vec<String>,
    /// Globs of documents left out of both artifacts
    pub ignore_files: Vec<String>,
    pub admonitions: AdmonitionConfig,
    /// Landing-page tutorial videos, first entry selected initially
    pub videos: Vec<Video>,
}

/// Admonition normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmonitionConfig {
    /// Literal URL substitutions applied after the admonition rules
    pub url_fixes: Vec<UrlFix>,
}

impl Default for AdmonitionConfig {
    fn default() -> Self {
        Self {
            url_fixes: UrlFix::defaults(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            description: String::new(),
            site_url: String::new(),
            docs_route_base: "/docs".to_string(),
            docs_dir: PathBuf::from("docs"),
            out_dir: PathBuf::from("build"),
            llms_txt_filename: "llms.txt".to_string(),
            llms_full_txt_filename: "llms-full.txt".to_string(),
            include_order: Vec::new(),
            include_unmatched_last: true,
            remove_duplicate_headings: true,
            exclude_imports: true,
            keep_front_matter: FRONT_MATTER_KEYS.iter().map(|k| k.to_string()).collect(),
            ignore_files: Vec::new(),
            admonitions: AdmonitionConfig::default(),
            videos: Vec::new(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        if !path.is_file() {
            return Err(ExportError::file_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text; blank text yields the defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` if given, else `llmsexport.yaml` if it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check settings the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.llms_txt_filename.trim().is_empty() || self.llms_full_txt_filename.trim().is_empty()
        {
            return Err(ExportError::validation("artifact file names must not be empty"));
        }
        if self.llms_txt_filename == self.llms_full_txt_filename {
            return Err(ExportError::validation(format!(
                "index and full artifacts share the file name '{}'",
                self.llms_txt_filename
            )));
        }
        if let Some(fix) = self.admonitions.url_fixes.iter().find(|f| f.from.is_empty()) {
            return Err(ExportError::validation(format!(
                "URL fix to '{}' has an empty source string",
                fix.to
            )));
        }
        Ok(())
    }

    /// Paths of the index and full artifacts inside `out_dir`
    pub fn artifact_paths(&self) -> [PathBuf; 2] {
        [
            self.out_dir.join(&self.llms_txt_filename),
            self.out_dir.join(&self.llms_full_txt_filename),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert!(config.include_unmatched_last);
        assert!(config.remove_duplicate_headings);
        assert_eq!(
            config.keep_front_matter,
            vec!["title", "description", "sidebar_position"]
        );
        assert_eq!(config.admonitions.url_fixes, UrlFix::defaults());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ExportConfig::from_yaml_str(
            "title: EVVM\ninclude_order:\n  - \"01-*/**\"\ninclude_unmatched_last: false\n",
        )
        .unwrap();

        assert_eq!(config.title, "EVVM");
        assert_eq!(config.include_order, vec!["01-*/**"]);
        assert!(!config.include_unmatched_last);
        assert_eq!(config.llms_txt_filename, "llms.txt");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            ExportConfig::from_yaml_str("  \n").unwrap(),
            ExportConfig::default()
        );
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("llmsexport.yaml");
        fs::write(
            &path,
            "out_dir: public\nvideos:\n  - id: abc123\n    title: Intro\nadmonitions:\n  url_fixes:\n    - from: /old/\n      to: /new/\n",
        )
        .unwrap();

        let config = ExportConfig::from_file(&path).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("public"));
        assert_eq!(config.videos.len(), 1);
        assert_eq!(config.admonitions.url_fixes.len(), 1);
        assert_eq!(
            config.artifact_paths(),
            [
                PathBuf::from("public/llms.txt"),
                PathBuf::from("public/llms-full.txt")
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ExportConfig::from_file(temp_dir.path().join("missing.yaml"));
        assert!(matches!(
            result.unwrap_err(),
            ExportError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ExportConfig::from_yaml_str("include_order: {not: [a list");
        assert!(matches!(result.unwrap_err(), ExportError::Yaml(_)));
    }

    #[test]
    fn test_validate_rejects_same_names() {
        let config = ExportConfig {
            llms_full_txt_filename: "llms.txt".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ExportError::Validation { .. }
        ));
    }
}

//! Admonition normalizer for exported artifacts
//!
//! Rewrites Docusaurus admonitions (`:::kind[Label]`, `:::kind Text`,
//! bare `:::kind` ... `:::`) into plain Markdown block quotes, then applies
//! literal URL fixes. Rules run in a fixed order over the whole text; a line
//! rewritten by an earlier rule never starts with `:::` again, so later rules
//! do not see it.

use crate::error::Result;
use crate::io::write_atomic;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Recognized admonition kinds, in rule order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Tip,
    Info,
    Warning,
    Note,
    Caution,
    Danger,
    Important,
}

impl AdmonitionKind {
    pub const ALL: [AdmonitionKind; 7] = [
        Self::Tip,
        Self::Info,
        Self::Warning,
        Self::Note,
        Self::Caution,
        Self::Danger,
        Self::Important,
    ];

    /// Keyword after `:::`
    pub fn name(self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Caution => "caution",
            Self::Danger => "danger",
            Self::Important => "important",
        }
    }

    /// Bold prefix of the rewritten block quote. `info` renders as "Note".
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Tip => "Tip",
            Self::Info | Self::Note => "Note",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
            Self::Danger => "Danger",
            Self::Important => "Important",
        }
    }
}

/// A literal, global string substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFix {
    pub from: String,
    pub to: String,
}

impl UrlFix {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Known-broken routes of the exported docs
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("/docs/docs/", "/docs/")]
    }

    fn apply(&self, text: &str) -> String {
        if self.from.is_empty() {
            return text.to_string();
        }
        let mut out = text.replace(&self.from, &self.to);
        // `/docs/docs/docs/` needs more than one pass to settle.
        if !self.to.contains(&self.from) {
            while out.contains(&self.from) {
                out = out.replace(&self.from, &self.to);
            }
        }
        out
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Regex { pattern: Regex, replacement: String },
    Literal(UrlFix),
}

impl Rule {
    fn apply(&self, text: &str) -> String {
        match self {
            Rule::Regex {
                pattern,
                replacement,
            } => pattern.replace_all(text, replacement.as_str()).into_owned(),
            Rule::Literal(fix) => fix.apply(text),
        }
    }
}

/// Outcome of cleaning one artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The file existed and was normalized; `changed` is false if no rule matched
    Cleaned { path: PathBuf, changed: bool },
    /// The file does not exist
    Skipped { path: PathBuf },
}

/// Ordered rewrite rules for admonitions and broken URLs
#[derive(Debug, Clone)]
pub struct AdmonitionNormalizer {
    rules: Vec<Rule>,
}

impl AdmonitionNormalizer {
    /// Build the rule list: per kind the labeled, inline and bare forms,
    /// then the closing delimiter, then `url_fixes` in order.
    pub fn new(url_fixes: &[UrlFix]) -> Result<Self> {
        let mut rules = Vec::new();

        for kind in AdmonitionKind::ALL {
            let name = regex::escape(kind.name());
            let prefix = kind.prefix();

            rules.push(Rule::Regex {
                pattern: Regex::new(&format!(r"(?m)^[ \t]*:::{}\[(.*)\][ \t]*(\r?)$", name))?,
                replacement: format!("> **{}: ${{1}}**${{2}}", prefix),
            });
            rules.push(Rule::Regex {
                pattern: Regex::new(&format!(
                    r"(?m)^[ \t]*:::{}[ \t]+(\S(?:.*\S)?)[ \t]*(\r?)$",
                    name
                ))?,
                replacement: format!("> **{}: ${{1}}**${{2}}", prefix),
            });
            rules.push(Rule::Regex {
                pattern: Regex::new(&format!(r"(?m)^[ \t]*:::{}[ \t]*\r?(?:\n|\z)", name))?,
                replacement: String::new(),
            });
        }

        rules.push(Rule::Regex {
            pattern: Regex::new(r"(?m)^[ \t]*:::[ \t]*\r?(?:\n|\z)")?,
            replacement: String::new(),
        });

        rules.extend(url_fixes.iter().cloned().map(Rule::Literal));

        Ok(Self { rules })
    }

    /// Normalizer with the default URL fixes
    pub fn with_defaults() -> Result<Self> {
        Self::new(&UrlFix::defaults())
    }

    /// Apply every rule, in order, to `text`
    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule.apply(&out);
        }
        out
    }

    /// Normalize a file in place. Missing files are skipped.
    pub fn clean_file<P: AsRef<Path>>(&self, path: P) -> Result<CleanOutcome> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!("Skipping missing file: {}", path.display());
            return Ok(CleanOutcome::Skipped {
                path: path.to_path_buf(),
            });
        }

        let original = fs::read_to_string(path)?;
        let normalized = self.normalize(&original);
        let changed = normalized != original;

        if changed {
            write_atomic(path, &normalized)?;
        }
        debug!("Normalized {} (changed: {})", path.display(), changed);

        Ok(CleanOutcome::Cleaned {
            path: path.to_path_buf(),
            changed,
        })
    }

    /// Clean each path in turn
    pub fn clean_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<CleanOutcome>> {
        paths.iter().map(|p| self.clean_file(p)).collect()
    }
}

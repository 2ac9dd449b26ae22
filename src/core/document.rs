//! Document model for the export pipeline
//!
//! A [`DocumentNode`] is one Markdown file of the content tree: its path
//! relative to the content root, its scalar front matter fields, and its
//! body. Nodes are created by the reader and never mutated afterwards.

use crate::error::{ExportError, Result};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Front matter keys the site recognizes
pub const FRONT_MATTER_KEYS: [&str; 3] = ["title", "description", "sidebar_position"];

/// A single Markdown source file with its front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    path: String,
    front_matter: BTreeMap<String, String>,
    // Original YAML values, kept so retained fields keep their type.
    yaml: BTreeMap<String, serde_yaml::Value>,
    body: String,
}

impl DocumentNode {
    /// Create a node. Backslashes in `path` are normalized to `/`.
    pub fn new(
        path: impl Into<String>,
        front_matter: BTreeMap<String, String>,
        body: impl Into<String>,
    ) -> Self {
        let path = path.into().replace('\\', "/");
        Self {
            path: path.trim_start_matches("./").to_string(),
            front_matter,
            yaml: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Create a node with no front matter
    pub fn body_only(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(path, BTreeMap::new(), body)
    }

    /// Create a node from a parsed YAML front matter value.
    ///
    /// Scalar values are kept as strings; nested sequences and mappings are
    /// serialized back to flow YAML. `null` values are skipped.
    pub fn from_yaml_value(
        path: impl Into<String>,
        yaml_value: Option<serde_yaml::Value>,
        body: impl Into<String>,
    ) -> Result<Self> {
        let path = path.into();
        let mut yaml = BTreeMap::new();
        let front_matter = match yaml_value {
            Some(serde_yaml::Value::Mapping(map)) => {
                let mut fm = BTreeMap::new();
                for (k, v) in map {
                    let key = k.as_str().ok_or_else(|| {
                        ExportError::invalid_front_matter(
                            &path,
                            format!("Non-string key found: {:?}", k),
                        )
                    })?;
                    if let Some(value) = scalar_to_string(&v)? {
                        fm.insert(key.to_string(), value);
                        yaml.insert(key.to_string(), v);
                    }
                }
                fm
            }
            Some(serde_yaml::Value::Null) | None => BTreeMap::new(),
            Some(other) => {
                return Err(ExportError::invalid_front_matter(
                    &path,
                    format!("Expected mapping or null, found {:?}", other),
                ));
            }
        };

        let mut node = Self::new(path, front_matter, body);
        node.yaml = yaml;
        Ok(node)
    }

    /// Path relative to the content root, `/` separated
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All front matter fields
    pub fn front_matter(&self) -> &BTreeMap<String, String> {
        &self.front_matter
    }

    /// A single front matter field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.front_matter.get(key).map(String::as_str)
    }

    /// Front matter restricted to `keep`, in allow-list order.
    ///
    /// Fields read from YAML keep their original value; fields given as
    /// plain strings stay strings.
    pub fn retained_front_matter<'a>(
        &'a self,
        keep: &'a [String],
    ) -> Vec<(&'a str, serde_yaml::Value)> {
        keep.iter()
            .filter_map(|k| {
                let value = match self.yaml.get(k) {
                    Some(original) => original.clone(),
                    None => serde_yaml::Value::String(self.field(k)?.to_string()),
                };
                Some((k.as_str(), value))
            })
            .collect()
    }

    /// Markdown body without the front matter block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Title: front matter `title`, then the first `# ` heading, then the
    /// file stem without its number prefix.
    pub fn title(&self) -> String {
        if let Some(title) = self.field("title").filter(|t| !t.trim().is_empty()) {
            return title.trim().to_string();
        }

        if let Some(heading) = first_h1(&self.body) {
            return heading;
        }

        let file = self.path.rsplit('/').next().unwrap_or(&self.path);
        let (_, name) = split_number_prefix(file_stem(file));
        name.to_string()
    }

    /// Front matter `description`, if set and non-empty
    pub fn description(&self) -> Option<&str> {
        self.field("description")
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Key used as the stable secondary order
    pub fn ordering_key(&self) -> OrderingKey {
        let mut segments: Vec<KeySegment> = self
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                let (position, name) = split_number_prefix(segment);
                KeySegment {
                    position,
                    name: name.to_string(),
                }
            })
            .collect();

        // The file segment is keyed by its stem so that `01-a.md` and
        // `01-a.mdx` compare by name, not extension.
        if let Some(last) = segments.last_mut() {
            let file = self.path.rsplit('/').next().unwrap_or_default();
            let (position, name) = split_number_prefix(file_stem(file));
            last.position = position;
            last.name = name.to_string();
        }

        OrderingKey {
            segments,
            path: self.path.clone(),
        }
    }

    /// URL route of the rendered page, relative to the docs route base.
    ///
    /// A `slug` field starting with `/` wins. Otherwise the extension is
    /// dropped, number prefixes are stripped from every segment, and a
    /// trailing `index` or `README` collapses into its directory.
    pub fn route(&self) -> String {
        if let Some(slug) = self.field("slug").filter(|s| s.starts_with('/')) {
            return slug.trim_matches('/').to_string();
        }

        let parts: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let mut route: Vec<&str> = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = if i + 1 == parts.len() {
                file_stem(part)
            } else {
                part
            };
            let (_, name) = split_number_prefix(segment);
            route.push(name);
        }

        if let Some(last) = route.last() {
            if last.eq_ignore_ascii_case("index") || last.eq_ignore_ascii_case("readme") {
                route.pop();
            }
        }

        route.join("/")
    }
}

/// Secondary sort key derived from numeric path prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingKey {
    segments: Vec<KeySegment>,
    path: String,
}

/// One path segment of an [`OrderingKey`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySegment {
    /// Numeric prefix, e.g. `4` for `04-Contracts`
    pub position: Option<u64>,
    /// Segment name with the prefix removed
    pub name: String,
}

impl Ord for KeySegment {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numbered segments sort ahead of unnumbered ones.
        let by_position = match (self.position, other.position) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_position.then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for KeySegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for OrderingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a Docusaurus-style number prefix (`04-Contracts`, `1_intro`,
/// `02. Setup`) off a path segment.
pub fn split_number_prefix(segment: &str) -> (Option<u64>, &str) {
    let digits = segment.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, segment);
    }

    let rest = segment[digits..].trim_start();
    let separators = rest
        .bytes()
        .take_while(|b| matches!(b, b'-' | b'_' | b'.'))
        .count();
    if separators == 0 {
        return (None, segment);
    }

    let name = rest[separators..].trim_start();
    match name.chars().next() {
        Some(c) if !matches!(c, '-' | '_' | '.') => match segment[..digits].parse() {
            Ok(n) => (Some(n), name),
            Err(_) => (None, segment),
        },
        _ => (None, segment),
    }
}

fn file_stem(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    }
}

/// Line-by-line fenced code block state.
///
/// A fence opens on three or more backticks or tildes and closes only on a
/// bare run of the same character at least as long.
#[derive(Debug, Default)]
pub(crate) struct FenceState {
    open: Option<(u8, usize)>,
}

impl FenceState {
    /// Feed the next line. Returns true for fence markers and fenced content.
    pub(crate) fn advance(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match (self.open, fence_marker(trimmed)) {
            (None, Some(marker)) => {
                self.open = Some(marker);
                true
            }
            (Some((ch, len)), Some((marker_ch, marker_len)))
                if ch == marker_ch && marker_len >= len && trimmed[marker_len..].trim().is_empty() =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

fn fence_marker(line: &str) -> Option<(u8, usize)> {
    let first = *line.as_bytes().first()?;
    if first != b'`' && first != b'~' {
        return None;
    }
    let len = line.bytes().take_while(|&b| b == first).count();
    (len >= 3).then_some((first, len))
}

fn first_h1(body: &str) -> Option<String> {
    let mut fence = FenceState::default();
    for line in body.lines() {
        if fence.advance(line) {
            continue;
        }
        if let Some(text) = line.trim_start().strip_prefix("# ") {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn scalar_to_string(value: &serde_yaml::Value) -> Result<Option<String>> {
    Ok(match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        other => Some(serde_yaml::to_string(other)?.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_number_prefix() {
        assert_eq!(split_number_prefix("04-Contracts"), (Some(4), "Contracts"));
        assert_eq!(split_number_prefix("1_intro"), (Some(1), "intro"));
        assert_eq!(split_number_prefix("02. Setup"), (Some(2), "Setup"));
        assert_eq!(split_number_prefix("intro"), (None, "intro"));
        assert_eq!(split_number_prefix("2024"), (None, "2024"));
        assert_eq!(split_number_prefix("3-"), (None, "3-"));
    }

    #[test]
    fn test_from_yaml_value() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("title: Staking\nsidebar_position: 3\ndraft: false").unwrap();
        let node = DocumentNode::from_yaml_value("04-Contracts/staking.md", Some(yaml), "body")
            .unwrap();

        assert_eq!(node.field("title"), Some("Staking"));
        assert_eq!(node.field("sidebar_position"), Some("3"));
        assert_eq!(node.field("draft"), Some("false"));
    }

    #[test]
    fn test_from_yaml_value_rejects_sequence() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("[a, b]").unwrap();
        let result = DocumentNode::from_yaml_value("a.md", Some(yaml), "");
        assert!(matches!(
            result.unwrap_err(),
            ExportError::InvalidFrontMatter { .. }
        ));
    }

    #[test]
    fn test_title_fallbacks() {
        let mut fm = BTreeMap::new();
        fm.insert("title".to_string(), "From Front Matter".to_string());
        let node = DocumentNode::new("a.md", fm, "# From Heading");
        assert_eq!(node.title(), "From Front Matter");

        let node = DocumentNode::body_only("a.md", "```\n# not a heading\n```\n# From Heading\n");
        assert_eq!(node.title(), "From Heading");

        let node = DocumentNode::body_only("03-Guides/02-quick-start.md", "no heading");
        assert_eq!(node.title(), "quick-start");
    }

    #[test]
    fn test_route() {
        let node = DocumentNode::body_only("04-Contracts/01-EVVM/02-Payments.mdx", "");
        assert_eq!(node.route(), "Contracts/EVVM/Payments");

        let node = DocumentNode::body_only("01-Intro/index.md", "");
        assert_eq!(node.route(), "Intro");

        let mut fm = BTreeMap::new();
        fm.insert("slug".to_string(), "/getting-started".to_string());
        let node = DocumentNode::new("01-Intro/x.md", fm, "");
        assert_eq!(node.route(), "getting-started");
    }

    #[test]
    fn test_ordering_key_numeric() {
        let a = DocumentNode::body_only("2-b/x.md", "").ordering_key();
        let b = DocumentNode::body_only("10-a/x.md", "").ordering_key();
        let c = DocumentNode::body_only("zzz/x.md", "").ordering_key();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_ordering_key_lexicographic_without_prefixes() {
        let mut paths = vec!["docs/c/z.md", "docs/a/y.md", "docs/b/x.md"];
        paths.sort_by_key(|p| DocumentNode::body_only(*p, "").ordering_key());
        assert_eq!(paths, vec!["docs/a/y.md", "docs/b/x.md", "docs/c/z.md"]);
    }

    #[test]
    fn test_path_normalization() {
        let node = DocumentNode::body_only("./docs\\a\\y.md", "");
        assert_eq!(node.path(), "docs/a/y.md");
    }

    #[test]
    fn test_retained_front_matter() {
        let mut fm = BTreeMap::new();
        fm.insert("title".to_string(), "T".to_string());
        fm.insert("description".to_string(), "D".to_string());
        fm.insert("custom".to_string(), "C".to_string());
        let node = DocumentNode::new("a.md", fm, "");

        let keep = vec!["description".to_string(), "title".to_string()];
        assert_eq!(
            node.retained_front_matter(&keep),
            vec![
                ("description", serde_yaml::Value::String("D".to_string())),
                ("title", serde_yaml::Value::String("T".to_string())),
            ]
        );
    }

    #[test]
    fn test_retained_front_matter_keeps_yaml_types() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("title: \"007\"\nsidebar_position: 3").unwrap();
        let node = DocumentNode::from_yaml_value("a.md", Some(yaml), "").unwrap();

        let keep = vec!["title".to_string(), "sidebar_position".to_string()];
        assert_eq!(
            node.retained_front_matter(&keep),
            vec![
                ("title", serde_yaml::Value::String("007".to_string())),
                ("sidebar_position", serde_yaml::Value::Number(3.into())),
            ]
        );
        assert_eq!(node.field("sidebar_position"), Some("3"));
    }

    #[test]
    fn test_fence_closes_only_on_matching_marker() {
        let mut fence = FenceState::default();
        let fenced: Vec<bool> = ["~~~", "```", "# inside", "~~~", "# outside"]
            .iter()
            .map(|line| fence.advance(line))
            .collect();
        assert_eq!(fenced, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_title_skips_heading_in_tilde_fence() {
        let node = DocumentNode::body_only("guide.md", "~~~md\n```\n# Not it\n~~~\n# Guide\n");
        assert_eq!(node.title(), "Guide");
    }
}

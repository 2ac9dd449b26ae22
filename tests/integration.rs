//! Integration tests for the llmsexport library
//!
//! These run the read → order → render → clean pipeline against real
//! content trees in temporary directories.

use llmsexport::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_tree(root: &Path) {
    write(
        root,
        "01-Intro/index.md",
        r#"---
title: Welcome
description: Start here
sidebar_position: 1
---
import Tabs from '@theme/Tabs';

# Welcome

:::tip[Faucet]
Grab tokens at https://www.evvm.info/docs/docs/faucet
:::
"#,
    );
    write(
        root,
        "02-Guides/10-advanced.md",
        "# Advanced\n\n:::warning\nHere be dragons.\n:::\n",
    );
    write(root, "02-Guides/2-basics.md", "# Basics\n\nFirst steps.\n");
    write(root, "zz-Archive/notes.md", "# Notes\n\nOld material.\n");
    write(root, "02-Guides/diagram.png", "not markdown");
}

fn config_for(temp_dir: &TempDir) -> ExportConfig {
    ExportConfig {
        title: "EVVM Documentation".to_string(),
        description: "Virtual blockchains on top of existing chains".to_string(),
        site_url: "https://www.evvm.info".to_string(),
        docs_dir: temp_dir.path().join("docs"),
        out_dir: temp_dir.path().join("build"),
        include_order: vec!["01-*/**".to_string(), "02-*/**".to_string()],
        ..Default::default()
    }
}

#[test]
fn test_order_follows_patterns_then_numeric_prefixes() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let pipeline = Pipeline::new(config_for(&temp_dir)).unwrap();
    let ordered = pipeline.order().unwrap();

    assert_eq!(
        ordered.paths(),
        vec![
            "01-Intro/index.md",
            "02-Guides/2-basics.md",
            "02-Guides/10-advanced.md",
            "zz-Archive/notes.md",
        ]
    );
    assert_eq!(ordered.placed[3].slot, Slot::Unmatched);
    assert!(ordered.dropped.is_empty());
}

#[test]
fn test_unmatched_documents_are_dropped_when_disabled() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let config = ExportConfig {
        include_unmatched_last: false,
        ..config_for(&temp_dir)
    };
    let pipeline = Pipeline::new(config).unwrap();

    let ordered = pipeline.order().unwrap();
    assert_eq!(ordered.len(), 3);
    assert_eq!(ordered.dropped.len(), 1);
    assert_eq!(ordered.dropped[0].path(), "zz-Archive/notes.md");

    let artifacts = pipeline.render(true).unwrap();
    assert!(!artifacts.full().content.contains("Old material."));
    assert!(!artifacts.index().content.contains("Notes"));
}

#[test]
fn test_index_artifact_lists_documents_in_order() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let pipeline = Pipeline::new(config_for(&temp_dir)).unwrap();
    let artifacts = pipeline.render(false).unwrap();

    let expected = "# EVVM Documentation\n\
\n\
> Virtual blockchains on top of existing chains\n\
\n\
## Table of Contents\n\
\n\
- [Welcome](https://www.evvm.info/docs/Intro): Start here\n\
- [Basics](https://www.evvm.info/docs/Guides/basics)\n\
- [Advanced](https://www.evvm.info/docs/Guides/advanced)\n\
- [Notes](https://www.evvm.info/docs/zz-Archive/notes)\n";
    assert_eq!(artifacts.index().name, "llms.txt");
    assert_eq!(artifacts.index().content, expected);
}

#[test]
fn test_full_artifact_transforms_bodies() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let pipeline = Pipeline::new(config_for(&temp_dir)).unwrap();
    let full = pipeline.render(false).unwrap().full().content.clone();

    assert!(full.starts_with("# EVVM Documentation\n"));
    assert!(full.contains("## Welcome\n\n---\n"));
    assert!(full.contains("sidebar_position: 1"));
    assert!(!full.contains("import Tabs"));
    assert!(!full.contains("\n# Welcome"));
    assert!(full.contains(":::tip[Faucet]"));

    let welcome = full.find("## Welcome").unwrap();
    let basics = full.find("## Basics").unwrap();
    let advanced = full.find("## Advanced").unwrap();
    let notes = full.find("## Notes").unwrap();
    assert!(welcome < basics && basics < advanced && advanced < notes);
}

#[test]
fn test_build_then_clean_rewrites_artifacts_in_place() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let config = config_for(&temp_dir);
    let mut writer = ArtifactWriter::new(&config.out_dir);
    let pipeline = Pipeline::new(config).unwrap();

    let results = pipeline.build(&mut writer, false).unwrap();
    assert!(results.iter().all(|r| r.modified));

    let outcomes = pipeline.clean().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, CleanOutcome::Cleaned { .. })));

    let full_path = temp_dir.path().join("build/llms-full.txt");
    let cleaned = fs::read_to_string(&full_path).unwrap();
    assert!(cleaned.contains("> **Tip: Faucet**\nGrab tokens at https://www.evvm.info/docs/faucet"));
    assert!(cleaned.contains("Here be dragons."));
    assert!(!cleaned.contains(":::"));
    assert!(!cleaned.contains("/docs/docs/"));

    // A second pass finds nothing left to rewrite.
    let again = pipeline.clean().unwrap();
    assert!(again
        .iter()
        .all(|o| matches!(o, CleanOutcome::Cleaned { changed: false, .. })));
    assert_eq!(fs::read_to_string(&full_path).unwrap(), cleaned);
}

#[test]
fn test_build_with_normalization_matches_build_then_clean() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let pipeline = Pipeline::new(config_for(&temp_dir)).unwrap();
    let in_memory = pipeline.render(true).unwrap();

    let mut writer = ArtifactWriter::new(temp_dir.path().join("build"));
    pipeline.build(&mut writer, false).unwrap();
    pipeline.clean().unwrap();

    for artifact in in_memory.iter() {
        let on_disk = fs::read_to_string(temp_dir.path().join("build").join(&artifact.name)).unwrap();
        assert_eq!(on_disk, artifact.content);
    }
}

#[test]
fn test_dry_run_leaves_output_directory_untouched() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("docs"));

    let config = config_for(&temp_dir);
    let mut writer = ArtifactWriter::with_config(
        &config.out_dir,
        WriterConfig {
            dry_run: true,
            ..Default::default()
        },
    );
    let pipeline = Pipeline::new(config).unwrap();

    let results = pipeline.build(&mut writer, true).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.diff.is_some()));
    assert!(!temp_dir.path().join("build").exists());
}

#[test]
fn test_clean_skips_missing_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let pipeline = Pipeline::new(config).unwrap();

    let outcomes = pipeline.clean().unwrap();
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, CleanOutcome::Skipped { .. })));
}

#[test]
fn test_config_file_drives_the_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    sample_tree(&temp_dir.path().join("content"));

    let config_path = temp_dir.path().join("llmsexport.yaml");
    fs::write(
        &config_path,
        format!(
            r#"title: From YAML
docs_dir: {docs}
out_dir: {out}
llms_txt_filename: index.txt
include_order:
  - "02-*/**"
ignore_files:
  - "zz-*/**"
admonitions:
  url_fixes:
    - from: "https://www.evvm.info/docs/docs/"
      to: "https://docs.evvm.info/"
"#,
            docs = temp_dir.path().join("content").display(),
            out = temp_dir.path().join("out").display(),
        ),
    )
    .unwrap();

    let config = ExportConfig::load(Some(config_path.as_path())).unwrap();
    assert_eq!(config.llms_txt_filename, "index.txt");
    assert_eq!(config.llms_full_txt_filename, "llms-full.txt");

    let pipeline = Pipeline::new(config).unwrap();
    assert_eq!(
        pipeline.order().unwrap().paths(),
        vec![
            "02-Guides/2-basics.md",
            "02-Guides/10-advanced.md",
            "01-Intro/index.md",
        ]
    );

    let artifacts = pipeline.render(true).unwrap();
    assert!(artifacts.get("index.txt").is_some());
    assert!(artifacts
        .full()
        .content
        .contains("https://docs.evvm.info/faucet"));
}

#[test]
fn test_video_selector_from_config() {
    let config = ExportConfig::from_yaml_str(
        r#"videos:
  - id: abc123
    title: Intro
  - id: def456
    title: Deep dive
"#,
    )
    .unwrap();

    let mut selector = VideoSelector::new(config.videos).unwrap();
    assert_eq!(selector.selected().id, "abc123");
    assert!(selector.select("def456").unwrap());
    assert_eq!(selector.embed_url(), "https://www.youtube.com/embed/def456");
    assert!(selector.select("missing").is_err());
    assert!(selector.is_selected("def456"));
}

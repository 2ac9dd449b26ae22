//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use llmsexport::core::{CleanOutcome, OrderedDocuments, Slot};
use llmsexport::error::Result;
use llmsexport::io::{ArtifactWriter, DocumentReader, ReaderConfig, WriterConfig};
use llmsexport::{ExportConfig, Pipeline, VideoSelector};
use log::{debug, info, warn};

/// Execute the build command
pub fn build_command(mut config: ExportConfig, args: BuildArgs) -> Result<()> {
    debug!("Executing build command with args: {:?}", args);

    args.source.apply(&mut config);
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }

    let writer_config = WriterConfig {
        atomic_writes: !args.no_atomic,
        dry_run: args.dry_run,
        line_endings: args
            .line_endings
            .map(Into::into)
            .unwrap_or(llmsexport::LineEndings::Preserve),
    };
    let mut writer = ArtifactWriter::with_config(&config.out_dir, writer_config);
    let pipeline = create_pipeline(config, &args.source)?;

    if args.dry_run {
        // Diff against what a full build would leave on disk.
        let artifacts = pipeline.render(!args.no_clean)?;
        for result in llmsexport::io::write_artifacts(&mut writer, &artifacts)? {
            match result.diff {
                Some(diff) => println!("{}", diff),
                None => info!("{}: unchanged", result.name),
            }
        }
        return Ok(());
    }

    let results = pipeline.build(&mut writer, false)?;
    let unchanged = results.iter().filter(|r| !r.modified).count();
    if unchanged > 0 {
        debug!("{} artifacts unchanged since the last build", unchanged);
    }

    if !args.no_clean {
        print_clean_outcomes(&pipeline.clean()?);
    }

    Ok(())
}

/// Execute the clean command
pub fn clean_command(mut config: ExportConfig, args: CleanArgs) -> Result<()> {
    debug!("Executing clean command with args: {:?}", args);

    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }
    let pipeline = Pipeline::new(config)?;

    let outcomes = if args.files.is_empty() {
        pipeline.clean()?
    } else {
        pipeline.normalizer().clean_files(&args.files)?
    };

    print_clean_outcomes(&outcomes);
    Ok(())
}

/// Execute the order command
pub fn order_command(mut config: ExportConfig, args: OrderArgs) -> Result<()> {
    debug!("Executing order command with args: {:?}", args);

    args.source.apply(&mut config);
    let pipeline = create_pipeline(config, &args.source)?;
    let ordered = pipeline.order()?;

    let patterns: Vec<&str> = pipeline.exporter().ordering().patterns().collect();
    match args.format {
        OrderFormat::Human => output_order_human(&ordered, &patterns),
        OrderFormat::Json => output_order_json(&ordered, &patterns)?,
    }
    Ok(())
}

/// Execute the video command
pub fn video_command(config: ExportConfig, args: VideoArgs) -> Result<()> {
    let mut selector = VideoSelector::new(config.videos)?;
    if let Some(id) = &args.select {
        selector.select(id)?;
    }

    for video in selector.videos() {
        let marker = if selector.is_selected(&video.id) { "*" } else { " " };
        println!("{} {}  {}", marker, video.id, video.title);
    }
    println!("Embed: {}", selector.embed_url());
    Ok(())
}

// Helper functions

fn create_pipeline(config: ExportConfig, source: &SourceOptions) -> Result<Pipeline> {
    let reader = DocumentReader::with_config(ReaderConfig {
        include_hidden: source.include_hidden,
        ..Default::default()
    });
    Ok(Pipeline::new(config)?.with_reader(reader))
}

fn print_clean_outcomes(outcomes: &[CleanOutcome]) {
    for outcome in outcomes {
        match outcome {
            CleanOutcome::Cleaned { path, .. } => println!("Cleaned {}", path.display()),
            CleanOutcome::Skipped { path } => debug!("Skipped missing {}", path.display()),
        }
    }
}

fn slot_label<'a>(slot: Slot, patterns: &[&'a str]) -> &'a str {
    match slot {
        Slot::Pattern(idx) => patterns.get(idx).copied().unwrap_or("?"),
        Slot::Unmatched => "(unmatched)",
    }
}

fn output_order_human(ordered: &OrderedDocuments, patterns: &[&str]) {
    for (i, placement) in ordered.placed.iter().enumerate() {
        println!(
            "{:>4}. {}  [{}]",
            i + 1,
            placement.document.path(),
            slot_label(placement.slot, patterns)
        );
    }

    if !ordered.dropped.is_empty() {
        warn!("{} documents excluded from export", ordered.dropped.len());
        println!("Excluded:");
        for document in &ordered.dropped {
            println!("      {}", document.path());
        }
    }
}

fn output_order_json(ordered: &OrderedDocuments, patterns: &[&str]) -> Result<()> {
    let placed: Vec<serde_json::Value> = ordered
        .placed
        .iter()
        .map(|p| {
            let pattern = match p.slot {
                Slot::Pattern(_) => Some(slot_label(p.slot, patterns)),
                Slot::Unmatched => None,
            };
            serde_json::json!({
                "path": p.document.path(),
                "title": p.document.title(),
                "pattern": pattern,
            })
        })
        .collect();
    let dropped: Vec<&str> = ordered.dropped.iter().map(|d| d.path()).collect();

    let output = serde_json::to_string_pretty(&serde_json::json!({
        "documents": placed,
        "excluded": dropped,
    }))
    .map_err(|e| llmsexport::ExportError::validation(e.to_string()))?;
    println!("{}", output);
    Ok(())
}

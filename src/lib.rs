// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod types;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::model::ConvertSection;
use crate::config::{ConvertOptions, GroupSpec, load_and_validate};
use crate::manifest::StrictDigraph;
use crate::pipeline::{Conversion, RecordingProgress, convert_with};
use crate::types::Seconds;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workflow loading + validation
/// - option resolution (`[convert]` overridden by CLI flags)
/// - the conversion pipeline
/// - manifest output (stdout or `--output`)
pub fn run(args: CliArgs) -> Result<()> {
    let workflow_path = PathBuf::from(&args.workflow);
    let file = load_and_validate(&workflow_path)
        .with_context(|| format!("loading workflow {:?}", workflow_path))?;

    let options = resolve_options(&file.convert, &args)?;
    debug!(?options, "resolved conversion options");

    let mut progress = RecordingProgress::default();
    let conversion = convert_with(file.workflow, &options, &StrictDigraph, &mut progress)?;

    if args.dry_run {
        print_dry_run(&options, &progress, &conversion);
        return Ok(());
    }

    let json = conversion.manifest.to_json_pretty()?;
    match args.output {
        Some(ref path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing manifest to {path}"))?;
            info!(
                path = %path,
                tasks = conversion.manifest.tasks.len(),
                max_cores = conversion.manifest.max_cores,
                total_runtime = %conversion.manifest.total_runtime,
                "manifest written"
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Merge the `[convert]` section with command-line overrides.
///
/// CLI group tokens are appended after the file's, so an explicit cap given
/// on the command line wins for a group named in both places.
pub fn resolve_options(section: &ConvertSection, args: &CliArgs) -> Result<ConvertOptions> {
    let mut options = ConvertOptions::from_section(section)?;

    for token in args.groups.iter() {
        options.groups.push(token.parse::<GroupSpec>()?);
    }
    if let Some(max_cores) = args.max_cores {
        options.default_max_cores = Some(max_cores);
    }
    if args.no_sequence_fusion {
        options.sequence_fusion = false;
    }
    if let Some(buffer) = args.runtime_buffer {
        options.runtime_buffer = Seconds::Whole(buffer);
    }

    Ok(options)
}

/// Human-readable summary of a conversion.
fn print_dry_run(options: &ConvertOptions, progress: &RecordingProgress, conversion: &Conversion) {
    println!("dagmanifest dry-run");
    println!("  convert.max_cores = {:?}", options.default_max_cores);
    println!("  convert.sequence_fusion = {}", options.sequence_fusion);
    println!("  convert.runtime_buffer = {}", options.runtime_buffer);
    println!();

    println!("stages:");
    for report in progress.reports.iter() {
        println!(
            "  - {:<18} jobs: {:>5}  edges: {:>5}",
            report.stage.to_string(),
            report.jobs,
            report.edges
        );
    }
    println!();

    if !conversion.accounts.is_empty() {
        println!("fused groups ({}):", conversion.accounts.len());
        for account in conversion.accounts.iter() {
            println!("  - {}", account.group);
            println!("      members: {}", account.task_count);
            println!("      cores: {}", account.cores);
            println!("      runtime: {}", account.runtime);
            if let Some(cap) = account.cap {
                println!("      capped at: {cap}");
            }
        }
        println!();
    }

    if conversion.sequence_fusions > 0 {
        println!("sequence fusions: {}", conversion.sequence_fusions);
    }
    println!("tasks: {}", conversion.manifest.tasks.len());
    println!("resource steps: {}", conversion.manifest.resource_steps.len());
    println!("max cores: {}", conversion.manifest.max_cores);
    println!("total runtime: {}", conversion.manifest.total_runtime);

    debug!("dry-run complete (no manifest written)");
}

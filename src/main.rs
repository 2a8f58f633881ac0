mod classes;
mod cli;
mod error;
mod report;
mod story;
mod traverse;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use regex::Regex;

use cli::Cli;
use traverse::TraversalConfig;

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   storypaths story.json   # load + traversal summary
    //   RUST_LOG=debug  storypaths story.json   # + every emitted path
    //   RUST_LOG=trace  storypaths story.json   # + every visit and choice
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let (rendered, count) = match (&cli.classes, &cli.story) {
        (Some(dir), _) => {
            let sheets = classes::load_classes(dir)
                .with_context(|| format!("failed to load classes from {}", dir.display()))?;
            (report::render_classes(&sheets, cli.format)?, sheets.len())
        }
        (None, Some(path)) => {
            let records = story_paths(&cli, path)?;
            (report::render(&records, cli.format)?, records.len())
        }
        (None, None) => anyhow::bail!("either a story file or --classes <DIR> is required"),
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Wrote {count} entries to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Load, validate and traverse the story, then apply the --grep filter.
fn story_paths(cli: &Cli, path: &Path) -> Result<Vec<traverse::PathRecord>> {
    let mut story = story::load_story(path)
        .with_context(|| format!("failed to load story {}", path.display()))?;
    if let Some(start) = &cli.start {
        info!("Start node overridden: '{}' -> '{start}'", story.start);
        story.start = start.clone();
    }
    if !cli.no_validate {
        story.validate().context("story failed validation")?;
    }

    let config = TraversalConfig {
        max_depth: cli.max_depth,
    };
    let mut records = traverse::traverse(&story, &config)
        .with_context(|| format!("failed to enumerate paths from '{}'", story.start))?;

    if let Some(pattern) = &cli.grep {
        let pattern =
            Regex::new(pattern).with_context(|| format!("invalid --grep regex '{pattern}'"))?;
        records = report::filter_records(records, &pattern);
        info!("{} paths match '{pattern}'", records.len());
    }

    Ok(records)
}

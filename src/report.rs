pub mod html;

use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;

use crate::classes::ClassSheet;
use crate::story::abilities::Abilities;
use crate::traverse::PathRecord;

/// Output format for the path report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One block per path or class, for reading in a terminal.
    #[default]
    Text,
    /// The records as a JSON array.
    Json,
    /// A standalone HTML page with one bar chart row per path or class.
    Html,
}

pub fn render(records: &[PathRecord], format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(records)),
        Format::Json => {
            serde_json::to_string_pretty(records).context("failed to serialize path records")
        }
        Format::Html => Ok(html::render_html(records)),
    }
}

pub fn render_classes(classes: &[ClassSheet], format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_classes_text(classes)),
        Format::Json => {
            serde_json::to_string_pretty(classes).context("failed to serialize class sheets")
        }
        Format::Html => Ok(html::render_class_html(classes)),
    }
}

/// Keep only the records whose joined path trace matches `pattern`.
pub fn filter_records(records: Vec<PathRecord>, pattern: &Regex) -> Vec<PathRecord> {
    records
        .into_iter()
        .filter(|record| pattern.is_match(&record.trace()))
        .collect()
}

fn join_abilities(abilities: &Abilities) -> String {
    abilities
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_classes_text(classes: &[ClassSheet]) -> String {
    let mut out = String::new();
    for class in classes {
        out.push_str("---\n");
        out.push_str(&format!(
            "{} (HP: {}, Defense: {})\n",
            class.name, class.hp, class.defense
        ));
        out.push_str(&format!("Abilities: {}\n", join_abilities(&class.abilities)));
    }
    out.push_str(&format!("---\nTotal classes: {}\n", classes.len()));
    out
}

pub fn render_text(records: &[PathRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let abilities = join_abilities(&record.abilities);
        let classes = record
            .classes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        out.push_str("---\n");
        out.push_str(&format!("Path: {}\n", record.trace()));
        out.push_str(&format!("Abilities: {abilities}\n"));
        out.push_str(&format!("Classes: {classes}\n"));
    }
    out.push_str(&format!("---\nTotal paths: {}\n", records.len()));
    out
}

use std::path::PathBuf;

use clap::Parser;

use crate::report::Format;
use crate::traverse::MaxDepth;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Enumerates every path through a branching story and totals the abilities and classes gained along each one."
)]
pub struct Cli {
    /// Story definition (JSON with "start" and "questions")
    #[clap(required_unless_present = "classes")]
    pub story: Option<PathBuf>,

    /// Report the class sheets in this directory (*.json) instead of story paths
    #[clap(long, value_name = "DIR", conflicts_with = "story")]
    pub classes: Option<PathBuf>,

    /// Options a path may choose before it is cut off, or "unbounded"
    #[clap(long, env = "STORYPATHS_MAX_DEPTH", default_value_t = MaxDepth::Unbounded)]
    pub max_depth: MaxDepth,

    /// Start from this node instead of the story's own start node
    #[clap(long)]
    pub start: Option<String>,

    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write the report here instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Only report paths whose "A > B > C" trace matches this regex
    #[clap(long)]
    pub grep: Option<String>,

    /// Skip the dangling-reference check before traversal
    #[clap(long)]
    pub no_validate: bool,
}

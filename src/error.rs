use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while walking a story graph. Both abort the whole traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// A `next` reference (or the start key) names a node that does not exist.
    #[error("node '{key}' is not defined in the story")]
    MissingNode { key: String },

    /// A branch came back to a node that is already on its own trail.
    #[error("cycle detected: node '{key}' revisited via {}", .trail.join(" -> "))]
    CycleDetected { key: String, trail: Vec<String> },
}

/// Failures raised while loading or validating a story before traversal.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("failed to read story file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse story JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("option #{index} ('{option}') of node '{node}' points to undefined node '{target}'")]
    DanglingNext {
        node: String,
        index: usize,
        option: String,
        target: String,
    },

    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

/// Failures raised while loading class sheets.
#[derive(Error, Debug)]
pub enum ClassError {
    #[error("failed to list class directory {}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read class file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse class file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, trace};
use serde::Serialize;

use crate::error::TraversalError;
use crate::story::abilities::{add, Abilities};
use crate::story::node::{StoryNode, StoryOption};
use crate::story::tree::Story;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How many options a single path may choose before it is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxDepth {
    /// Walk every path to its natural end.
    #[default]
    Unbounded,
    /// Stop a branch once it has chosen this many options. Never zero.
    Limit(usize),
}

impl MaxDepth {
    pub fn limit(depth: usize) -> Option<Self> {
        (depth > 0).then_some(MaxDepth::Limit(depth))
    }

    pub fn reached(self, depth: usize) -> bool {
        match self {
            MaxDepth::Unbounded => false,
            MaxDepth::Limit(max) => depth >= max,
        }
    }
}

impl FromStr for MaxDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(MaxDepth::Unbounded);
        }
        let depth: usize = s
            .parse()
            .map_err(|_| format!("expected a positive integer or 'unbounded', got '{s}'"))?;
        MaxDepth::limit(depth).ok_or_else(|| "max depth must be at least 1".to_string())
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDepth::Unbounded => write!(f, "unbounded"),
            MaxDepth::Limit(depth) => write!(f, "{depth}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TraversalConfig {
    pub max_depth: MaxDepth,
}

// ---------------------------------------------------------------------------
// Path records
// ---------------------------------------------------------------------------

/// Accumulated result for one complete path. Finalized on emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRecord {
    pub path: Vec<String>,
    pub abilities: Abilities,
    pub classes: BTreeSet<String>,
}

impl PathRecord {
    /// The path trace joined for display, e.g. "Intro > Fight > Victory".
    pub fn trace(&self) -> String {
        self.path.join(" > ")
    }

}

#[cfg(test)]
impl PathRecord {
    /// Build a finished record directly, for report tests.
    pub fn from_parts(path: &[&str], abilities: &[(&str, i64)], classes: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            abilities: abilities.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            classes: classes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Total for `ability` on this path; absent abilities count as 0.
    pub fn total(&self, ability: &str) -> i64 {
        self.abilities.get(ability).copied().unwrap_or(0)
    }
}

/// Per-branch accumulators. Every branch point clones this before extending
/// it, so sibling options never observe each other's state.
#[derive(Debug, Clone, Default)]
struct Branch {
    path: Vec<String>,
    abilities: Abilities,
    classes: BTreeSet<String>,
    /// Options chosen so far that led into another node.
    depth: usize,
}

impl Branch {
    fn into_record(self) -> PathRecord {
        PathRecord {
            path: self.path,
            abilities: self.abilities,
            classes: self.classes,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Enumerate every path from the story's start node.
pub fn traverse(
    story: &Story,
    config: &TraversalConfig,
) -> Result<Vec<PathRecord>, TraversalError> {
    traverse_from(story, &story.start, config)
}

/// Enumerate every path from `start`, depth-first, in declared option order.
///
/// Fails fast: a missing node or a cycle aborts the whole walk and no partial
/// result is returned.
pub fn traverse_from(
    story: &Story,
    start: &str,
    config: &TraversalConfig,
) -> Result<Vec<PathRecord>, TraversalError> {
    info!("Traversal started at '{start}' (max depth: {})", config.max_depth);

    let mut walker = Walker {
        story,
        max_depth: config.max_depth,
        trail: Vec::new(),
        records: Vec::new(),
    };
    walker.visit(start, Branch::default())?;

    info!("Traversal finished: {} paths", walker.records.len());
    Ok(walker.records)
}

struct Walker<'a> {
    story: &'a Story,
    max_depth: MaxDepth,
    /// Keys of the nodes on the branch currently being extended.
    trail: Vec<&'a str>,
    records: Vec<PathRecord>,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, key: &str, mut branch: Branch) -> Result<(), TraversalError> {
        let node: &'a StoryNode = self.story.get_node(key)?;
        if self.trail.contains(&node.key.as_str()) {
            let mut trail: Vec<String> = self.trail.iter().map(|k| k.to_string()).collect();
            trail.push(node.key.clone());
            return Err(TraversalError::CycleDetected {
                key: node.key.clone(),
                trail,
            });
        }
        trace!("Visit '{}' at depth {}", node.key, branch.depth);

        branch.path.push(node.text.clone());
        if let Some(class) = &node.class {
            branch.classes.insert(class.clone());
        }
        if !node.abilities.is_empty() {
            branch.abilities = add(&branch.abilities, &node.abilities);
        }

        if self.story.is_terminal(node, branch.depth, self.max_depth) {
            self.emit(branch);
            return Ok(());
        }

        self.trail.push(&node.key);
        for option in &node.options {
            self.choose(node, option, &branch)?;
        }
        self.trail.pop();
        Ok(())
    }

    fn choose(
        &mut self,
        node: &StoryNode,
        option: &StoryOption,
        parent: &Branch,
    ) -> Result<(), TraversalError> {
        trace!("Choose '{}' from '{}'", option.text, node.key);

        let mut branch = parent.clone();
        branch.path.push(option.text.clone());
        if let Some(class) = &option.class {
            branch.classes.insert(class.clone());
        }
        if !option.abilities.is_empty() {
            branch.abilities = add(&branch.abilities, &option.abilities);
        }

        match &option.next {
            Some(next) => {
                branch.depth += 1;
                self.visit(next, branch)
            }
            None => {
                self.emit(branch);
                Ok(())
            }
        }
    }

    fn emit(&mut self, branch: Branch) {
        let record = branch.into_record();
        debug!("Path #{}: {}", self.records.len() + 1, record.trace());
        self.records.push(record);
    }
}

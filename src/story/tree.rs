use std::collections::HashMap;

use crate::error::{StoryError, TraversalError};
use crate::story::node::{NodeKind, StoryNode};
use crate::traverse::MaxDepth;

/// The full story graph: a map of node key -> StoryNode plus the start key.
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct Story {
    pub nodes: HashMap<String, StoryNode>,
    pub start: String,
}

impl Story {
    pub fn new(start: impl Into<String>, nodes: impl IntoIterator<Item = StoryNode>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.key.clone(), node))
                .collect(),
            start: start.into(),
        }
    }

    pub fn get_node(&self, key: &str) -> Result<&StoryNode, TraversalError> {
        self.nodes
            .get(key)
            .ok_or_else(|| TraversalError::MissingNode {
                key: key.to_string(),
            })
    }

    /// A node ends its branch when it has no options, or when the branch has
    /// already chosen `max_depth` options.
    pub fn is_terminal(&self, node: &StoryNode, depth: usize, max_depth: MaxDepth) -> bool {
        node.kind() == NodeKind::Terminal || max_depth.reached(depth)
    }

    /// Check that the start key and every `next` reference resolve.
    /// Nodes are checked in key order so the reported error is stable.
    pub fn validate(&self) -> Result<(), StoryError> {
        self.get_node(&self.start)?;

        let mut keys: Vec<&String> = self.nodes.keys().collect();
        keys.sort();
        for key in keys {
            let node = &self.nodes[key];
            for (index, option) in node.options.iter().enumerate() {
                let Some(target) = &option.next else {
                    continue;
                };
                if !self.nodes.contains_key(target) {
                    return Err(StoryError::DanglingNext {
                        node: key.clone(),
                        index,
                        option: option.text.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

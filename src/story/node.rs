use serde::Deserialize;

use crate::story::abilities::{Abilities, AbilityDelta};

/// Whether a node still offers choices or ends the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Choice,
    Terminal,
}

/// A single node in the story graph, with its ability data already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryNode {
    /// Unique key of this node within the story (e.g. "intro", "forest_gate").
    pub key: String,
    /// Label recorded in the path trace when the node is visited.
    pub text: String,
    /// Ability deltas applied on every visit, whichever option led here.
    pub abilities: Abilities,
    pub class: Option<String>,
    /// Declared order is the order branches are explored in.
    pub options: Vec<StoryOption>,
}

/// One branch out of a choice node.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryOption {
    pub text: String,
    pub abilities: Abilities,
    pub class: Option<String>,
    /// Key of the next node. `None` ends the path right after this option.
    pub next: Option<String>,
}

// Builders for stories assembled in memory rather than loaded from JSON.
#[cfg(test)]
impl StoryNode {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            abilities: Abilities::new(),
            class: None,
            options: Vec::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_option(mut self, option: StoryOption) -> Self {
        self.options.push(option);
        self
    }
}

impl StoryNode {
    /// Kind is derived from the options, never from a declared tag: a node
    /// without options is terminal.
    pub fn kind(&self) -> NodeKind {
        if self.options.is_empty() {
            NodeKind::Terminal
        } else {
            NodeKind::Choice
        }
    }
}

#[cfg(test)]
impl StoryOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            abilities: Abilities::new(),
            class: None,
            next: None,
        }
    }

    pub fn to(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

// ---------------------------------------------------------------------------
// On-disk shapes
// ---------------------------------------------------------------------------

/// A node as written in `story.json`, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub declared_type: Option<String>,
    pub text: Option<String>,
    pub class: Option<String>,
    pub abilities: Option<AbilityDelta>,
    #[serde(default)]
    pub options: Vec<RawOption>,
}

/// An option as written in `story.json`, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    pub text: String,
    pub class: Option<String>,
    pub abilities: Option<AbilityDelta>,
    pub next: Option<String>,
}

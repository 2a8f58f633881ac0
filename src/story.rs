pub mod abilities;
pub mod node;
pub mod tree;

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::StoryError;
use abilities::{merge, Abilities, AbilityDelta};
use node::{RawNode, RawOption, StoryNode, StoryOption};
use tree::Story;

/// Top-level layout of `story.json`.
#[derive(Debug, Deserialize)]
struct RawStory {
    start: String,
    questions: HashMap<String, RawNode>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn load_story(path: &Path) -> Result<Story, StoryError> {
    info!("Loading story from: {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| StoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_story(&contents)
}

/// Parse a story document and normalize it into a [`Story`].
pub fn parse_story(json: &str) -> Result<Story, StoryError> {
    let raw: RawStory = serde_json::from_str(json)?;

    let nodes: Vec<StoryNode> = raw
        .questions
        .into_iter()
        .map(|(key, node)| normalize_node(key, node))
        .collect();

    info!("Story loaded: {} nodes, start '{}'", nodes.len(), raw.start);
    Ok(Story::new(raw.start, nodes))
}

fn normalize_node(key: String, raw: RawNode) -> StoryNode {
    let options: Vec<StoryOption> = raw
        .options
        .into_iter()
        .enumerate()
        .map(|(index, option)| normalize_option(&key, index, option))
        .collect();

    if let Some(mismatch) = kind_mismatch(&key, raw.declared_type.as_deref(), options.len()) {
        warn!("{mismatch}");
    }

    let abilities = normalize_abilities(&format!("node '{key}'"), raw.abilities.as_ref());
    StoryNode {
        text: raw.text.unwrap_or_else(|| key.clone()),
        key,
        abilities,
        class: raw.class,
        options,
    }
}

/// Describe a declared `type` that disagrees with the node's options. The tag
/// is advisory: kind always follows the options.
fn kind_mismatch(key: &str, declared: Option<&str>, options: usize) -> Option<String> {
    match declared {
        Some("choice") if options == 0 => Some(format!(
            "Node '{key}' is declared as choice but has no options; treating as terminal"
        )),
        Some("terminal") if options > 0 => Some(format!(
            "Node '{key}' is declared as terminal but has {options} options; they will be explored"
        )),
        _ => None,
    }
}

fn normalize_option(node_key: &str, index: usize, raw: RawOption) -> StoryOption {
    let abilities = normalize_abilities(
        &format!("option #{index} of node '{node_key}'"),
        raw.abilities.as_ref(),
    );
    StoryOption {
        text: raw.text,
        abilities,
        class: raw.class,
        next: raw.next.filter(|next| !next.is_empty()),
    }
}

fn normalize_abilities(owner: &str, delta: Option<&AbilityDelta>) -> Abilities {
    let Some(delta) = delta else {
        return Abilities::new();
    };
    for value in delta.ignored() {
        warn!("Ignoring malformed ability entry on {owner}: {value}");
    }
    let abilities = merge(&Abilities::new(), delta);
    debug!("Abilities for {owner}: {abilities:?}");
    abilities
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::story::node::NodeKind;

    const STORY: &str = r#"{
        "start": "intro",
        "questions": {
            "intro": {
                "type": "choice",
                "text": "You wake up in a cell.",
                "abilities": {"Willpower": 1},
                "options": [
                    {"text": "Pick the lock", "abilities": [{"Lockpicking": 2}, [{"Dexterity": 1}]], "next": "corridor"},
                    {"text": "Wait", "class": "Monk", "next": ""}
                ]
            },
            "corridor": {
                "type": "terminal",
                "class": "Rogue"
            }
        }
    }"#;

    #[test]
    fn test_parse_story_normalizes_nodes() {
        let story = parse_story(STORY).unwrap();
        assert_eq!(story.start, "intro");
        assert_eq!(story.nodes.len(), 2);

        let intro = story.get_node("intro").unwrap();
        assert_eq!(intro.text, "You wake up in a cell.");
        assert_eq!(intro.abilities.get("Willpower"), Some(&1));
        assert_eq!(intro.kind(), NodeKind::Choice);

        let pick = &intro.options[0];
        assert_eq!(pick.next.as_deref(), Some("corridor"));
        assert_eq!(pick.abilities.get("Lockpicking"), Some(&2));
        assert_eq!(pick.abilities.get("Dexterity"), Some(&1));

        let wait = &intro.options[1];
        assert_eq!(wait.next, None);
        assert_eq!(wait.class.as_deref(), Some("Monk"));
    }

    #[test]
    fn test_parse_story_text_falls_back_to_key() {
        let story = parse_story(STORY).unwrap();
        let corridor = story.get_node("corridor").unwrap();
        assert_eq!(corridor.text, "corridor");
        assert_eq!(corridor.kind(), NodeKind::Terminal);
    }

    #[test]
    fn test_parse_story_skips_malformed_abilities() {
        let story = parse_story(
            r#"{"start": "a", "questions": {"a": {"abilities": ["junk", {"Strength": 2}, 3]}}}"#,
        )
        .unwrap();
        let a = story.get_node("a").unwrap();
        assert_eq!(a.abilities.len(), 1);
        assert_eq!(a.abilities["Strength"], 2);
    }

    #[test]
    fn test_parse_story_rejects_invalid_json() {
        let err = parse_story(r#"{"start": "a"}"#).unwrap_err();
        assert!(matches!(err, StoryError::Parse(_)));
    }

    #[test]
    fn test_load_story_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STORY.as_bytes()).unwrap();

        let story = load_story(file.path()).unwrap();
        story.validate().unwrap();
        assert!(story.nodes.contains_key("corridor"));
    }

    #[test]
    fn test_kind_mismatch() {
        assert!(kind_mismatch("a", Some("choice"), 0)
            .unwrap()
            .contains("declared as choice but has no options"));
        assert!(kind_mismatch("a", Some("terminal"), 2)
            .unwrap()
            .contains("has 2 options"));
        assert_eq!(kind_mismatch("a", Some("choice"), 2), None);
        assert_eq!(kind_mismatch("a", Some("terminal"), 0), None);
        assert_eq!(kind_mismatch("a", None, 0), None);
        assert_eq!(kind_mismatch("a", Some("riddle"), 1), None);
    }

    #[test]
    fn test_declared_choice_without_options_yields_one_path() {
        use crate::traverse::{traverse, TraversalConfig};

        let story = parse_story(
            r#"{"start": "end", "questions": {"end": {
                "type": "choice", "text": "Nowhere left to go", "class": "Wanderer",
                "abilities": {"Survival": 2}, "options": []
            }}}"#,
        )
        .unwrap();
        let records = traverse(&story, &TraversalConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, vec!["Nowhere left to go"]);
        assert_eq!(records[0].total("Survival"), 2);
        assert!(records[0].classes.contains("Wanderer"));
    }

    #[test]
    fn test_declared_terminal_with_options_is_explored() {
        use crate::traverse::{traverse, TraversalConfig};

        let story = parse_story(
            r#"{"start": "door", "questions": {"door": {
                "type": "terminal", "text": "Door",
                "options": [{"text": "Open"}, {"text": "Knock"}]
            }}}"#,
        )
        .unwrap();
        let records = traverse(&story, &TraversalConfig::default()).unwrap();
        let traces: Vec<String> = records.iter().map(|r| r.trace()).collect();
        assert_eq!(traces, vec!["Door > Open", "Door > Knock"]);
    }

    #[test]
    fn test_demo_story_paths() {
        use crate::traverse::{traverse, TraversalConfig};

        let story = parse_story(include_str!("../demos/story.json")).unwrap();
        story.validate().unwrap();
        let records = traverse(&story, &TraversalConfig::default()).unwrap();
        assert_eq!(records.len(), 5);

        let sneak = &records[0];
        assert_eq!(
            sneak.trace(),
            "You wake up in a locked cell. > Pick the lock > A dark corridor stretches ahead. \
             > Sneak past the patrol > You stand before the open gate."
        );
        assert_eq!(sneak.total("Willpower"), 1);
        assert_eq!(sneak.total("Lockpicking"), 2);
        assert_eq!(sneak.total("Stealth"), 2);
        assert_eq!(sneak.total("Survival"), 1);
        assert_eq!(sneak.classes.iter().collect::<Vec<_>>(), vec!["Rogue"]);

        let shout_heal = &records[3];
        assert_eq!(shout_heal.total("Stealth"), -1);
        assert_eq!(shout_heal.total("Medicine"), 3);
        assert_eq!(shout_heal.total("Charisma"), 1);

        let meditate = &records[4];
        assert_eq!(meditate.path.len(), 2);
        assert_eq!(meditate.total("Survival"), 0);
        assert!(meditate.classes.contains("Monk"));
    }

    #[test]
    fn test_load_story_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_story(&dir.path().join("story.json")).unwrap_err();
        assert!(matches!(err, StoryError::Read { .. }));
    }
}

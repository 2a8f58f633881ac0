use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ClassError;
use crate::story::abilities::{Abilities, AbilityDelta};

/// A character class as summarized for the class report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSheet {
    pub id: String,
    pub name: String,
    /// Base HP plus the class's Constitution bonus.
    pub hp: i64,
    pub defense: i64,
    pub abilities: Abilities,
}

/// A class file as written in `classes/*.json`.
#[derive(Debug, Deserialize)]
struct RawClass {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    hp: i64,
    #[serde(default)]
    defense: i64,
    abilities: Option<AbilityDelta>,
}

/// Load every `*.json` class file in `dir`, ordered by file name.
pub fn load_classes(dir: &Path) -> Result<Vec<ClassSheet>, ClassError> {
    info!("Loading classes from: {}", dir.display());
    let entries = std::fs::read_dir(dir).map_err(|source| ClassError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ClassError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = std::fs::read_to_string(&path).map_err(|source| ClassError::Read {
            path: path.clone(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sheet = parse_class(&stem, &contents).map_err(|source| ClassError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!("Class '{}' from {}", sheet.id, path.display());
        sheets.push(sheet);
    }

    info!("Loaded {} classes", sheets.len());
    Ok(sheets)
}

/// Parse one class document. `fallback_id` stands in for a missing `id`.
pub fn parse_class(fallback_id: &str, json: &str) -> Result<ClassSheet, serde_json::Error> {
    let raw: RawClass = serde_json::from_str(json)?;
    let id = raw.id.unwrap_or_else(|| fallback_id.to_string());

    // A class sheet lists each ability once; a repeated name keeps the last value.
    let mut abilities = Abilities::new();
    if let Some(delta) = &raw.abilities {
        for value in delta.ignored() {
            warn!("Ignoring malformed ability entry on class '{id}': {value}");
        }
        for map in delta.mappings() {
            abilities.extend(map.iter().map(|(k, v)| (k.clone(), *v)));
        }
    }

    let constitution = abilities.get("Constitution").copied().unwrap_or(0);
    Ok(ClassSheet {
        name: raw.name.unwrap_or_else(|| id.clone()),
        id,
        hp: raw.hp.saturating_add(constitution),
        defense: raw.defense,
        abilities,
    })
}

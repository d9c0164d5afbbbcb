use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    decks: HashMap<String, DeckEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeckEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl DeckEntry {
    fn as_path(&self) -> &str {
        match self {
            DeckEntry::Path(path) => path,
            DeckEntry::Detailed { path, .. } => path,
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            DeckEntry::Path(_) => None,
            DeckEntry::Detailed { description, .. } => description.as_deref(),
        }
    }
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_fixture(rel: &str) -> Result<String> {
    let path = fixtures_dir().join(rel);
    fs::read_to_string(&path).with_context(|| format!("reading deck fixture {}", path.display()))
}

fn parse_fixture<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_fixture(rel)?;
    serde_json::from_str(&text).with_context(|| format!("parsing deck fixture {rel}"))
}

/// Manifest entry for a deck; the error lists the known names.
fn entry(name: &str) -> Result<&'static DeckEntry> {
    MANIFEST.decks.get(name).ok_or_else(|| {
        let mut known: Vec<&str> = MANIFEST.decks.keys().map(String::as_str).collect();
        known.sort_unstable();
        anyhow!("unknown deck fixture '{name}' (known: {})", known.join(", "))
    })
}

pub mod decks {
    use super::*;

    /// Deck names in the manifest, sorted.
    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.decks.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_fixture(entry(name)?.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse_fixture(entry(name)?.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixtures_dir().join(entry(name)?.as_path()))
    }

    pub fn description(name: &str) -> Result<Option<String>> {
        Ok(entry(name)?.description().map(str::to_string))
    }
}

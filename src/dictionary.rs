use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
};

use fst::{Map, Streamer};
use log::{debug, info};
use rayon::prelude::*;
use serde::Deserialize;
use ustr::Ustr;

use crate::error::{CrosswordError, Result};

/// Word → definitions table, built once and shared read-only by every run.
pub struct Dictionary {
    index: Map<Vec<u8>>,
    definitions: Vec<Vec<String>>,
    words: Vec<Ustr>,
}

#[derive(Deserialize)]
struct WordEntry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Deserialize)]
struct Meaning {
    #[serde(default)]
    def: Option<String>,
}

impl Dictionary {
    /// Builds a dictionary from `(word, definition)` pairs. Repeated words
    /// accumulate definitions.
    pub fn from_entries<W, D>(entries: impl IntoIterator<Item = (W, D)>) -> Result<Self>
    where
        W: Into<String>,
        D: Into<String>,
    {
        let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (word, definition) in entries {
            merged
                .entry(word.into())
                .or_default()
                .insert(definition.into());
        }
        Self::from_sorted(merged)
    }

    /// Loads every wordset-style `.json` file in `dir`, parsing files in parallel.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| name.contains(".json"))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CrosswordError::Dictionary(format!(
                "no .json files found in {}",
                dir.display()
            )));
        }

        let parsed = paths
            .par_iter()
            .map(|path| Self::parse_file(path))
            .collect::<Result<Vec<_>>>()?;

        let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in parsed {
            for (word, definitions) in file {
                merged.entry(word).or_default().extend(definitions);
            }
        }

        let dictionary = Self::from_sorted(merged)?;
        info!(
            "Loaded {} words from {} files in {}",
            dictionary.len(),
            paths.len(),
            dir.display()
        );
        Ok(dictionary)
    }

    fn parse_file(path: &Path) -> Result<Vec<(String, BTreeSet<String>)>> {
        let contents = fs::read(path)?;
        let entries: HashMap<String, WordEntry> = serde_json::from_slice(&contents)?;

        let words: Vec<(String, BTreeSet<String>)> = entries
            .into_iter()
            .filter(|(word, _)| is_alphabetic(word))
            .filter_map(|(word, entry)| {
                let definitions: BTreeSet<String> = entry
                    .meanings
                    .into_iter()
                    .filter_map(|meaning| meaning.def)
                    .filter(|def| !def.is_empty())
                    .collect();
                Some((word, definitions)).filter(|(_, defs)| !defs.is_empty())
            })
            .collect();

        debug!("{}: {} words", path.display(), words.len());
        Ok(words)
    }

    fn from_sorted(merged: BTreeMap<String, BTreeSet<String>>) -> Result<Self> {
        let index = Map::from_iter(
            merged
                .keys()
                .enumerate()
                .map(|(slot, word)| (word.as_bytes(), slot as u64)),
        )?;
        let definitions = merged
            .into_values()
            .map(|defs| defs.into_iter().collect())
            .collect();

        let mut words = Vec::with_capacity(index.len());
        let mut stream = index.stream();
        while let Some((key, _)) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                words.push(Ustr::from(word));
            }
        }

        Ok(Self {
            index,
            definitions,
            words,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Sorted definitions of `word`; empty when the word is unknown.
    pub fn definitions(&self, word: &str) -> &[String] {
        self.index
            .get(word)
            .and_then(|slot| self.definitions.get(slot as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every word, in lexicographic order.
    pub fn words(&self) -> impl Iterator<Item = Ustr> + '_ {
        self.words.iter().copied()
    }
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

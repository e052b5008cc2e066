//! Deck sources, blob stores and the loader that ties them together.

use crate::deck::{parse_source, Deck};
use crate::error::{DrillError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Supplies the reference question/answer content for a deck.
pub trait DeckSource {
    /// Raw source content for the named deck.
    fn fetch(&self, name: &str) -> Result<String>;
}

/// Opaque key to blob persistence keyed by deck name.
pub trait DeckStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&mut self, key: &str, blob: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Reject keys that could escape a directory.
fn validate_key(key: &str) -> Result<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.contains('\0');
    if invalid {
        return Err(DrillError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Deck files in a directory, one file per deck name.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deck names available in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") || name.ends_with(".md") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl DeckSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<String> {
        validate_key(name)?;
        match fs::read_to_string(self.dir.join(name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DrillError::DeckNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory deck source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    decks: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.decks.insert(name.into(), content.into());
    }
}

impl DeckSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<String> {
        self.decks
            .get(name)
            .cloned()
            .ok_or_else(|| DrillError::DeckNotFound(name.to_string()))
    }
}

/// In-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// Blob store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl DeckStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes a temporary file in the store directory and renames it over
    /// the target. Readers see either the old blob or the new one.
    fn put(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        file.write_all(blob.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Store key holding the last unreadable blob of a deck.
pub fn corrupt_key(name: &str) -> String {
    format!("{name}.corrupt")
}

/// Loads decks from the store, seeding them from the source on first use.
pub struct DeckLoader<S, T> {
    source: S,
    store: T,
}

impl<S: DeckSource, T: DeckStore> DeckLoader<S, T> {
    pub fn new(source: S, store: T) -> Self {
        Self { source, store }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Load a deck, preferring stored progress over fresh source content.
    ///
    /// A stored blob that cannot be read is kept under
    /// [`corrupt_key`] before the deck is re-seeded.
    pub fn load(&mut self, name: &str) -> Result<Deck> {
        if let Some(blob) = self.store.get(name)? {
            if let Some(deck) = Deck::from_blob(name, &blob) {
                tracing::info!(deck = %name, cards = deck.len(), "loaded stored deck");
                return Ok(deck);
            }
            let backup = corrupt_key(name);
            self.store.put(&backup, &blob)?;
            tracing::warn!(deck = %name, backup = %backup, "moved unreadable stored deck aside");
        }

        let content = self.source.fetch(name)?;
        let deck = Deck::seed(name, parse_source(name, &content)?);
        self.save(&deck)?;
        tracing::info!(deck = %name, cards = deck.len(), "seeded deck from source");
        Ok(deck)
    }

    /// Persist a deck under its name.
    pub fn save(&mut self, deck: &Deck) -> Result<()> {
        self.store.put(&deck.name, &deck.to_blob()?)?;
        tracing::debug!(deck = %deck.name, "saved deck");
        Ok(())
    }

    /// Wipe stored progress and reload fresh cards from the source.
    pub fn reset(&mut self, name: &str) -> Result<Deck> {
        self.store.remove(name)?;
        tracing::info!(deck = %name, "reset deck progress");
        self.load(name)
    }
}

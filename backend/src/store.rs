//! Flat-file puzzle store.
//!
//! The whole document is read and rewritten on every append with no locking, so
//! two concurrent appends can lose one of the writes. A single admin is assumed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const STORE_FILE_NAME: &str = "games.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read puzzle store {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StoreFailure,
    },
    #[error("failed to write puzzle store {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: StoreFailure,
    },
}

#[derive(Debug, Error)]
pub enum StoreFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// On-disk layout. Entries of `games` are kept as raw JSON so whatever was
/// posted comes back unchanged; other top-level keys survive rewrites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    games: Vec<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct PuzzleStore {
    path: PathBuf,
}

impl PuzzleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list_puzzles(&self) -> Result<Vec<Value>, StoreError> {
        self.read_document()
            .await
            .map(|doc| doc.games)
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })
    }

    pub async fn append_puzzle(&self, puzzle: Value) -> Result<Value, StoreError> {
        self.try_append(&puzzle)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(puzzle)
    }

    async fn try_append(&self, puzzle: &Value) -> Result<(), StoreFailure> {
        let mut doc = self.read_document().await?;
        doc.games.push(puzzle.clone());
        let json = serde_json::to_vec_pretty(&doc)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn read_document(&self) -> Result<StoreDocument, StoreFailure> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_store(contents: Option<&str>) -> PuzzleStore {
        let path = std::env::temp_dir().join(format!("connections_store_{}.json", Uuid::new_v4()));
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }
        PuzzleStore::new(path)
    }

    #[tokio::test]
    async fn append_then_list_round_trips() {
        let store = temp_store(Some(r#"{ "games": [] }"#));
        let puzzle = json!({
            "id": 42,
            "groups": [
                { "connection": "Fruit", "level": "yellow", "words": ["APPLE", "PEAR", "PLUM", "KIWI"] }
            ]
        });

        let stored = store.append_puzzle(puzzle.clone()).await.unwrap();
        assert_eq!(stored, puzzle);
        assert_eq!(store.list_puzzles().await.unwrap(), vec![puzzle]);
    }

    #[tokio::test]
    async fn rewrite_is_pretty_and_keeps_extra_keys() {
        let store = temp_store(Some(r#"{"games":[],"version":2}"#));
        store.append_puzzle(json!({ "id": 1 })).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"games\": ["));
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["version"], 2);
        assert_eq!(doc["games"][0]["id"], 1);
    }

    #[tokio::test]
    async fn rewrite_keeps_key_order_of_entries() {
        let store = temp_store(Some(
            r#"{"games":[{"id":1,"groups":[{"words":["A"],"level":"yellow","connection":"X"}]}]}"#,
        ));
        store
            .append_puzzle(json!({ "zeta": 1, "alpha": 2 }))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let position = |needle: &str| raw.find(needle).unwrap();
        assert!(position("\"id\"") < position("\"groups\""));
        assert!(position("\"words\"") < position("\"level\""));
        assert!(position("\"level\"") < position("\"connection\""));
        assert!(position("\"zeta\"") < position("\"alpha\""));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let store = temp_store(None);
        let err = store.list_puzzles().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Read {
                source: StoreFailure::Io(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn corrupt_file_fails_append_without_touching_it() {
        let store = temp_store(Some("not json"));
        let err = store.append_puzzle(json!({ "id": 1 })).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Write {
                source: StoreFailure::Json(_),
                ..
            }
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json");
    }
}

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::puzzle::{Group, Puzzle, PuzzleId, GROUPS_PER_PUZZLE, WORDS_PER_GROUP};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupForm {
    pub connection: String,
    pub level: String,
    pub words: [String; WORDS_PER_GROUP],
}

/// The admin page's input: one block of fields per group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleForm {
    pub groups: [GroupForm; GROUPS_PER_PUZZLE],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved { id: PuzzleId },
    Failed { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved { .. } => f.write_str("Game saved successfully!"),
            Notice::Failed { .. } => f.write_str("Error saving game."),
        }
    }
}

/// Milliseconds since the UNIX epoch. Two submissions in the same millisecond collide.
pub fn next_puzzle_id() -> PuzzleId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as PuzzleId)
        .unwrap_or(0)
}

impl PuzzleForm {
    /// Field values are taken as typed; nothing is trimmed or checked.
    pub fn to_puzzle(&self, id: PuzzleId) -> Puzzle {
        Puzzle {
            id,
            groups: self
                .groups
                .iter()
                .map(|group| Group {
                    connection: group.connection.clone(),
                    level: group.level.clone(),
                    words: group.words.to_vec(),
                })
                .collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Settles a submission: the form is cleared only when the store accepted it.
    pub fn finish<E: fmt::Display>(&mut self, result: Result<Puzzle, E>) -> Notice {
        match result {
            Ok(puzzle) => {
                *self = Self::default();
                Notice::Saved { id: puzzle.id }
            }
            Err(err) => Notice::Failed {
                reason: err.to_string(),
            },
        }
    }
}

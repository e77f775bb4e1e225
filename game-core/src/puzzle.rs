use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub type PuzzleId = u64;

/// Number of groups on a well-formed board.
pub const GROUPS_PER_PUZZLE: usize = 4;
/// Number of words in each group.
pub const WORDS_PER_GROUP: usize = 4;

/// Four words that share a hidden connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Category label revealed once the group is solved.
    pub connection: String,
    /// Difficulty tag, used by clients as a style class (`yellow`, `purple`, ...).
    pub level: String,
    pub words: Vec<String>,
}

impl Group {
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Puzzle {
    #[serde(default)]
    pub id: PuzzleId,
    pub groups: Vec<Group>,
}

impl Puzzle {
    /// All words of the puzzle, group by group.
    pub fn words(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|group| group.words.iter().cloned())
            .collect()
    }

    /// Returns the group whose word set equals `selected`, ignoring order.
    pub fn find_group(&self, selected: &[String]) -> Option<&Group> {
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
        self.groups.iter().find(|group| {
            let words: HashSet<&str> = group.words.iter().map(String::as_str).collect();
            words == selected
        })
    }

    /// Four groups of four words, sixteen distinct words in total.
    ///
    /// Nothing requires this to hold; the server stores whatever it is given and
    /// only uses this to flag suspicious submissions.
    pub fn is_well_formed(&self) -> bool {
        if self.groups.len() != GROUPS_PER_PUZZLE {
            return false;
        }
        if self
            .groups
            .iter()
            .any(|group| group.words.len() != WORDS_PER_GROUP)
        {
            return false;
        }
        let words = self.words();
        let unique: HashSet<&String> = words.iter().collect();
        unique.len() == words.len()
    }
}

/// Typed view of the store document: `{ "games": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleFile {
    pub games: Vec<Puzzle>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn group(connection: &str, level: &str, words: [&str; 4]) -> Group {
        Group {
            connection: connection.to_string(),
            level: level.to_string(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn sample_puzzle() -> Puzzle {
        Puzzle {
            id: 1,
            groups: vec![
                group("Fruit", "yellow", ["APPLE", "PEAR", "PLUM", "KIWI"]),
                group("Planets", "green", ["MARS", "VENUS", "SATURN", "JUPITER"]),
                group("Colors", "blue", ["RED", "BLUE", "GREEN", "GOLD"]),
                group("Poker terms", "purple", ["FLUSH", "RIVER", "BLIND", "STRAIGHT"]),
            ],
        }
    }

    pub fn words(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }
}

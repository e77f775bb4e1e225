//! Puzzle model, game state machine and admin form for the word-grouping game.
//!
//! Everything here is free of I/O: callers supply the randomness and a
//! [`Scheduler`] for delayed transitions.

pub mod admin;
pub mod engine;
pub mod puzzle;

pub use admin::{next_puzzle_id, GroupForm, Notice, PuzzleForm};
pub use engine::{
    apply_action, fire_timer, shuffle_words, GameError, GameEvent, GameSession, Outcome, Phase,
    PlayerAction, Scheduler, Tile, Timer, OUTCOME_DELAY, SELECTION_SIZE, SHAKE_DELAY,
    STARTING_LIVES,
};
pub use puzzle::{Group, Puzzle, PuzzleFile, PuzzleId};

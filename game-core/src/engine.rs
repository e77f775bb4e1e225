use std::mem;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::{Group, Puzzle, PuzzleFile};

pub const STARTING_LIVES: u8 = 4;
pub const SELECTION_SIZE: usize = 4;
/// How long a wrong guess keeps its tiles shaking.
pub const SHAKE_DELAY: Duration = Duration::from_millis(500);
/// Settle time between the final submission and the win/lose notice.
pub const OUTCOME_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    fn phase(self) -> Phase {
        match self {
            Outcome::Won => Phase::Won,
            Outcome::Lost => Phase::Lost,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Deal the loaded puzzle onto the board.
    Start,
    SelectTile { word: String },
    Submit,
    Shuffle,
}

/// Deferred work handed to a [`Scheduler`] and fed back through [`fire_timer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    ClearShake { words: Vec<String> },
    Announce(Outcome),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GameEvent {
    BoardChanged { words: Vec<String> },
    TileSelected { word: String },
    TileDeselected { word: String },
    GroupSolved { group: Group },
    IncorrectGuess { words: Vec<String>, lives_remaining: u8 },
    ShakeCleared { words: Vec<String> },
    GameOver { outcome: Outcome },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("action not allowed in the current phase")]
    WrongPhase,
    #[error("tile is not on the board")]
    TileNotOnBoard,
    #[error("Please select exactly 4 words.")]
    IncompleteSelection { selected: usize },
    #[error("no puzzles available")]
    NoPuzzles,
}

/// Runs a [`Timer`] after `delay`. The owner is expected to pass it to
/// [`fire_timer`] when it comes due.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer);
}

/// Records timers in order; handy for tests and for callers that drive time themselves.
impl Scheduler for Vec<(Duration, Timer)> {
    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.push((delay, timer));
    }
}

/// One tile as a client should draw it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tile<'a> {
    pub word: &'a str,
    pub selected: bool,
    pub shaking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    puzzle: Puzzle,
    phase: Phase,
    board: Vec<String>,
    selected: Vec<String>,
    shaking: Vec<String>,
    lives: u8,
    solved: Vec<Group>,
    announced: bool,
}

impl GameSession {
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            phase: Phase::Loading,
            board: Vec::new(),
            selected: Vec::new(),
            shaking: Vec::new(),
            lives: STARTING_LIVES,
            solved: Vec::new(),
            announced: false,
        }
    }

    /// Session for the first puzzle in the file.
    pub fn from_file(file: PuzzleFile) -> Result<Self, GameError> {
        file.games
            .into_iter()
            .next()
            .map(Self::new)
            .ok_or(GameError::NoPuzzles)
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Unsolved words in display order.
    pub fn board(&self) -> &[String] {
        &self.board
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Solved groups in the order they were found.
    pub fn solved(&self) -> &[Group] {
        &self.solved
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Won | Phase::Lost)
    }

    pub fn tiles(&self) -> Vec<Tile<'_>> {
        self.board
            .iter()
            .map(|word| Tile {
                word: word.as_str(),
                selected: self.selected.contains(word),
                shaking: self.shaking.contains(word),
            })
            .collect()
    }

    /// One dot per starting life; `true` while that life is still available.
    pub fn lives_indicator(&self) -> [bool; STARTING_LIVES as usize] {
        let mut dots = [false; STARTING_LIVES as usize];
        for (i, dot) in dots.iter_mut().enumerate() {
            *dot = i < self.lives as usize;
        }
        dots
    }
}

/// Uniform in-place permutation (Fisher-Yates).
pub fn shuffle_words<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

pub fn apply_action<R, S>(
    session: &mut GameSession,
    action: PlayerAction,
    rng: &mut R,
    scheduler: &mut S,
) -> Result<Vec<GameEvent>, GameError>
where
    R: Rng + ?Sized,
    S: Scheduler + ?Sized,
{
    let required = match action {
        PlayerAction::Start => Phase::Loading,
        _ => Phase::Playing,
    };
    if session.phase != required {
        return Err(GameError::WrongPhase);
    }

    let mut events = Vec::new();
    match action {
        PlayerAction::Start => deal(session, rng, &mut events),
        PlayerAction::SelectTile { word } => select_tile(session, word, &mut events)?,
        PlayerAction::Submit => submit(session, scheduler, &mut events)?,
        PlayerAction::Shuffle => {
            shuffle_words(&mut session.board, rng);
            events.push(GameEvent::BoardChanged {
                words: session.board.clone(),
            });
        }
    }
    Ok(events)
}

/// Delivers a timer previously handed to the scheduler.
pub fn fire_timer(session: &mut GameSession, timer: Timer) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match timer {
        Timer::ClearShake { words } => {
            let before = session.shaking.len();
            session.shaking.retain(|w| !words.contains(w));
            if session.shaking.len() != before {
                events.push(GameEvent::ShakeCleared { words });
            }
        }
        Timer::Announce(outcome) => {
            if !session.announced && session.phase == outcome.phase() {
                session.announced = true;
                events.push(GameEvent::GameOver { outcome });
            }
        }
    }
    events
}

fn deal<R: Rng + ?Sized>(session: &mut GameSession, rng: &mut R, events: &mut Vec<GameEvent>) {
    session.board = session.puzzle.words();
    shuffle_words(&mut session.board, rng);
    session.phase = Phase::Playing;
    events.push(GameEvent::BoardChanged {
        words: session.board.clone(),
    });
}

fn select_tile(
    session: &mut GameSession,
    word: String,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if !session.board.contains(&word) {
        return Err(GameError::TileNotOnBoard);
    }

    if let Some(index) = session.selected.iter().position(|w| *w == word) {
        session.selected.remove(index);
        events.push(GameEvent::TileDeselected { word });
    } else if session.selected.len() < SELECTION_SIZE {
        session.selected.push(word.clone());
        events.push(GameEvent::TileSelected { word });
    }
    // A fifth pick is silently ignored.
    Ok(())
}

fn submit<S: Scheduler + ?Sized>(
    session: &mut GameSession,
    scheduler: &mut S,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if session.selected.len() != SELECTION_SIZE {
        return Err(GameError::IncompleteSelection {
            selected: session.selected.len(),
        });
    }

    let selected = mem::take(&mut session.selected);
    match session.puzzle.find_group(&selected).cloned() {
        Some(group) => {
            session.board.retain(|w| !group.contains(w));
            session.solved.push(group.clone());
            events.push(GameEvent::GroupSolved { group });
            events.push(GameEvent::BoardChanged {
                words: session.board.clone(),
            });
            if session.solved.len() == session.puzzle.groups.len() {
                finish(session, Outcome::Won, scheduler);
            }
        }
        None => {
            session.lives = session.lives.saturating_sub(1);
            session.shaking.extend(selected.iter().cloned());
            scheduler.schedule(
                SHAKE_DELAY,
                Timer::ClearShake {
                    words: selected.clone(),
                },
            );
            events.push(GameEvent::IncorrectGuess {
                words: selected,
                lives_remaining: session.lives,
            });
            if session.lives == 0 {
                finish(session, Outcome::Lost, scheduler);
            }
        }
    }
    Ok(())
}

// Input locks immediately; the notice itself waits for the settle delay.
fn finish<S: Scheduler + ?Sized>(session: &mut GameSession, outcome: Outcome, scheduler: &mut S) {
    session.phase = outcome.phase();
    scheduler.schedule(OUTCOME_DELAY, Timer::Announce(outcome));
}

//! Terminal client for the word-grouping game.
//!
//! Loads the first puzzle from the server and reads commands from stdin: a word
//! toggles its tile, `submit` checks the selection, `shuffle` reorders the board.
//! Set `CONNECTIONS_SEED` for a repeatable deal.

use std::env;

use anyhow::Context;
use connections_backend::client::{PuzzleClient, TokioScheduler};
use connections_backend::config::server_url;
use connections_backend::init_tracing;
use connections_core::{
    apply_action, fire_timer, GameError, GameEvent, GameSession, Outcome, PlayerAction,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: <word> toggle tile | submit | shuffle | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("warn");

    let client = PuzzleClient::new(&server_url())?;
    let puzzle = client
        .fetch_first_puzzle()
        .await
        .context("loading puzzles")?;
    let mut session = GameSession::new(puzzle);

    let mut rng = env::var("CONNECTIONS_SEED")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(ChaCha8Rng::seed_from_u64)
        .unwrap_or_else(ChaCha8Rng::from_entropy);
    let (mut scheduler, mut timers) = TokioScheduler::new();

    apply_action(&mut session, PlayerAction::Start, &mut rng, &mut scheduler)?;
    println!("{HELP}");
    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let action = match parse_command(&session, line.trim()) {
                    Command::Play(action) => action,
                    Command::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Command::Quit => break,
                    Command::Nothing => continue,
                };
                match apply_action(&mut session, action, &mut rng, &mut scheduler) {
                    Ok(events) => {
                        report(&events);
                        render(&session);
                    }
                    Err(GameError::WrongPhase) if session.is_over() => {
                        println!("The game is over.");
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Some(timer) = timers.recv() => {
                let events = fire_timer(&mut session, timer);
                if events.is_empty() {
                    continue;
                }
                report(&events);
                if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
                    break;
                }
                render(&session);
            }
        }
    }

    Ok(())
}

enum Command {
    Play(PlayerAction),
    Help,
    Quit,
    Nothing,
}

fn parse_command(session: &GameSession, input: &str) -> Command {
    match input.to_ascii_lowercase().as_str() {
        "" => Command::Nothing,
        "submit" => Command::Play(PlayerAction::Submit),
        "shuffle" => Command::Play(PlayerAction::Shuffle),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            // Tiles are matched case-insensitively against what is on the board.
            let word = session
                .board()
                .iter()
                .find(|w| w.eq_ignore_ascii_case(input))
                .cloned()
                .unwrap_or_else(|| input.to_string());
            Command::Play(PlayerAction::SelectTile { word })
        }
    }
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::GroupSolved { group } => {
                println!("Correct! {}", group.connection);
            }
            GameEvent::IncorrectGuess { lives_remaining, .. } => {
                println!("Not a group. {lives_remaining} mistakes remaining.");
            }
            GameEvent::GameOver {
                outcome: Outcome::Won,
            } => println!("You win!"),
            GameEvent::GameOver {
                outcome: Outcome::Lost,
            } => println!("You lose!"),
            _ => {}
        }
    }
}

fn render(session: &GameSession) {
    println!();
    for group in session.solved() {
        println!(
            "[{}] {}: {}",
            group.level,
            group.connection,
            group.words.join(", ")
        );
    }

    let tiles = session.tiles();
    for row in tiles.chunks(4) {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| match (tile.selected, tile.shaking) {
                (_, true) => format!("~{}~", tile.word),
                (true, false) => format!("[{}]", tile.word),
                (false, false) => format!(" {} ", tile.word),
            })
            .collect();
        println!("{}", cells.join("  "));
    }

    let dots: String = session
        .lives_indicator()
        .iter()
        .map(|alive| if *alive { '●' } else { '○' })
        .collect();
    println!("Mistakes remaining: {dots}");
}

//! HTTP client used by the admin and play binaries.

use std::time::Duration;

use connections_core::{Puzzle, Scheduler, Timer};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client")]
    Builder(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} lists no puzzles")]
    NoPuzzles { url: String },
    #[error("first puzzle in {url} is malformed")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The store file with its entries left untyped; only the one being played is parsed.
#[derive(Deserialize)]
struct RawPuzzleFile {
    games: Vec<Value>,
}

#[derive(Clone)]
pub struct PuzzleClient {
    client: Client,
    base_url: String,
}

impl PuzzleClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().build().map_err(ClientError::Builder)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// First puzzle of the raw store file, as the game board loads it. Later
    /// entries may have any shape.
    pub async fn fetch_first_puzzle(&self) -> Result<Puzzle, ClientError> {
        let url = format!("{}/data/games.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        let file: RawPuzzleFile = decode(url.clone(), response).await?;
        let Some(first) = file.games.into_iter().next() else {
            return Err(ClientError::NoPuzzles { url });
        };
        serde_json::from_value(first).map_err(|source| ClientError::Malformed { url, source })
    }

    pub async fn append_puzzle(&self, puzzle: &Puzzle) -> Result<Puzzle, ClientError> {
        let url = format!("{}/api/games", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(puzzle)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        decode(url, response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { url, status, body });
    }
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::Decode { url, source })
}

/// Runs game timers on the tokio clock and hands them back over a channel.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Timer>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Timer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the game loop has exited.
            let _ = tx.send(timer);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connections_core::Outcome;

    #[tokio::test]
    async fn scheduler_delivers_timers_in_due_order() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        scheduler.schedule(Duration::from_millis(60), Timer::Announce(Outcome::Lost));
        scheduler.schedule(
            Duration::from_millis(5),
            Timer::ClearShake {
                words: vec!["APPLE".into()],
            },
        );

        assert_eq!(
            rx.recv().await,
            Some(Timer::ClearShake {
                words: vec!["APPLE".into()]
            })
        );
        assert_eq!(rx.recv().await, Some(Timer::Announce(Outcome::Lost)));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = PuzzleClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}

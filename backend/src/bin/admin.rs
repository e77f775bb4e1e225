//! Submit a new puzzle from a filled-in form file.
//!
//! Usage: `connections-admin <form.json>`; the server is taken from `CONNECTIONS_URL`.

use std::env;

use anyhow::{bail, Context};
use connections_backend::client::PuzzleClient;
use connections_backend::config::server_url;
use connections_backend::init_tracing;
use connections_core::{next_puzzle_id, Notice, PuzzleForm};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("warn");

    let Some(path) = env::args().nth(1) else {
        bail!("usage: connections-admin <form.json>");
    };
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading form {path}"))?;
    let mut form: PuzzleForm =
        serde_json::from_str(&raw).with_context(|| format!("parsing form {path}"))?;

    let client = PuzzleClient::new(&server_url())?;
    let puzzle = form.to_puzzle(next_puzzle_id());
    let result = client.append_puzzle(&puzzle).await;
    if let Err(err) = &result {
        error!(error = ?err, "puzzle submission failed");
    }

    let notice = form.finish(result);
    match notice {
        Notice::Saved { id } => {
            info!(id, "puzzle stored");
            println!("{notice}");
            Ok(())
        }
        Notice::Failed { ref reason } => {
            eprintln!("{notice}");
            bail!("{reason}")
        }
    }
}

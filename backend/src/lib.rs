use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use connections_core::Puzzle;
use serde::Serialize;
use serde_json::Value;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod client;
pub mod config;
pub mod error;
pub mod store;

use config::ServerConfig;
use error::AppError;
use store::PuzzleStore;

/// Per-request handlers share nothing but these paths; the store file is the only mutable state.
#[derive(Clone)]
pub struct AppState {
    store: PuzzleStore,
    data_dir: PathBuf,
    public_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            store: PuzzleStore::new(config.store_path()),
            data_dir: config.data_dir.clone(),
            public_dir: config.public_dir.clone(),
        }
    }

    pub fn store(&self) -> &PuzzleStore {
        &self.store
    }
}

pub fn app(state: AppState) -> Router {
    let data = ServeDir::new(&state.data_dir);
    let public = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .with_state(state)
        .nest_service("/data", data)
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
}

/// Install the global `tracing` subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[derive(Serialize)]
struct GamesResponse {
    games: Vec<Value>,
}

async fn list_games(State(state): State<AppState>) -> Result<Json<GamesResponse>, AppError> {
    let games = state.store.list_puzzles().await?;
    Ok(Json(GamesResponse { games }))
}

/// Any JSON body is stored verbatim; odd shapes are only logged.
async fn create_game(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    match serde_json::from_value::<Puzzle>(body.clone()) {
        Ok(puzzle) if puzzle.is_well_formed() => {}
        Ok(_) => warn!("storing puzzle that is not four groups of four distinct words"),
        Err(err) => warn!(error = %err, "storing body that does not parse as a puzzle"),
    }

    let stored = state.store.append_puzzle(body).await?;
    let id = stored.get("id").cloned().unwrap_or(Value::Null);
    info!(%id, "puzzle appended");
    Ok((StatusCode::CREATED, Json(stored)))
}

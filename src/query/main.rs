//! Validation query server.
//!
//! Provides an HTTP API over the reference index: address validation,
//! health reporting, and explicit index rebuilds with atomic swap.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use alder::index::{IndexSnapshot, ReferenceIndexBuilder, SharedIndex};
use alder::models::ParsedComponent;
use alder::{AddressValidator, ValidationProfile};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Address validation server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Index snapshot written by the ingest binary
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Header schema CSV, for building directly from raw extracts
    #[arg(long)]
    header: Option<PathBuf>,

    /// Directory of raw gazetteer CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    validator: AddressValidator,
    /// Raw-extract paths, kept for explicit rebuilds.
    source: Option<(PathBuf, PathBuf)>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Alder Query Server");

    let shared = Arc::new(SharedIndex::empty());
    let source = match (&args.header, &args.data_dir) {
        (Some(header), Some(data_dir)) => Some((header.clone(), data_dir.clone())),
        _ => None,
    };

    // Eager load at startup: snapshot when given, else a direct build.
    // Queries arriving before this completes would fail fast with 503,
    // but we finish before binding the listener.
    if let Some(path) = &args.snapshot {
        let index = IndexSnapshot::read_from(path)?.into_index();
        shared.install(index);
    } else if let Some((header, data_dir)) = &source {
        let builder = ReferenceIndexBuilder::new(header.clone(), data_dir.clone());
        shared.get_or_build(|| builder.build())?;
    } else {
        anyhow::bail!("No index source given (use --snapshot, or --header with --data-dir)");
    }

    let snapshot = shared.snapshot().expect("index installed above");
    info!("Serving reference index with {} records", snapshot.len());

    let state = Arc::new(AppState {
        validator: AddressValidator::new(Arc::clone(&shared)),
        source,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/validate", post(validate_handler))
        .route("/v1/rebuild", post(rebuild_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ready = state.validator.index().is_ready();
    let records = state
        .validator
        .index()
        .snapshot()
        .map(|index| index.len())
        .unwrap_or(0);

    Json(HealthResponse {
        status: if ready { "ok" } else { "not ready" },
        index_ready: ready,
        records,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    index_ready: bool,
    records: usize,
}

#[derive(Deserialize)]
struct ValidateRequest {
    /// Raw address text as the user entered it
    text: String,
    /// Labeled tokens from the external address parser, in parser order
    #[serde(default)]
    components: Vec<ParsedComponent>,
}

/// Validate a single address
async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationProfile>, (StatusCode, String)> {
    let profile = state
        .validator
        .validate(&request.text, &request.components)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    Ok(Json(profile))
}

#[derive(Serialize)]
struct RebuildResponse {
    records: usize,
    skipped_rows: u64,
}

/// Rebuild the index from the raw extracts and swap it in atomically.
/// In-flight validations keep serving against the previous index.
async fn rebuild_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RebuildResponse>, (StatusCode, String)> {
    let Some((header, data_dir)) = state.source.clone() else {
        return Err((
            StatusCode::CONFLICT,
            "server was started from a snapshot; no raw extracts to rebuild from".to_string(),
        ));
    };

    let state_for_build = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        let builder = ReferenceIndexBuilder::new(header, data_dir);
        state_for_build.validator.index().rebuild(|| builder.build())
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match result {
        Ok(index) => Ok(Json(RebuildResponse {
            records: index.len(),
            skipped_rows: index.skipped_rows(),
        })),
        Err(e) => {
            error!("Index rebuild failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

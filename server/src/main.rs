use std::env;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use connect4::{
    best_move, evaluate, parse_history, GameState, GameStatus, MoveRequest, Player, Score,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let app = app_router();

    let addr = env::var("CONNECT4_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn app_router() -> Router {
    let api = Router::new()
        .route("/move", get(handle_move))
        .route("/evaluate", get(handle_evaluate))
        .route("/health", get(|| async { "ok" }));
    Router::new()
        .nest("/api", api)
        .layer(
            CorsLayer::new()
                .allow_methods([axum::http::Method::GET])
                .allow_origin(axum::http::HeaderValue::from_static("*"))
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct MoveQuery {
    #[serde(default)]
    position: String,
    level: u8,
}

async fn handle_move(Query(query): Query<MoveQuery>) -> Result<impl IntoResponse, ApiError> {
    let req = MoveRequest {
        position: query.position,
        level: query.level,
    };
    debug!(position = %req.position, level = req.level, "searching");
    // The search is CPU-bound; keep it off the async workers.
    let mv = tokio::task::spawn_blocking(move || best_move(req)).await??;
    let headers = [(header::CACHE_CONTROL, "no-store")];
    Ok((headers, Json(mv)))
}

#[derive(Debug, Deserialize)]
struct EvaluateQuery {
    #[serde(default)]
    position: String,
    player: Player,
}

#[derive(Debug, Serialize)]
struct EvaluateResponse {
    score: Score,
    #[serde(flatten)]
    status: GameStatus,
}

async fn handle_evaluate(
    Query(query): Query<EvaluateQuery>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let columns = parse_history(&query.position)?;
    let state = GameState::from_history(&columns)?;
    Ok(Json(EvaluateResponse {
        score: evaluate(state.board(), query.player),
        status: state.status(),
    }))
}

#[derive(Debug)]
struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = format!("{}", self.0);
        (status, body).into_response()
    }
}

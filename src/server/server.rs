use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::error;

use crate::recommend::{
    HybridScoredSong, PeerMatch, RankedSong, RecommendError, Recommender, SnapshotProvider,
    YearRange,
};
use crate::store::LibraryStore;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub songs: usize,
    pub users: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct ContentParams {
    user: Option<String>,
    from_year: Option<String>,
    to_year: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UserParams {
    user: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ThemeParams {
    query: Option<String>,
}

#[derive(Serialize)]
struct RecommendationsResponse {
    user: String,
    recommendations: Vec<RankedSong>,
}

#[derive(Serialize)]
struct CollabResponse {
    user: String,
    peers: Vec<PeerMatch>,
    recommendations: Vec<RankedSong>,
}

#[derive(Serialize)]
struct HybridResponse {
    user: String,
    recommendations: Vec<HybridScoredSong>,
}

#[derive(Serialize)]
struct ThemeResponse {
    query: String,
    recommendations: Vec<RankedSong>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Engine failures mapped onto the HTTP surface. User-correctable
/// conditions keep their message; store failures are logged and leak
/// nothing.
struct ApiError(RecommendError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RecommendError::UnknownUser(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            RecommendError::EmptyCorpus
            | RecommendError::NoVectorizableLikes(_)
            | RecommendError::EmptyKeywords(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            RecommendError::Store(err) => {
                error!("store failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}

fn require_param(value: Option<String>, name: &str) -> Result<String, Response> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(bad_request(&format!("missing '{}' parameter", name))),
    }
}

/// Year filtering is all-or-nothing: both bounds or neither.
fn parse_year_range(
    from_year: Option<String>,
    to_year: Option<String>,
) -> Result<Option<YearRange>, Response> {
    match (from_year, to_year) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => match (from.trim().parse(), to.trim().parse()) {
            (Ok(start), Ok(end)) => Ok(Some(YearRange { start, end })),
            _ => Err(bad_request("'from_year' and 'to_year' must be integers")),
        },
        _ => Err(bad_request(
            "'from_year' and 'to_year' must be provided together",
        )),
    }
}

/// Ranking is CPU-bound batch work; it runs on the blocking pool.
async fn run_ranking<T, F>(task: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RecommendError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ApiError(err).into_response()),
        Err(err) => {
            error!("ranking task failed: {}", err);
            Err(internal_error())
        }
    }
}

async fn home(State(state): State<ServerState>) -> Response {
    let songs = state.store.all_songs().map(|s| s.len()).unwrap_or(0);
    let users = state.store.all_user_ids().map(|u| u.len()).unwrap_or(0);
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        songs,
        users,
    };
    Json(stats).into_response()
}

async fn health(State(store): State<GuardedLibraryStore>) -> Response {
    match store.all_user_ids() {
        Ok(_) => (StatusCode::OK, "ok").into_response(),
        Err(err) => {
            error!("health check failed: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn recommend_content(
    State(state): State<ServerState>,
    Query(params): Query<ContentParams>,
) -> Response {
    let user = match require_param(params.user, "user") {
        Ok(user) => user,
        Err(response) => return response,
    };
    let years = match parse_year_range(params.from_year, params.to_year) {
        Ok(years) => years,
        Err(response) => return response,
    };

    let recommender = state.recommender.clone();
    let top_n = state.config.top_n;
    let task_user = user.clone();
    let recommendations =
        match run_ranking(move || recommender.recommend_by_content(&task_user, top_n, years)).await
        {
            Ok(rows) => rows,
            Err(response) => return response,
        };
    Json(RecommendationsResponse {
        user,
        recommendations,
    })
    .into_response()
}

async fn recommend_collab(
    State(state): State<ServerState>,
    Query(params): Query<UserParams>,
) -> Response {
    let user = match require_param(params.user, "user") {
        Ok(user) => user,
        Err(response) => return response,
    };

    let recommender = state.recommender.clone();
    let peer_count = state.config.peer_count;
    let max_candidates = state.config.top_n;
    let task_user = user.clone();
    let result = match run_ranking(move || {
        recommender.recommend_collaborative(&task_user, peer_count, max_candidates)
    })
    .await
    {
        Ok(result) => result,
        Err(response) => return response,
    };
    Json(CollabResponse {
        user,
        peers: result.peers,
        recommendations: result.songs,
    })
    .into_response()
}

async fn recommend_hybrid(
    State(state): State<ServerState>,
    Query(params): Query<UserParams>,
) -> Response {
    let user = match require_param(params.user, "user") {
        Ok(user) => user,
        Err(response) => return response,
    };

    let recommender = state.recommender.clone();
    let config = state.config.clone();
    let task_user = user.clone();
    let recommendations = match run_ranking(move || {
        recommender.recommend_hybrid(
            &task_user,
            config.content_weight,
            config.collab_weight,
            config.peer_count,
            config.top_n,
        )
    })
    .await
    {
        Ok(rows) => rows,
        Err(response) => return response,
    };
    Json(HybridResponse {
        user,
        recommendations,
    })
    .into_response()
}

async fn recommend_theme(
    State(state): State<ServerState>,
    Query(params): Query<ThemeParams>,
) -> Response {
    let query = match require_param(params.query, "query") {
        Ok(query) => query,
        Err(response) => return response,
    };

    let recommender = state.recommender.clone();
    let top_n = state.config.top_n;
    let task_query = query.clone();
    let recommendations =
        match run_ranking(move || recommender.recommend_by_theme(&task_query, top_n)).await {
            Ok(rows) => rows,
            Err(response) => return response,
        };
    Json(ThemeResponse {
        query,
        recommendations,
    })
    .into_response()
}

impl ServerState {
    fn new(
        config: ServerConfig,
        store: Arc<dyn LibraryStore>,
        recommender: Arc<Recommender>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            store,
            recommender,
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    store: Arc<dyn LibraryStore>,
    snapshots: Arc<dyn SnapshotProvider>,
) -> Result<Router> {
    let recommender = Arc::new(Recommender::new(store.clone(), snapshots));
    let state = ServerState::new(config, store, recommender);

    let recommend_routes: Router = Router::new()
        .route("/content", get(recommend_content))
        .route("/collab", get(recommend_collab))
        .route("/hybrid", get(recommend_hybrid))
        .route("/theme", get(recommend_theme))
        .with_state(state.clone());

    let mut app: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/recommend", recommend_routes);

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    store: Arc<dyn LibraryStore>,
    snapshots: Arc<dyn SnapshotProvider>,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store, snapshots)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

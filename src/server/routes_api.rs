use crate::caption::render_caption;
use crate::query::parse_query;
use crate::server::AppContext;
use crate::session::PagingSession;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use posterdeck_common::{
    ContentType, Error, ImageItem, MediaKind, TrendingTitle, TrendingWindow,
};
use serde::{Deserialize, Serialize};

const TRENDING_LIMIT: usize = 10;
const RECOMMEND_COUNT: usize = 5;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/posters", get(get_posters))
        .route("/trending/:kind", get(get_trending))
        .route("/recommend", get(get_recommend))
}

/// JSON error response for domain errors.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Config(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
struct PostersQuery {
    q: Option<String>,
    year: Option<u16>,
    page: Option<usize>,
}

/// One page of a title's ranked images plus its caption fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct PosterPage {
    pub title: String,
    pub year: Option<u16>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: String,
    pub content_type: ContentType,
    pub caption: String,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_images: usize,
    pub images: Vec<ImageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

async fn get_posters(
    State(ctx): State<AppContext>,
    Query(params): Query<PostersQuery>,
) -> Result<Json<PosterPage>, ApiError> {
    let parsed = parse_query(params.q.as_deref().unwrap_or_default())?;
    let year = params.year.or(parsed.year);

    let result = ctx
        .aggregator
        .aggregate(&parsed.title, year)
        .await
        .ok_or_else(|| Error::not_found(format!("no match for \"{}\"", parsed.title)))?;

    let page = params.page.unwrap_or(1).max(1);
    let page_size = ctx.config.transport.page_size;
    let caption = render_caption(&result, None);
    let session = PagingSession::new(result);
    let images = session.page(page, page_size).to_vec();
    let found = session.result();

    Ok(Json(PosterPage {
        title: found.title.clone(),
        year: found.year,
        rating: found.rating,
        genres: found.genres.clone(),
        overview: found.overview.clone(),
        content_type: found.content_type,
        caption,
        page,
        page_size,
        page_count: session.page_count(page_size),
        total_images: session.len(),
        images,
        message: session
            .is_empty()
            .then(|| "No posters found".to_string()),
    }))
}

#[derive(Deserialize)]
struct TrendingQuery {
    window: Option<String>,
}

fn parse_kind(kind: &str) -> Result<MediaKind, Error> {
    match kind.to_lowercase().as_str() {
        "movie" | "movies" => Ok(MediaKind::Movie),
        "tv" | "series" | "tvshows" => Ok(MediaKind::Series),
        other => Err(Error::invalid_input(format!("unknown media kind: {other}"))),
    }
}

async fn get_trending(
    State(ctx): State<AppContext>,
    Path(kind): Path<String>,
    Query(params): Query<TrendingQuery>,
) -> Result<Json<Vec<TrendingTitle>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let window = match params.window.as_deref() {
        Some(w) => w.parse::<TrendingWindow>().map_err(Error::invalid_input)?,
        None => TrendingWindow::Day,
    };

    Ok(Json(
        ctx.aggregator.trending(kind, window, TRENDING_LIMIT).await,
    ))
}

async fn get_recommend(State(ctx): State<AppContext>) -> Json<Vec<TrendingTitle>> {
    Json(ctx.aggregator.recommend(RECOMMEND_COUNT).await)
}

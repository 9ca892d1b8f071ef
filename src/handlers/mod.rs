/// HTTP request handlers
use crate::clients::{EonetClient, EpicClient, ImagesClient, NasaClient};
use crate::config::AppConfig;
use crate::domain::{
    DonkiKind, EpicImageType, EpicResponse, GalleryResponse, Health, NaturalEventsResponse,
    SpaceWeatherResponse,
};
use crate::errors::{ApiError, ApiResult};
use crate::services::{
    ApodService, EpicService, GalleryService, HighlightsService, MarsService,
    NaturalEventsService, NeoService, SpaceWeatherService,
};
use crate::utils::{is_date_format, validate_apod_date};
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub apod: Arc<ApodService>,
    pub mars: Arc<MarsService>,
    pub neo: Arc<NeoService>,
    pub epic: Arc<EpicService>,
    pub gallery: Arc<GalleryService>,
    pub natural_events: Arc<NaturalEventsService>,
    pub space_weather: Arc<SpaceWeatherService>,
    pub highlights: Arc<HighlightsService>,
}

impl AppState {
    /// Wire up clients and services from configuration
    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        let nasa_client = Arc::new(NasaClient::new(
            config.nasa_api_url.clone(),
            config.nasa_api_key.clone(),
        )?);
        let epic_client = EpicClient::new(config.epic_api_url.clone())?;
        let eonet_client = EonetClient::new(config.eonet_api_url.clone())?;
        let images_client = ImagesClient::new(config.images_api_url.clone())?;

        let apod = Arc::new(ApodService::new(nasa_client.clone()));
        let mars = Arc::new(MarsService::new(nasa_client.clone()));
        let neo = Arc::new(NeoService::new(nasa_client.clone()));
        let highlights = Arc::new(HighlightsService::new(
            apod.clone(),
            mars.clone(),
            neo.clone(),
        ));

        Ok(Self {
            apod,
            mars,
            neo,
            epic: Arc::new(EpicService::new(epic_client)),
            gallery: Arc::new(GalleryService::new(images_client)),
            natural_events: Arc::new(NaturalEventsService::new(eonet_client)),
            space_weather: Arc::new(SpaceWeatherService::new(nasa_client)),
            highlights,
        })
    }
}

/// Attach a Cache-Control header to a JSON response
fn with_cache_control<T: IntoResponse>(value: &str, body: T) -> Response {
    let mut response = body.into_response();
    if let Ok(value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// APOD
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ApodQuery {
    pub date: Option<String>,
}

/// Astronomy Picture of the Day.
///
/// An out-of-range or malformed date is treated as absent, so the route
/// degrades to today's (cacheable) picture rather than rejecting.
pub async fn get_apod(
    State(state): State<AppState>,
    Query(params): Query<ApodQuery>,
) -> Result<Response, ApiError> {
    let today = Utc::now().date_naive();
    let date = params
        .date
        .as_deref()
        .and_then(|d| validate_apod_date(d, today));

    let apod = state.apod.fetch(date).await?;
    let response = if date.is_some() {
        with_cache_control("no-store", Json(apod))
    } else {
        with_cache_control("public, max-age=3600", Json(apod))
    };
    Ok(response)
}

// ---------------------------------------------------------------------------
// Mars rover photos
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MarsQuery {
    pub rover: Option<String>,
    pub camera: Option<String>,
    pub sol: Option<u32>,
    pub earth_date: Option<String>,
    pub page: Option<u32>,
}

/// Rover photo listing; sol wins over earth_date when both are given
pub async fn get_mars_photos(
    State(state): State<AppState>,
    Query(params): Query<MarsQuery>,
) -> Result<Response, ApiError> {
    let rover = params.rover.as_deref().unwrap_or("curiosity");
    let page = params.page.unwrap_or(1);
    let body = state
        .mars
        .photos(
            rover,
            params.sol,
            params.earth_date.as_deref().filter(|d| !d.is_empty()),
            params.camera.as_deref().filter(|c| !c.is_empty()),
            page,
        )
        .await?;
    Ok(with_cache_control("public, max-age=3600", Json(body)))
}

/// Latest rover photo, preferring Perseverance over Curiosity
pub async fn get_mars_latest(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.mars.latest().await?;
    Ok(with_cache_control("public, max-age=1800", Json(body)))
}

// ---------------------------------------------------------------------------
// NEO feed
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NeoQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Near-Earth-object feed for a date window, passed through untouched
pub async fn get_neo_feed(
    State(state): State<AppState>,
    Query(params): Query<NeoQuery>,
) -> Result<Response, ApiError> {
    let body = state
        .neo
        .feed(
            params.start_date.as_deref().filter(|d| !d.is_empty()),
            params.end_date.as_deref().filter(|d| !d.is_empty()),
        )
        .await?;
    Ok(with_cache_control("public, max-age=3600", Json(body)))
}

/// Today's near-Earth objects
pub async fn get_neo_today(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.neo.today().await?;
    Ok(with_cache_control("public, max-age=3600", Json(body)))
}

// ---------------------------------------------------------------------------
// EPIC Earth imagery
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EpicQuery {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn get_epic_images(
    State(state): State<AppState>,
    Query(params): Query<EpicQuery>,
) -> Result<Json<EpicResponse>, ApiError> {
    let kind = match params.kind.as_deref() {
        None | Some("") => EpicImageType::Natural,
        Some(s) => s.parse::<EpicImageType>().map_err(|_| {
            ApiError::InvalidInput("Invalid type. Must be 'natural' or 'enhanced'".to_string())
        })?,
    };

    let date = params.date.as_deref().filter(|d| !d.is_empty());
    if let Some(date) = date {
        if !is_date_format(date) {
            return Err(ApiError::InvalidInput(
                "Invalid date. Expected YYYY-MM-DD".to_string(),
            ));
        }
    }

    Ok(Json(state.epic.images(kind, date).await?))
}

// ---------------------------------------------------------------------------
// NASA Image/Video Library
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub media_type: Option<String>,
    pub year_start: Option<String>,
    pub year_end: Option<String>,
    pub center: Option<String>,
}

pub async fn search_gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryQuery>,
) -> Result<Json<GalleryResponse>, ApiError> {
    let body = state
        .gallery
        .search(
            params.q.as_deref().filter(|q| !q.is_empty()).unwrap_or("space"),
            params.page.unwrap_or(1),
            params
                .media_type
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or("image"),
            params.year_start.as_deref().filter(|y| !y.is_empty()),
            params.year_end.as_deref().filter(|y| !y.is_empty()),
            params.center.as_deref().filter(|c| !c.is_empty()),
        )
        .await?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// EONET natural events
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NaturalEventsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
    pub days: Option<String>,
}

pub async fn get_natural_events(
    State(state): State<AppState>,
    Query(params): Query<NaturalEventsQuery>,
) -> Result<Json<NaturalEventsResponse>, ApiError> {
    let body = state
        .natural_events
        .events(
            params.category.as_deref(),
            params.status.as_deref(),
            params.limit.as_deref().filter(|l| !l.is_empty()).unwrap_or("50"),
            params.days.as_deref().filter(|d| !d.is_empty()).unwrap_or("30"),
        )
        .await?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// DONKI space weather
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SpaceWeatherQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

pub async fn get_space_weather(
    State(state): State<AppState>,
    Query(params): Query<SpaceWeatherQuery>,
) -> Result<Json<SpaceWeatherResponse>, ApiError> {
    let kind = match params.kind.as_deref() {
        None | Some("") | Some("all") => None,
        Some(s) => Some(
            s.parse::<DonkiKind>()
                .map_err(|_| ApiError::InvalidInput("Invalid event type".to_string()))?,
        ),
    };

    let body = state
        .space_weather
        .events(kind, params.start_date.as_deref(), params.end_date.as_deref())
        .await?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// Live highlights
// ---------------------------------------------------------------------------

/// Landing-page highlights; partial failures degrade to nulls, never errors
pub async fn get_highlights(State(state): State<AppState>) -> Response {
    let body = state.highlights.live().await;
    with_cache_control("no-store", Json(body))
}

/// Application routes configuration
use crate::handlers::{
    get_apod, get_epic_images, get_highlights, get_mars_latest, get_mars_photos,
    get_natural_events, get_neo_feed, get_neo_today, get_space_weather, health, search_gallery,
    AppState,
};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Planetary imagery
        .route("/api/apod", get(get_apod))
        .route("/api/mars", get(get_mars_photos))
        .route("/api/mars-latest", get(get_mars_latest))
        .route("/api/earth/epic", get(get_epic_images))
        // Near-Earth objects
        .route("/api/neo", get(get_neo_feed))
        .route("/api/neo-today", get(get_neo_today))
        // Media library
        .route("/api/gallery/search", get(search_gallery))
        // Event feeds
        .route("/api/natural-events", get(get_natural_events))
        .route("/api/space-weather", get(get_space_weather))
        // Aggregated landing-page data
        .route("/api/highlights", get(get_highlights))
        .with_state(state)
}

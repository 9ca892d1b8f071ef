/// External API clients and the raw upstream payload shapes.
///
/// Every upstream payload is deserialized into an explicit raw struct at
/// this boundary; the services layer turns raw shapes into the normalized
/// DTOs in `domain`.
use crate::domain::{
    DonkiKind, EpicImageType, EventCategory, EventSource, GeoCoordinates, Instrument,
    KpIndexEntry, NormalizedApod,
};
use crate::errors::{ApiError, ApiResult};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("nasa-explorer-service/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Raw shapes: Mars rover photos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarsCameraRaw {
    pub id: i64,
    pub name: String,
    pub rover_id: i64,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarsRoverRaw {
    pub id: i64,
    pub name: String,
    pub landing_date: String,
    pub launch_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarsPhotoRaw {
    pub id: i64,
    pub sol: u32,
    pub camera: MarsCameraRaw,
    pub img_src: String,
    pub earth_date: String,
    pub rover: MarsRoverRaw,
}

#[derive(Debug, Deserialize)]
pub struct MarsPhotosRaw {
    #[serde(default)]
    pub photos: Vec<MarsPhotoRaw>,
}

/// `latest_photos` listing, also the body served as-is by /api/mars-latest
#[derive(Debug, Serialize, Deserialize)]
pub struct MarsLatestRaw {
    #[serde(default)]
    pub latest_photos: Vec<MarsPhotoRaw>,
}

// ---------------------------------------------------------------------------
// Raw shapes: EPIC
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EpicItemRaw {
    pub identifier: Option<String>,
    pub image: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// "YYYY-MM-DD HH:MM:SS"
    #[serde(default)]
    pub date: Option<String>,
    pub centroid_coordinates: Option<GeoCoordinates>,
}

// ---------------------------------------------------------------------------
// Raw shapes: NASA Image/Video Library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryLinkRaw {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub rel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryDataRaw {
    pub nasa_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub center: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItemRaw {
    pub href: String,
    #[serde(default)]
    pub data: Vec<GalleryDataRaw>,
    #[serde(default)]
    pub links: Vec<GalleryLinkRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryMetadataRaw {
    #[serde(default)]
    pub total_hits: u64,
}

#[derive(Debug, Deserialize)]
pub struct GalleryCollectionRaw {
    #[serde(default)]
    pub items: Vec<GalleryItemRaw>,
    pub metadata: Option<GalleryMetadataRaw>,
}

// ---------------------------------------------------------------------------
// Raw shapes: EONET
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EonetEventRaw {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Closing date string; present (non-empty) iff the event is closed
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub categories: Vec<EventCategory>,
    #[serde(default)]
    pub sources: Vec<EventSource>,
    /// Kept as raw JSON so the response can pass the geometry through intact
    #[serde(default)]
    pub geometry: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Raw shapes: DONKI
// ---------------------------------------------------------------------------

/// Superset of the fields the seven DONKI sub-APIs emit; each sub-API fills
/// only its own slice of this.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonkiEventRaw {
    #[serde(rename = "flrID")]
    pub flr_id: Option<String>,
    #[serde(rename = "activityID")]
    pub activity_id: Option<String>,
    #[serde(rename = "gstID")]
    pub gst_id: Option<String>,
    #[serde(rename = "sepID")]
    pub sep_id: Option<String>,
    #[serde(rename = "mpcID")]
    pub mpc_id: Option<String>,
    #[serde(rename = "rbeID")]
    pub rbe_id: Option<String>,
    #[serde(rename = "hssID")]
    pub hss_id: Option<String>,
    pub begin_time: Option<String>,
    pub event_time: Option<String>,
    pub start_time: Option<String>,
    pub peak_time: Option<String>,
    pub end_time: Option<String>,
    pub source_location: Option<String>,
    pub active_region_num: Option<i64>,
    pub note: Option<String>,
    pub linked_events: Option<Vec<Value>>,
    pub class_type: Option<String>,
    pub instruments: Option<Vec<Instrument>>,
    pub speed: Option<f64>,
    pub half_angle: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub most_accurate_is_earth_direction: Option<bool>,
    pub cme_analyses: Option<Vec<Value>>,
    pub all_kp_index: Option<Vec<KpIndexEntry>>,
    pub kp_index: Option<f64>,
    pub intensity_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Raw shapes: NEO feed (highlights path)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NeoMissDistanceRaw {
    /// Decimal string, sometimes with thousands separators
    pub kilometers: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NeoApproachRaw {
    pub miss_distance: NeoMissDistanceRaw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NeoObjectRaw {
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<NeoApproachRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeoFeedRaw {
    #[serde(default)]
    pub element_count: u64,
    #[serde(default)]
    pub near_earth_objects: HashMap<String, Vec<NeoObjectRaw>>,
}

// ---------------------------------------------------------------------------
// api.nasa.gov client (APOD, Mars photos, NEO, DONKI)
// ---------------------------------------------------------------------------

pub struct NasaClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(base_url: String, api_key: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
            api_key,
        })
    }

    /// Fetch the Astronomy Picture of the Day, today's unless pinned
    pub async fn fetch_apod(&self, date: Option<NaiveDate>) -> ApiResult<NormalizedApod> {
        let url = format!("{}/planetary/apod", self.base_url);
        let mut req = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("thumbs", "true"), ("api_key", self.api_key.as_str())]);

        if let Some(date) = date {
            req = req.query(&[("date", date.to_string())]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "APOD",
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetch a page of rover photos for a sol or an earth date.
    ///
    /// `sol` wins when both are given; neither falls back to sol 1000, a
    /// well-populated default for every rover.
    pub async fn fetch_mars_photos(
        &self,
        rover: &str,
        sol: Option<u32>,
        earth_date: Option<&str>,
        camera: Option<&str>,
        page: u32,
    ) -> ApiResult<MarsPhotosRaw> {
        let url = format!("{}/mars-photos/api/v1/rovers/{}/photos", self.base_url, rover);
        let mut req = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&[("page", page)]);

        match (sol, earth_date) {
            (Some(sol), _) => req = req.query(&[("sol", sol)]),
            (None, Some(date)) => req = req.query(&[("earth_date", date)]),
            (None, None) => req = req.query(&[("sol", 1000u32)]),
        }
        if let Some(camera) = camera {
            req = req.query(&[("camera", camera)]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "Mars Rover API",
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetch the latest photos listing for one rover
    pub async fn fetch_latest_photos(&self, rover: &str) -> ApiResult<MarsLatestRaw> {
        let url = format!(
            "{}/mars-photos/api/v1/rovers/{}/latest_photos",
            self.base_url, rover
        );
        let resp = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "Mars Rover API",
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetch the NEO feed for an explicit date window
    pub async fn fetch_neo_feed(&self, start_date: &str, end_date: &str) -> ApiResult<Value> {
        self.neo_feed("NEO API", start_date, end_date).await
    }

    /// Fetch the NEO feed for today only
    pub async fn fetch_neo_today(&self) -> ApiResult<Value> {
        let today = Utc::now().date_naive().to_string();
        self.neo_feed("NEO", &today, &today).await
    }

    async fn neo_feed(
        &self,
        api: &'static str,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<Value> {
        let url = format!("{}/neo/rest/v1/feed", self.base_url);
        let resp = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[
                ("start_date", start_date),
                ("end_date", end_date),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api,
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetch one DONKI sub-API for a date window.
    ///
    /// DONKI answers 200 with a non-array body when a window is empty; that
    /// counts as zero events, not an error.
    pub async fn fetch_donki(
        &self,
        kind: DonkiKind,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<Vec<DonkiEventRaw>> {
        let url = format!("{}/DONKI/{}", self.base_url, kind.api_path());
        let resp = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[
                ("startDate", start_date),
                ("endDate", end_date),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "DONKI API",
                status: resp.status().as_u16(),
            });
        }

        let body: Value = resp.json().await?;
        match body {
            Value::Array(_) => Ok(serde_json::from_value(body)?),
            _ => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// EPIC client
// ---------------------------------------------------------------------------

pub struct EpicClient {
    http_client: HttpClient,
    base_url: String,
}

impl EpicClient {
    pub fn new(base_url: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
        })
    }

    /// List available imagery, latest unless a date is pinned
    pub async fn fetch_images(
        &self,
        kind: EpicImageType,
        date: Option<&str>,
    ) -> ApiResult<Vec<EpicItemRaw>> {
        let url = match date {
            Some(date) => format!("{}/api/{}/date/{}", self.base_url, kind.as_str(), date),
            None => format!("{}/api/{}", self.base_url, kind.as_str()),
        };
        let resp = self.http_client.get_client().get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "EPIC API",
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }
}

// ---------------------------------------------------------------------------
// EONET client
// ---------------------------------------------------------------------------

pub struct EonetClient {
    http_client: HttpClient,
    base_url: String,
}

impl EonetClient {
    pub fn new(base_url: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
        })
    }

    /// Fetch recent natural events, optionally filtered by category/status
    pub async fn fetch_events(
        &self,
        category: Option<&str>,
        status: Option<&str>,
        limit: &str,
        days: &str,
    ) -> ApiResult<Vec<EonetEventRaw>> {
        let url = format!("{}/api/v3/events", self.base_url);
        let mut req = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("limit", limit), ("days", days)]);
        if let Some(category) = category {
            req = req.query(&[("category", category)]);
        }
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "EONET API",
                status: resp.status().as_u16(),
            });
        }

        // Validate the top-level shape before trusting any field.
        let body: Value = resp.json().await?;
        let Some(events) = body.get("events") else {
            return Err(ApiError::InvalidResponse(
                "Invalid EONET API response format".to_string(),
            ));
        };
        match events {
            Value::Array(_) => Ok(serde_json::from_value(events.clone())?),
            _ => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// NASA Image/Video Library client
// ---------------------------------------------------------------------------

pub struct ImagesClient {
    http_client: HttpClient,
    base_url: String,
}

/// Fixed page size used by the gallery search
pub const GALLERY_PAGE_SIZE: u32 = 24;

impl ImagesClient {
    pub fn new(base_url: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
        })
    }

    /// Search the media library
    pub async fn search(
        &self,
        q: &str,
        page: u32,
        media_type: &str,
        year_start: Option<&str>,
        year_end: Option<&str>,
        center: Option<&str>,
    ) -> ApiResult<GalleryCollectionRaw> {
        let url = format!("{}/search", self.base_url);
        let mut req = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("q", q), ("media_type", media_type)])
            .query(&[("page", page), ("page_size", GALLERY_PAGE_SIZE)]);
        if let Some(year_start) = year_start {
            req = req.query(&[("year_start", year_start)]);
        }
        if let Some(year_end) = year_end {
            req = req.query(&[("year_end", year_end)]);
        }
        if let Some(center) = center {
            req = req.query(&[("center", center)]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                api: "NASA Images API",
                status: resp.status().as_u16(),
            });
        }

        // Validate the top-level shape before trusting any field.
        let body: Value = resp.json().await?;
        let Some(collection) = body.get("collection") else {
            return Err(ApiError::InvalidResponse(
                "Invalid NASA Images API response format".to_string(),
            ));
        };
        Ok(serde_json::from_value(collection.clone())?)
    }
}

/// Domain models: the normalized shapes served to clients
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

/// Latitude/longitude pair shared by the EPIC and EONET normalizers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// APOD
// ---------------------------------------------------------------------------

/// APOD media kind; the archive only ever serves these two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// One day's astronomy picture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedApod {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    pub explanation: String,
    pub date: String,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Mars rover photos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MarsCamera {
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarsRoverInfo {
    pub name: String,
    pub status: String,
}

/// One rover image; `img_src` is always https
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedMarsPhoto {
    pub id: i64,
    pub img_src: String,
    pub earth_date: String,
    pub sol: u32,
    pub camera: MarsCamera,
    pub rover: MarsRoverInfo,
}

#[derive(Debug, Serialize)]
pub struct MarsPhotosResponse {
    pub photos: Vec<NormalizedMarsPhoto>,
    pub rover: String,
    pub total_results: usize,
    pub page: u32,
}

// ---------------------------------------------------------------------------
// EPIC Earth imagery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpicImageType {
    Natural,
    Enhanced,
}

impl EpicImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpicImageType::Natural => "natural",
            EpicImageType::Enhanced => "enhanced",
        }
    }
}

impl FromStr for EpicImageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natural" => Ok(EpicImageType::Natural),
            "enhanced" => Ok(EpicImageType::Enhanced),
            _ => Err(()),
        }
    }
}

/// One EPIC image with its derived archive URL
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEarthImage {
    pub id: String,
    pub image: String,
    pub caption: String,
    pub date: String,
    pub coords: GeoCoordinates,
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: EpicImageType,
}

#[derive(Debug, Serialize)]
pub struct EpicResponse {
    pub images: Vec<NormalizedEarthImage>,
    pub total: usize,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EpicImageType,
}

// ---------------------------------------------------------------------------
// NASA Image/Video Library
// ---------------------------------------------------------------------------

/// One media-library item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedGalleryImage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date_created: String,
    pub center: String,
    pub keywords: Vec<String>,
    pub photographer: String,
    pub location: String,
    pub thumbnail_url: String,
    pub original_url: String,
    pub media_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryResponse {
    pub images: Vec<NormalizedGalleryImage>,
    pub total_hits: u64,
    pub has_more: bool,
    pub page: u32,
}

// ---------------------------------------------------------------------------
// EONET natural events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCategory {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSource {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventStatus {
    Open,
    Closed,
}

/// One EONET event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNaturalEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub status: EventStatus,
    pub closed_date: Option<String>,
    pub categories: Vec<EventCategory>,
    pub sources: Vec<EventSource>,
    /// First Point geometry only; null for polygon-only events
    pub coordinates: Option<GeoCoordinates>,
    pub geometry: Vec<Value>,
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
pub struct EventsSummary {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    /// Per-category-title histogram; a multi-category event counts once per category
    pub categories: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
pub struct NaturalEventsResponse {
    pub events: Vec<NormalizedNaturalEvent>,
    pub summary: EventsSummary,
}

// ---------------------------------------------------------------------------
// DONKI space weather
// ---------------------------------------------------------------------------

/// The seven DONKI sub-APIs this gateway fans out across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonkiKind {
    Flare,
    Cme,
    GeomagneticStorm,
    SolarEnergeticParticle,
    MagnetopauseCrossing,
    RadiationBeltEnhancement,
    HighSpeedStream,
}

impl DonkiKind {
    pub const ALL: [DonkiKind; 7] = [
        DonkiKind::Flare,
        DonkiKind::Cme,
        DonkiKind::GeomagneticStorm,
        DonkiKind::SolarEnergeticParticle,
        DonkiKind::MagnetopauseCrossing,
        DonkiKind::RadiationBeltEnhancement,
        DonkiKind::HighSpeedStream,
    ];

    /// Query-parameter spelling, identical to the serialized eventType tag
    pub fn as_str(&self) -> &'static str {
        match self {
            DonkiKind::Flare => "flare",
            DonkiKind::Cme => "cme",
            DonkiKind::GeomagneticStorm => "geomagneticStorm",
            DonkiKind::SolarEnergeticParticle => "solarEnergeticParticle",
            DonkiKind::MagnetopauseCrossing => "magnetopauseCrossing",
            DonkiKind::RadiationBeltEnhancement => "radiationBeltEnhancement",
            DonkiKind::HighSpeedStream => "highSpeedStream",
        }
    }

    /// Path segment under /DONKI/ on api.nasa.gov
    pub fn api_path(&self) -> &'static str {
        match self {
            DonkiKind::Flare => "FLR",
            DonkiKind::Cme => "CME",
            DonkiKind::GeomagneticStorm => "GST",
            DonkiKind::SolarEnergeticParticle => "SEP",
            DonkiKind::MagnetopauseCrossing => "MPC",
            DonkiKind::RadiationBeltEnhancement => "RBE",
            DonkiKind::HighSpeedStream => "HSS",
        }
    }
}

impl FromStr for DonkiKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DonkiKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpIndexEntry {
    pub kp_index: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Kind-specific payload, tagged with the originating sub-API
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "eventType", rename_all = "camelCase")]
pub enum SpaceWeatherDetail {
    #[serde(rename_all = "camelCase")]
    Flare {
        class_type: Option<String>,
        instruments: Vec<Instrument>,
    },
    #[serde(rename_all = "camelCase")]
    Cme {
        speed: Option<f64>,
        half_angle: Option<f64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        most_accurate_is_earth_direction: Option<bool>,
        cme_analyses: Vec<Value>,
    },
    #[serde(rename_all = "camelCase")]
    GeomagneticStorm {
        all_kp_index: Vec<KpIndexEntry>,
        kp_index: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    SolarEnergeticParticle {
        instruments: Vec<Instrument>,
        intensity_value: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    MagnetopauseCrossing { instruments: Vec<Instrument> },
    #[serde(rename_all = "camelCase")]
    RadiationBeltEnhancement { instruments: Vec<Instrument> },
    #[serde(rename_all = "camelCase")]
    HighSpeedStream {
        instruments: Vec<Instrument>,
        speed: Option<f64>,
    },
}

impl SpaceWeatherDetail {
    pub fn kind(&self) -> DonkiKind {
        match self {
            SpaceWeatherDetail::Flare { .. } => DonkiKind::Flare,
            SpaceWeatherDetail::Cme { .. } => DonkiKind::Cme,
            SpaceWeatherDetail::GeomagneticStorm { .. } => DonkiKind::GeomagneticStorm,
            SpaceWeatherDetail::SolarEnergeticParticle { .. } => {
                DonkiKind::SolarEnergeticParticle
            }
            SpaceWeatherDetail::MagnetopauseCrossing { .. } => DonkiKind::MagnetopauseCrossing,
            SpaceWeatherDetail::RadiationBeltEnhancement { .. } => {
                DonkiKind::RadiationBeltEnhancement
            }
            SpaceWeatherDetail::HighSpeedStream { .. } => DonkiKind::HighSpeedStream,
        }
    }
}

/// One DONKI event after normalization
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpaceWeatherEvent {
    pub id: String,
    /// First non-empty of beginTime/eventTime/startTime; "" when all absent
    pub begin_time: String,
    pub peak_time: Option<String>,
    pub end_time: Option<String>,
    pub source_location: Option<String>,
    pub active_region_num: Option<i64>,
    pub note: String,
    pub linked_events: Vec<Value>,
    #[serde(flatten)]
    pub detail: SpaceWeatherDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWeatherSummary {
    pub total: usize,
    pub flares: usize,
    pub cmes: usize,
    pub geomagnetic_storms: usize,
    pub solar_energetic_particles: usize,
    pub magnetopause_crossings: usize,
    pub radiation_belt_enhancements: usize,
    pub high_speed_streams: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWeatherResponse {
    pub events: Vec<NormalizedSpaceWeatherEvent>,
    pub summary: SpaceWeatherSummary,
    pub date_range: DateRange,
}

// ---------------------------------------------------------------------------
// Live highlights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedApod {
    pub title: String,
    /// Image URL; for videos this is the thumbnail when one exists
    pub url: String,
    pub date: String,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarsRoverName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedMarsPhoto {
    pub id: i64,
    pub img_src: String,
    pub earth_date: String,
    pub sol: u32,
    pub camera: MarsCamera,
    pub rover: MarsRoverName,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedNeo {
    pub count: u64,
    pub hazardous_count: u64,
    /// Minimum miss distance in km, thousands-separated; "N/A" with no approaches
    pub closest_approach_km: String,
}

/// Partial-success envelope for the landing-page highlights widget
#[derive(Debug, Serialize)]
pub struct LiveHighlights {
    pub apod: Option<ProcessedApod>,
    pub mars: Option<ProcessedMarsPhoto>,
    pub neo: Option<ProcessedNeo>,
    /// Failure messages in call order (apod, mars, neo)
    pub errors: Vec<String>,
}

/// Normalization services: one per NASA data source, plus the
/// live-highlights aggregator.
use crate::clients::{
    DonkiEventRaw, EonetClient, EonetEventRaw, EpicClient, EpicItemRaw, GalleryItemRaw,
    ImagesClient, MarsLatestRaw, MarsPhotoRaw, NasaClient, NeoFeedRaw, GALLERY_PAGE_SIZE,
};
use crate::domain::{
    DateRange, DonkiKind, EpicImageType, EpicResponse, EventStatus, EventsSummary,
    GalleryResponse, GeoCoordinates, LiveHighlights, MarsCamera, MarsPhotosResponse,
    MarsRoverInfo, MarsRoverName, MediaType, NaturalEventsResponse, NormalizedApod,
    NormalizedEarthImage, NormalizedGalleryImage, NormalizedMarsPhoto, NormalizedNaturalEvent,
    NormalizedSpaceWeatherEvent, ProcessedApod, ProcessedMarsPhoto, ProcessedNeo,
    SpaceWeatherDetail, SpaceWeatherResponse, SpaceWeatherSummary,
};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{event_time_millis, force_https, format_thousands, pick_str};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Rovers tried, in order, by the latest-photo fallback chain
const LATEST_ROVERS: [&str; 2] = ["perseverance", "curiosity"];

/// Host serving the EPIC image archive; fixed, independent of the API host
const EPIC_ARCHIVE_URL: &str = "https://epic.gsfc.nasa.gov/archive";

// ---------------------------------------------------------------------------
// APOD
// ---------------------------------------------------------------------------

pub struct ApodService {
    client: Arc<NasaClient>,
}

impl ApodService {
    pub fn new(client: Arc<NasaClient>) -> Self {
        Self { client }
    }

    /// Fetch today's picture, or an exact archive day when `date` is given.
    /// Date validation happens at the handler; by this point a date is known
    /// to be within the archive range.
    pub async fn fetch(&self, date: Option<NaiveDate>) -> ApiResult<NormalizedApod> {
        self.client.fetch_apod(date).await
    }
}

// ---------------------------------------------------------------------------
// Mars rover photos
// ---------------------------------------------------------------------------

pub struct MarsService {
    client: Arc<NasaClient>,
}

impl MarsService {
    pub fn new(client: Arc<NasaClient>) -> Self {
        Self { client }
    }

    /// List photos for a rover, sol or earth date, optionally one camera
    pub async fn photos(
        &self,
        rover: &str,
        sol: Option<u32>,
        earth_date: Option<&str>,
        camera: Option<&str>,
        page: u32,
    ) -> ApiResult<MarsPhotosResponse> {
        let raw = self
            .client
            .fetch_mars_photos(rover, sol, earth_date, camera, page)
            .await?;
        let photos: Vec<NormalizedMarsPhoto> =
            raw.photos.into_iter().map(normalize_mars_photo).collect();
        Ok(MarsPhotosResponse {
            total_results: photos.len(),
            photos,
            rover: rover.to_string(),
            page,
        })
    }

    /// Latest photos from the first rover that has any.
    ///
    /// A failing rover does not abort the chain; only both rovers coming up
    /// empty (or failing) is a 404.
    pub async fn latest(&self) -> ApiResult<MarsLatestRaw> {
        for rover in LATEST_ROVERS {
            match self.client.fetch_latest_photos(rover).await {
                Ok(mut data) if !data.latest_photos.is_empty() => {
                    for photo in &mut data.latest_photos {
                        photo.img_src = force_https(&photo.img_src);
                    }
                    return Ok(data);
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(rover, error = %e, "latest photos fetch failed, trying next rover");
                    continue;
                }
            }
        }
        Err(ApiError::NotFound("No latest photos available".to_string()))
    }
}

fn normalize_mars_photo(raw: MarsPhotoRaw) -> NormalizedMarsPhoto {
    NormalizedMarsPhoto {
        id: raw.id,
        img_src: force_https(&raw.img_src),
        earth_date: raw.earth_date,
        sol: raw.sol,
        camera: MarsCamera {
            name: raw.camera.name,
            full_name: raw.camera.full_name,
        },
        rover: MarsRoverInfo {
            name: raw.rover.name,
            status: raw.rover.status,
        },
    }
}

// ---------------------------------------------------------------------------
// NEO feed
// ---------------------------------------------------------------------------

pub struct NeoService {
    client: Arc<NasaClient>,
}

impl NeoService {
    pub fn new(client: Arc<NasaClient>) -> Self {
        Self { client }
    }

    /// Feed for an explicit window; either bound defaults to today
    pub async fn feed(&self, start_date: Option<&str>, end_date: Option<&str>) -> ApiResult<Value> {
        let today = Utc::now().date_naive().to_string();
        self.client
            .fetch_neo_feed(start_date.unwrap_or(&today), end_date.unwrap_or(&today))
            .await
    }

    /// Feed for today only
    pub async fn today(&self) -> ApiResult<Value> {
        self.client.fetch_neo_today().await
    }
}

// ---------------------------------------------------------------------------
// EPIC Earth imagery
// ---------------------------------------------------------------------------

pub struct EpicService {
    client: EpicClient,
}

impl EpicService {
    pub fn new(client: EpicClient) -> Self {
        Self { client }
    }

    pub async fn images(
        &self,
        kind: EpicImageType,
        date: Option<&str>,
    ) -> ApiResult<EpicResponse> {
        let raw = self.client.fetch_images(kind, date).await?;
        let images: Vec<NormalizedEarthImage> = raw
            .into_iter()
            .map(|item| normalize_epic_item(item, kind))
            .collect();
        Ok(EpicResponse {
            total: images.len(),
            images,
            date: date.unwrap_or("latest").to_string(),
            kind,
        })
    }
}

fn normalize_epic_item(item: EpicItemRaw, kind: EpicImageType) -> NormalizedEarthImage {
    let date = item.date.unwrap_or_default();
    let image_url = epic_archive_url(&date, kind, &item.image);
    NormalizedEarthImage {
        id: item.identifier.unwrap_or_else(|| item.image.clone()),
        image: item.image,
        caption: item.caption.unwrap_or_default(),
        date,
        coords: item
            .centroid_coordinates
            .unwrap_or(GeoCoordinates { lat: 0.0, lon: 0.0 }),
        image_url,
        kind,
    }
}

/// Build the fixed EPIC archive URL from an item's
/// "YYYY-MM-DD HH:MM:SS" date, the imagery type, and the image identifier
fn epic_archive_url(date: &str, kind: EpicImageType, image: &str) -> String {
    let day = date.split(' ').next().unwrap_or("");
    let mut parts = day.split('-');
    let year = parts.next().unwrap_or("");
    let month = parts.next().unwrap_or("");
    let day = parts.next().unwrap_or("");
    format!(
        "{EPIC_ARCHIVE_URL}/{}/{year}/{month}/{day}/png/{image}.png",
        kind.as_str()
    )
}

// ---------------------------------------------------------------------------
// NASA Image/Video Library
// ---------------------------------------------------------------------------

pub struct GalleryService {
    client: ImagesClient,
}

impl GalleryService {
    pub fn new(client: ImagesClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        q: &str,
        page: u32,
        media_type: &str,
        year_start: Option<&str>,
        year_end: Option<&str>,
        center: Option<&str>,
    ) -> ApiResult<GalleryResponse> {
        let collection = self
            .client
            .search(q, page, media_type, year_start, year_end, center)
            .await?;

        let images: Vec<NormalizedGalleryImage> = collection
            .items
            .into_iter()
            .filter_map(normalize_gallery_item)
            .collect();
        let total_hits = collection.metadata.map(|m| m.total_hits).unwrap_or(0);

        Ok(GalleryResponse {
            images,
            total_hits,
            // Heuristic carried over from the source service; can disagree
            // with the actual item count on the last page.
            has_more: u64::from(page) * u64::from(GALLERY_PAGE_SIZE) < total_hits,
            page,
        })
    }
}

/// Items without a data[] entry carry no usable metadata and are dropped
fn normalize_gallery_item(item: GalleryItemRaw) -> Option<NormalizedGalleryImage> {
    let GalleryItemRaw { href, data, links } = item;
    let meta = data.into_iter().next()?;
    let thumbnail_url = links
        .into_iter()
        .find(|link| link.rel == "preview")
        .map(|link| link.href)
        .unwrap_or_default();

    Some(NormalizedGalleryImage {
        id: meta.nasa_id,
        title: meta.title.unwrap_or_else(|| "Untitled".to_string()),
        description: meta.description.unwrap_or_default(),
        date_created: meta.date_created.unwrap_or_default(),
        center: meta.center.unwrap_or_default(),
        keywords: meta.keywords,
        photographer: meta.photographer.unwrap_or_default(),
        location: meta.location.unwrap_or_default(),
        thumbnail_url,
        original_url: href,
        media_type: meta.media_type,
    })
}

// ---------------------------------------------------------------------------
// EONET natural events
// ---------------------------------------------------------------------------

pub struct NaturalEventsService {
    client: EonetClient,
}

impl NaturalEventsService {
    pub fn new(client: EonetClient) -> Self {
        Self { client }
    }

    pub async fn events(
        &self,
        category: Option<&str>,
        status: Option<&str>,
        limit: &str,
        days: &str,
    ) -> ApiResult<NaturalEventsResponse> {
        let category = category.filter(|c| !c.is_empty() && *c != "all");
        let status = status
            .filter(|s| !s.is_empty() && *s != "all")
            .map(str::to_lowercase);

        let raw = self
            .client
            .fetch_events(category, status.as_deref(), limit, days)
            .await?;
        let events: Vec<NormalizedNaturalEvent> =
            raw.into_iter().map(normalize_natural_event).collect();
        let summary = summarize_events(&events);
        Ok(NaturalEventsResponse { events, summary })
    }
}

fn normalize_natural_event(raw: EonetEventRaw) -> NormalizedNaturalEvent {
    let coordinates = point_coordinates(&raw.geometry);
    let closed = raw.closed.filter(|c| !c.is_empty());
    NormalizedNaturalEvent {
        id: raw.id,
        title: raw.title,
        description: raw.description.unwrap_or_default(),
        link: raw.link.unwrap_or_default(),
        status: if closed.is_some() {
            EventStatus::Closed
        } else {
            EventStatus::Open
        },
        closed_date: closed,
        categories: raw.categories,
        sources: raw.sources,
        coordinates,
        geometry: raw.geometry,
        last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Extract {lat, lon} from the first geometry entry, only when it is a
/// Point with at least two numeric coordinates. GeoJSON orders [lon, lat].
fn point_coordinates(geometry: &[Value]) -> Option<GeoCoordinates> {
    let first = geometry.first()?;
    if first.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    let coords = first.get("coordinates")?.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    Some(GeoCoordinates {
        lon: coords[0].as_f64()?,
        lat: coords[1].as_f64()?,
    })
}

fn summarize_events(events: &[NormalizedNaturalEvent]) -> EventsSummary {
    let open = events
        .iter()
        .filter(|e| e.status == EventStatus::Open)
        .count();
    let mut categories: BTreeMap<String, u32> = BTreeMap::new();
    for event in events {
        for category in &event.categories {
            *categories.entry(category.title.clone()).or_insert(0) += 1;
        }
    }
    EventsSummary {
        total: events.len(),
        open,
        closed: events.len() - open,
        categories,
    }
}

// ---------------------------------------------------------------------------
// DONKI space weather
// ---------------------------------------------------------------------------

pub struct SpaceWeatherService {
    client: Arc<NasaClient>,
}

impl SpaceWeatherService {
    pub fn new(client: Arc<NasaClient>) -> Self {
        Self { client }
    }

    /// Events for one sub-kind, or all seven when `kind` is None.
    ///
    /// The two paths deliberately differ in failure policy: the all-kinds
    /// fan-out degrades a failing sub-API to zero events, while a request
    /// for a specific kind surfaces the upstream failure as 502.
    pub async fn events(
        &self,
        kind: Option<DonkiKind>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ApiResult<SpaceWeatherResponse> {
        let today = Utc::now().date_naive();
        let end = end_date
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| today.to_string());
        let start = start_date
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (today - chrono::Days::new(7)).to_string());

        let mut events: Vec<NormalizedSpaceWeatherEvent> = match kind {
            Some(kind) => {
                let raw = self.client.fetch_donki(kind, &start, &end).await?;
                raw.into_iter()
                    .map(|event| normalize_space_weather_event(kind, event))
                    .collect()
            }
            None => {
                let [flr, cme, gst, sep, mpc, rbe, hss] = DonkiKind::ALL;
                let (flr, cme, gst, sep, mpc, rbe, hss) = tokio::join!(
                    self.fetch_kind_tolerant(flr, &start, &end),
                    self.fetch_kind_tolerant(cme, &start, &end),
                    self.fetch_kind_tolerant(gst, &start, &end),
                    self.fetch_kind_tolerant(sep, &start, &end),
                    self.fetch_kind_tolerant(mpc, &start, &end),
                    self.fetch_kind_tolerant(rbe, &start, &end),
                    self.fetch_kind_tolerant(hss, &start, &end),
                );
                [flr, cme, gst, sep, mpc, rbe, hss]
                    .into_iter()
                    .flatten()
                    .collect()
            }
        };

        events.sort_by_key(|event| Reverse(event_time_millis(&event.begin_time)));

        let date_range = DateRange { start, end };
        let summary = summarize_space_weather(&events, date_range.clone());
        Ok(SpaceWeatherResponse {
            events,
            summary,
            date_range,
        })
    }

    /// One sub-API of the all-kinds fan-out; any failure becomes zero events
    async fn fetch_kind_tolerant(
        &self,
        kind: DonkiKind,
        start: &str,
        end: &str,
    ) -> Vec<NormalizedSpaceWeatherEvent> {
        match self.client.fetch_donki(kind, start, end).await {
            Ok(raw) => raw
                .into_iter()
                .map(|event| normalize_space_weather_event(kind, event))
                .collect(),
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "DONKI sub-request failed");
                Vec::new()
            }
        }
    }
}

fn normalize_space_weather_event(
    kind: DonkiKind,
    raw: DonkiEventRaw,
) -> NormalizedSpaceWeatherEvent {
    // Each sub-API names its ID field differently; try them all in a fixed
    // order before synthesizing one.
    let id = pick_str(&[
        raw.flr_id.as_deref(),
        raw.activity_id.as_deref(),
        raw.gst_id.as_deref(),
        raw.sep_id.as_deref(),
        raw.mpc_id.as_deref(),
        raw.rbe_id.as_deref(),
        raw.hss_id.as_deref(),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| synthesize_event_id(kind));

    let begin_time = pick_str(&[
        raw.begin_time.as_deref(),
        raw.event_time.as_deref(),
        raw.start_time.as_deref(),
    ])
    .unwrap_or_default()
    .to_string();

    let detail = match kind {
        DonkiKind::Flare => SpaceWeatherDetail::Flare {
            class_type: raw.class_type,
            instruments: raw.instruments.unwrap_or_default(),
        },
        DonkiKind::Cme => SpaceWeatherDetail::Cme {
            speed: raw.speed,
            half_angle: raw.half_angle,
            latitude: raw.latitude,
            longitude: raw.longitude,
            most_accurate_is_earth_direction: raw.most_accurate_is_earth_direction,
            cme_analyses: raw.cme_analyses.unwrap_or_default(),
        },
        DonkiKind::GeomagneticStorm => SpaceWeatherDetail::GeomagneticStorm {
            all_kp_index: raw.all_kp_index.unwrap_or_default(),
            kp_index: raw.kp_index,
        },
        DonkiKind::SolarEnergeticParticle => SpaceWeatherDetail::SolarEnergeticParticle {
            instruments: raw.instruments.unwrap_or_default(),
            intensity_value: raw.intensity_value,
        },
        DonkiKind::MagnetopauseCrossing => SpaceWeatherDetail::MagnetopauseCrossing {
            instruments: raw.instruments.unwrap_or_default(),
        },
        DonkiKind::RadiationBeltEnhancement => SpaceWeatherDetail::RadiationBeltEnhancement {
            instruments: raw.instruments.unwrap_or_default(),
        },
        DonkiKind::HighSpeedStream => SpaceWeatherDetail::HighSpeedStream {
            instruments: raw.instruments.unwrap_or_default(),
            speed: raw.speed,
        },
    };

    NormalizedSpaceWeatherEvent {
        id,
        begin_time,
        peak_time: raw.peak_time,
        end_time: raw.end_time,
        source_location: raw.source_location,
        active_region_num: raw.active_region_num,
        note: raw.note.unwrap_or_default(),
        linked_events: raw.linked_events.unwrap_or_default(),
        detail,
    }
}

/// The uuid suffix keeps two IDs synthesized in the same millisecond distinct
fn synthesize_event_id(kind: DonkiKind) -> String {
    format!(
        "{}-{}-{}",
        kind.as_str(),
        Utc::now().timestamp_millis(),
        Uuid::new_v4()
    )
}

fn summarize_space_weather(
    events: &[NormalizedSpaceWeatherEvent],
    date_range: DateRange,
) -> SpaceWeatherSummary {
    let count =
        |kind: DonkiKind| events.iter().filter(|e| e.detail.kind() == kind).count();
    SpaceWeatherSummary {
        total: events.len(),
        flares: count(DonkiKind::Flare),
        cmes: count(DonkiKind::Cme),
        geomagnetic_storms: count(DonkiKind::GeomagneticStorm),
        solar_energetic_particles: count(DonkiKind::SolarEnergeticParticle),
        magnetopause_crossings: count(DonkiKind::MagnetopauseCrossing),
        radiation_belt_enhancements: count(DonkiKind::RadiationBeltEnhancement),
        high_speed_streams: count(DonkiKind::HighSpeedStream),
        date_range,
    }
}

// ---------------------------------------------------------------------------
// Live highlights aggregator
// ---------------------------------------------------------------------------

pub struct HighlightsService {
    apod: Arc<ApodService>,
    mars: Arc<MarsService>,
    neo: Arc<NeoService>,
}

impl HighlightsService {
    pub fn new(apod: Arc<ApodService>, mars: Arc<MarsService>, neo: Arc<NeoService>) -> Self {
        Self { apod, mars, neo }
    }

    /// Fetch the three landing-page highlights concurrently.
    ///
    /// Each source fails independently; a failure nulls its slot and appends
    /// a message, and the aggregate itself always succeeds.
    pub async fn live(&self) -> LiveHighlights {
        let (apod, mars, neo) = tokio::join!(
            self.apod_highlight(),
            self.mars_highlight(),
            self.neo_highlight(),
        );

        let mut errors = Vec::new();
        let apod = settle(apod, "Failed to fetch APOD data", &mut errors);
        let mars = settle(mars, "Failed to fetch Mars rover data", &mut errors);
        let neo = settle(neo, "Failed to fetch NEO data", &mut errors);

        LiveHighlights {
            apod,
            mars,
            neo,
            errors,
        }
    }

    async fn apod_highlight(&self) -> ApiResult<ProcessedApod> {
        let apod = self.apod.fetch(None).await?;
        let url = match apod.media_type {
            MediaType::Image => apod.url,
            MediaType::Video => apod.thumbnail_url.unwrap_or(apod.url),
        };
        Ok(ProcessedApod {
            title: apod.title,
            url,
            date: apod.date,
            media_type: apod.media_type,
        })
    }

    async fn mars_highlight(&self) -> ApiResult<ProcessedMarsPhoto> {
        let latest = self.mars.latest().await?;
        let photo = latest
            .latest_photos
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("No Mars photos available".to_string()))?;
        Ok(ProcessedMarsPhoto {
            id: photo.id,
            img_src: photo.img_src,
            earth_date: photo.earth_date,
            sol: photo.sol,
            camera: MarsCamera {
                name: photo.camera.name,
                full_name: photo.camera.full_name,
            },
            rover: MarsRoverName {
                name: photo.rover.name,
            },
        })
    }

    async fn neo_highlight(&self) -> ApiResult<ProcessedNeo> {
        let feed: NeoFeedRaw = serde_json::from_value(self.neo.today().await?)?;
        let today = Utc::now().date_naive().to_string();
        Ok(process_neo_feed(&feed, &today))
    }
}

fn settle<T>(result: ApiResult<T>, message: &str, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "{message}");
            errors.push(message.to_string());
            None
        }
    }
}

fn process_neo_feed(feed: &NeoFeedRaw, today: &str) -> ProcessedNeo {
    let objects = feed
        .near_earth_objects
        .get(today)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let hazardous_count = objects
        .iter()
        .filter(|o| o.is_potentially_hazardous_asteroid)
        .count() as u64;

    let mut closest: Option<f64> = None;
    for object in objects {
        for approach in &object.close_approach_data {
            let Ok(km) = approach.miss_distance.kilometers.replace(',', "").parse::<f64>() else {
                continue;
            };
            if closest.map_or(true, |c| km < c) {
                closest = Some(km);
            }
        }
    }

    ProcessedNeo {
        count: feed.element_count,
        hazardous_count,
        closest_approach_km: closest
            .map(format_thousands)
            .unwrap_or_else(|| "N/A".to_string()),
    }
}

//! Integration tests for the gateway routes, driven end to end against a
//! mock NASA upstream.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, build_test_app, get};
use mockito::{Matcher, Server};
use serde_json::json;

fn apod_body() -> serde_json::Value {
    json!({
        "title": "Pillars of Creation",
        "url": "https://apod.nasa.gov/apod/image/pillars.jpg",
        "hdurl": "https://apod.nasa.gov/apod/image/pillars_hd.jpg",
        "explanation": "A stellar nursery in the Eagle Nebula.",
        "date": "2024-01-01",
        "media_type": "image"
    })
}

fn mars_photo_body(id: i64, img_src: &str) -> serde_json::Value {
    json!({
        "id": id,
        "sol": 1000,
        "camera": {
            "id": 20,
            "name": "FHAZ",
            "rover_id": 5,
            "full_name": "Front Hazard Avoidance Camera"
        },
        "img_src": img_src,
        "earth_date": "2015-05-30",
        "rover": {
            "id": 5,
            "name": "Curiosity",
            "landing_date": "2012-08-06",
            "launch_date": "2011-11-26",
            "status": "active"
        }
    })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let server = Server::new_async().await;
    let app = build_test_app(&server.url());

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["now"].is_string());
}

// ---------------------------------------------------------------------------
// APOD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apod_malformed_date_behaves_like_absent_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apod_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/apod?date=not-a-date").await;

    assert_eq!(response.status(), StatusCode::OK);
    // The invalid date degrades to the cacheable "today" behavior.
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );
    let body = body_json(response).await;
    assert_eq!(body["title"], "Pillars of Creation");
    assert_eq!(body["media_type"], "image");
    mock.assert_async().await;
}

#[tokio::test]
async fn apod_out_of_range_date_behaves_like_absent_date() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apod_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    // Predates the APOD archive.
    let response = get(app, "/api/apod?date=1980-01-01").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );
}

#[tokio::test]
async fn apod_valid_date_is_pinned_and_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("date".into(), "2024-01-01".into()),
            Matcher::UrlEncoded("thumbs".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apod_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/apod?date=2024-01-01").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn apod_upstream_failure_maps_to_502() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/apod").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "APOD upstream error");
    assert_eq!(body["status"], 429);
}

// ---------------------------------------------------------------------------
// Mars rover photos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mars_photos_are_https_and_wrapped_in_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/curiosity/photos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sol".into(), "1000".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "photos": [
                    mars_photo_body(1, "http://mars.jpl.nasa.gov/a.jpg"),
                    mars_photo_body(2, "https://mars.jpl.nasa.gov/b.jpg")
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/mars").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["rover"], "curiosity");
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_results"], 2);
    for photo in body["photos"].as_array().unwrap() {
        let src = photo["img_src"].as_str().unwrap();
        assert!(src.starts_with("https://"), "expected https, got {src}");
    }
}

#[tokio::test]
async fn mars_sol_takes_precedence_over_earth_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/mars-photos/api/v1/rovers/curiosity/photos")
        .match_query(Matcher::UrlEncoded("sol".into(), "500".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"photos": []}).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/mars?sol=500&earth_date=2015-05-30").await;

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn mars_latest_falls_back_to_second_rover() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/perseverance/latest_photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"latest_photos": []}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/curiosity/latest_photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"latest_photos": [mars_photo_body(42, "http://mars.jpl.nasa.gov/c.jpg")]})
                .to_string(),
        )
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/mars-latest").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["latest_photos"][0]["id"], 42);
    assert_eq!(
        body["latest_photos"][0]["img_src"],
        "https://mars.jpl.nasa.gov/c.jpg"
    );
}

#[tokio::test]
async fn mars_latest_rover_failure_does_not_abort_the_chain() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/perseverance/latest_photos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/curiosity/latest_photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"latest_photos": [mars_photo_body(7, "https://mars.jpl.nasa.gov/d.jpg")]})
                .to_string(),
        )
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/mars-latest").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["latest_photos"][0]["id"], 7);
}

#[tokio::test]
async fn mars_latest_with_no_photos_anywhere_is_404() {
    let mut server = Server::new_async().await;
    for rover in ["perseverance", "curiosity"] {
        server
            .mock(
                "GET",
                format!("/mars-photos/api/v1/rovers/{rover}/latest_photos").as_str(),
            )
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"latest_photos": []}).to_string())
            .create_async()
            .await;
    }

    let app = build_test_app(&server.url());
    let response = get(app, "/api/mars-latest").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No latest photos available");
}

// ---------------------------------------------------------------------------
// EPIC
// ---------------------------------------------------------------------------

#[tokio::test]
async fn epic_builds_archive_url_from_item_date() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/natural/date/2024-01-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "identifier": "X",
                "image": "epic_1b_20240101000000",
                "date": "2024-01-01 00:00:00",
                "centroid_coordinates": {"lat": 1.0, "lon": 2.0}
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/earth/epic?type=natural&date=2024-01-01").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["date"], "2024-01-01");
    assert_eq!(body["type"], "natural");
    assert_eq!(
        body["images"][0]["image_url"],
        "https://epic.gsfc.nasa.gov/archive/natural/2024/01/01/png/epic_1b_20240101000000.png"
    );
    assert_eq!(body["images"][0]["coords"]["lat"], 1.0);
}

#[tokio::test]
async fn epic_without_date_requests_latest() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/enhanced")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([]).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/earth/epic?type=enhanced").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["date"], "latest");
    assert_eq!(body["total"], 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn epic_rejects_unknown_type() {
    let server = Server::new_async().await;
    let app = build_test_app(&server.url());

    let response = get(app, "/api/earth/epic?type=infrared").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid type. Must be 'natural' or 'enhanced'");
}

#[tokio::test]
async fn epic_rejects_malformed_date() {
    let server = Server::new_async().await;
    let app = build_test_app(&server.url());

    let response = get(app, "/api/earth/epic?date=January").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

fn gallery_body(total_hits: u64) -> serde_json::Value {
    json!({
        "collection": {
            "version": "1.0",
            "href": "https://images-api.nasa.gov/search?q=moon",
            "items": [
                {
                    "href": "https://images-api.nasa.gov/asset/as11-40-5874",
                    "data": [{
                        "nasa_id": "as11-40-5874",
                        "title": "Apollo 11",
                        "media_type": "image",
                        "date_created": "1969-07-20T00:00:00Z",
                        "keywords": ["moon", "apollo"]
                    }],
                    "links": [
                        {"href": "https://images-assets.nasa.gov/thumb.jpg", "rel": "preview"}
                    ]
                },
                {
                    "href": "https://images-api.nasa.gov/asset/empty",
                    "data": [],
                    "links": []
                }
            ],
            "metadata": {"total_hits": total_hits}
        }
    })
}

#[tokio::test]
async fn gallery_drops_items_without_data_and_derives_has_more() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "moon".into()),
            Matcher::UrlEncoded("page_size".into(), "24".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gallery_body(100).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/gallery/search?q=moon").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // The data-less item is dropped.
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["images"][0]["id"], "as11-40-5874");
    assert_eq!(
        body["images"][0]["thumbnailUrl"],
        "https://images-assets.nasa.gov/thumb.jpg"
    );
    assert_eq!(body["totalHits"], 100);
    assert_eq!(body["hasMore"], true);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn gallery_has_more_false_on_last_page() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gallery_body(20).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/gallery/search").await;

    let body = body_json(response).await;
    assert_eq!(body["hasMore"], false);
}

#[tokio::test]
async fn gallery_rejects_response_without_collection_key() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"unexpected": true}).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/gallery/search").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid NASA Images API response format");
}

#[tokio::test]
async fn gallery_identical_queries_yield_identical_responses() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gallery_body(100).to_string())
        .expect(2)
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let first = body_json(get(app.clone(), "/api/gallery/search?q=moon&page=2").await).await;
    let second = body_json(get(app, "/api/gallery/search?q=moon&page=2").await).await;
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// EONET natural events
// ---------------------------------------------------------------------------

fn eonet_body() -> serde_json::Value {
    json!({
        "title": "EONET Events",
        "events": [
            {
                "id": "EONET_0001",
                "title": "Wildfire, California",
                "link": "https://eonet.gsfc.nasa.gov/api/v3/events/EONET_0001",
                "closed": null,
                "categories": [{"id": "wildfires", "title": "Wildfires"}],
                "sources": [{"id": "InciWeb", "url": "https://inciweb.wildfire.gov/1"}],
                "geometry": [{"type": "Point", "coordinates": [-120.5, 38.2]}]
            },
            {
                "id": "EONET_0002",
                "title": "Tropical Storm",
                "link": "https://eonet.gsfc.nasa.gov/api/v3/events/EONET_0002",
                "closed": "2024-02-01T00:00:00Z",
                "categories": [
                    {"id": "severeStorms", "title": "Severe Storms"},
                    {"id": "floods", "title": "Floods"}
                ],
                "sources": [],
                "geometry": [{"type": "Polygon", "coordinates": [[[0.0, 0.0]]]}]
            }
        ]
    })
}

#[tokio::test]
async fn natural_events_summary_arithmetic_holds() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v3/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("days".into(), "30".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(eonet_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/natural-events").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let events = body["events"].as_array().unwrap();
    let summary = &body["summary"];
    assert_eq!(summary["total"].as_u64().unwrap() as usize, events.len());
    assert_eq!(
        summary["total"].as_u64().unwrap(),
        summary["open"].as_u64().unwrap() + summary["closed"].as_u64().unwrap()
    );
    // The two-category storm increments both buckets.
    assert_eq!(summary["categories"]["Severe Storms"], 1);
    assert_eq!(summary["categories"]["Floods"], 1);
    assert_eq!(summary["categories"]["Wildfires"], 1);

    // Point geometry swaps [lon, lat] into {lat, lon}; polygons yield null.
    assert_eq!(events[0]["status"], "Open");
    assert_eq!(events[0]["coordinates"]["lat"], 38.2);
    assert_eq!(events[0]["coordinates"]["lon"], -120.5);
    assert_eq!(events[1]["status"], "Closed");
    assert_eq!(events[1]["coordinates"], serde_json::Value::Null);
}

#[tokio::test]
async fn natural_events_all_filters_are_omitted_upstream() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("days".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"events": []}).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(
        app,
        "/api/natural-events?category=all&status=all&limit=10&days=7",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn natural_events_rejects_response_without_events_key() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v3/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"title": "no events here"}).to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/natural-events").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid EONET API response format");
}

// ---------------------------------------------------------------------------
// DONKI space weather
// ---------------------------------------------------------------------------

#[tokio::test]
async fn space_weather_specific_type_upstream_failure_is_502() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/DONKI/CME")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/space-weather?type=cme").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "DONKI API upstream error");
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn space_weather_all_tolerates_one_failing_sub_api() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/DONKI/FLR")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "flrID": "FLR-2024-001",
                "beginTime": "2024-05-10T16:36Z",
                "peakTime": "2024-05-10T17:44Z",
                "classType": "X1.0",
                "instruments": [{"displayName": "GOES-P: EXIS 1.0-8.0"}]
            }])
            .to_string(),
        )
        .create_async()
        .await;
    // One sub-API down; the fan-out must still serve the rest.
    server
        .mock("GET", "/DONKI/CME")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    for path in ["GST", "SEP", "MPC", "RBE", "HSS"] {
        server
            .mock("GET", format!("/DONKI/{path}").as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
    }

    let app = build_test_app(&server.url());
    let response = get(app, "/api/space-weather").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"]["total"], 1);
    assert_eq!(body["summary"]["flares"], 1);
    assert_eq!(body["summary"]["cmes"], 0);
    assert_eq!(body["events"][0]["id"], "FLR-2024-001");
    assert_eq!(body["events"][0]["eventType"], "flare");
    assert_eq!(body["events"][0]["classType"], "X1.0");
}

#[tokio::test]
async fn space_weather_events_sorted_descending_by_begin_time() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/DONKI/GST")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"gstID": "older", "startTime": "2024-05-08T03:00Z", "allKpIndex": []},
                {"gstID": "newer", "startTime": "2024-05-10T03:00Z", "allKpIndex": []}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/space-weather?type=geomagneticStorm").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["events"][0]["id"], "newer");
    assert_eq!(body["events"][1]["id"], "older");
}

#[tokio::test]
async fn space_weather_rejects_unknown_type() {
    let server = Server::new_async().await;
    let app = build_test_app(&server.url());

    let response = get(app, "/api/space-weather?type=sunspots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid event type");
}

#[tokio::test]
async fn space_weather_echoes_explicit_date_range() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/DONKI/FLR")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startDate".into(), "2024-05-01".into()),
            Matcher::UrlEncoded("endDate".into(), "2024-05-08".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(
        app,
        "/api/space-weather?type=flare&startDate=2024-05-01&endDate=2024-05-08",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["dateRange"]["start"], "2024-05-01");
    assert_eq!(body["dateRange"]["end"], "2024-05-08");
    assert_eq!(body["summary"]["dateRange"]["end"], "2024-05-08");
}

// ---------------------------------------------------------------------------
// Live highlights
// ---------------------------------------------------------------------------

fn mock_neo_today_body() -> serde_json::Value {
    let today = chrono::Utc::now().date_naive().to_string();
    let mut feed = json!({
        "element_count": 2,
        "near_earth_objects": {}
    });
    feed["near_earth_objects"][today.as_str()] = json!([
        {
            "is_potentially_hazardous_asteroid": true,
            "close_approach_data": [
                {"miss_distance": {"kilometers": "7480326.72"}}
            ]
        },
        {
            "is_potentially_hazardous_asteroid": false,
            "close_approach_data": [
                {"miss_distance": {"kilometers": "912345.5"}}
            ]
        }
    ]);
    feed
}

#[tokio::test]
async fn highlights_all_sources_present_on_success() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apod_body().to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/perseverance/latest_photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"latest_photos": [mars_photo_body(9, "https://mars.jpl.nasa.gov/e.jpg")]})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/neo/rest/v1/feed")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_neo_today_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/highlights").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    let body = body_json(response).await;
    assert_eq!(body["apod"]["title"], "Pillars of Creation");
    assert_eq!(body["mars"]["id"], 9);
    assert_eq!(body["mars"]["rover"]["name"], "Curiosity");
    assert_eq!(body["neo"]["count"], 2);
    assert_eq!(body["neo"]["hazardous_count"], 1);
    assert_eq!(body["neo"]["closest_approach_km"], "912,346");
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn highlights_single_failure_nulls_only_that_slot() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(apod_body().to_string())
        .create_async()
        .await;
    // Both rovers down: the mars slot must fail alone.
    for rover in ["perseverance", "curiosity"] {
        server
            .mock(
                "GET",
                format!("/mars-photos/api/v1/rovers/{rover}/latest_photos").as_str(),
            )
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
    }
    server
        .mock("GET", "/neo/rest/v1/feed")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_neo_today_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let response = get(app, "/api/highlights").await;

    // The aggregate itself never fails.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["apod"].is_object());
    assert!(body["mars"].is_null());
    assert!(body["neo"].is_object());
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], "Failed to fetch Mars rover data");
}

#[tokio::test]
async fn highlights_video_apod_prefers_thumbnail_url() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/planetary/apod")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "title": "Comet in Motion",
                "url": "https://www.youtube.com/embed/xyz",
                "explanation": "A timelapse.",
                "date": "2024-01-02",
                "media_type": "video",
                "thumbnail_url": "https://img.youtube.com/vi/xyz/0.jpg"
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/mars-photos/api/v1/rovers/perseverance/latest_photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"latest_photos": [mars_photo_body(1, "https://mars.jpl.nasa.gov/f.jpg")]})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/neo/rest/v1/feed")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_neo_today_body().to_string())
        .create_async()
        .await;

    let app = build_test_app(&server.url());
    let body = body_json(get(app, "/api/highlights").await).await;

    assert_eq!(body["apod"]["media_type"], "video");
    assert_eq!(body["apod"]["url"], "https://img.youtube.com/vi/xyz/0.jpg");
}

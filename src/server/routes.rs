//! HTTP API routes
//!
//! A thin declarative layer over [`RouteBuilder`]: each tour id owns one
//! builder session rendered onto a [`HeadlessMap`], and every mutating call
//! answers with the session snapshot a web client redraws from.

use crate::builder::{BuilderSettings, BuilderState, RouteBuilder};
use crate::coord::Coordinates;
use crate::directions::DirectionsBackend;
use crate::error::Error;
use crate::format::{available_formats, get_formatter, FormatInfo, RoutePlan};
use crate::geo::{AddressInfo, GeocodeBackend, GeocodeClient, SearchResult};
use crate::map::headless::MapSnapshot;
use crate::map::HeadlessMap;
use crate::server::state::{AppState, PublishedStops, Session, SessionBuilder};
use crate::stop::{Stop, StopId};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{debug, info};

/// Create the API router
pub fn create_router<G, D>(state: Arc<AppState<G, D>>) -> Router
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    // Static web client: ./static, else next to the executable
    let static_path = if std::path::Path::new("static").exists() {
        "static".to_string()
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
            .filter(|path| path.exists())
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_else(|| "static".to_string())
    };

    Router::new()
        .route(
            "/api/tours/:tour_id/builder",
            post(mount_handler::<G, D>)
                .get(snapshot_handler::<G, D>)
                .delete(unmount_handler::<G, D>),
        )
        .route("/api/tours/:tour_id/builder/click", post(click_handler::<G, D>))
        .route(
            "/api/tours/:tour_id/builder/markers/:stop_id",
            post(marker_handler::<G, D>),
        )
        .route(
            "/api/tours/:tour_id/builder/panel",
            put(panel_save_handler::<G, D>).delete(panel_delete_handler::<G, D>),
        )
        .route(
            "/api/tours/:tour_id/builder/reorder",
            post(reorder_handler::<G, D>),
        )
        .route("/api/search", get(search_handler::<G, D>))
        .route("/api/geocode/reverse", post(reverse_geocode_handler::<G, D>))
        .route("/api/route", post(route_handler::<G, D>))
        .route("/api/formats", get(formats_handler))
        .route("/api/status", get(status_handler::<G, D>))
        .fallback_service(ServeDir::new(&static_path).append_index_html_on_directories(true))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }

    fn unknown_tour(tour_id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "UNKNOWN_TOUR",
            format!("No builder mounted for tour {}", tour_id),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::InvalidStopName(_) => (StatusCode::BAD_REQUEST, "INVALID_STOP_NAME"),
            Error::ReorderMismatch(_) => (StatusCode::BAD_REQUEST, "REORDER_MISMATCH"),
            Error::UnknownStop(_) => (StatusCode::NOT_FOUND, "UNKNOWN_STOP"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Error::TornDown => (StatusCode::INTERNAL_SERVER_ERROR, "TORN_DOWN"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError::new(status, code, err.to_string())
    }
}

/// Everything a client needs to redraw one builder
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub builder: BuilderState,
    #[serde(flatten)]
    pub map: MapSnapshot,
    /// What the tour form has been handed so far
    pub form: PublishedStops,
}

fn snapshot<G, D>(builder: &SessionBuilder<G, D>) -> SessionSnapshot
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    SessionSnapshot {
        builder: builder.state(),
        map: builder.surface().sdk().snapshot(),
        form: builder.form().clone(),
    }
}

async fn find_session<G, D>(
    state: &AppState<G, D>,
    tour_id: &str,
) -> Result<Arc<Session<G, D>>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    state
        .session(tour_id)
        .await
        .ok_or_else(|| ApiError::unknown_tour(tour_id))
}

#[derive(Debug, Deserialize)]
pub struct MountRequest {
    #[serde(default)]
    pub stops: Vec<Stop>,
}

/// Mount a builder for a tour, replacing any existing one
///
/// POST /api/tours/:tour_id/builder
async fn mount_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
    Json(req): Json<MountRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    for stop in &req.stops {
        stop.coordinates().validate()?;
    }

    let settings = BuilderSettings::from_config(&*state.config.read().await);
    let builder = RouteBuilder::mount(
        tour_id.clone(),
        req.stops,
        HeadlessMap::new(),
        Arc::clone(&state.geocoder),
        Arc::clone(&state.directions),
        PublishedStops::default(),
        settings,
    )
    .await?;

    let body = snapshot(&builder);
    state.insert_session(&tour_id, Session::new(builder)).await;
    info!("Builder mounted for tour {}", tour_id);
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/tours/:tour_id/builder
async fn snapshot_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let builder = session.builder.lock().await;
    Ok(Json(snapshot(&builder)))
}

/// DELETE /api/tours/:tour_id/builder
async fn unmount_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    if state.remove_session(&tour_id).await {
        info!("Builder unmounted for tour {}", tour_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::unknown_tour(&tour_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// POST /api/tours/:tour_id/builder/click
async fn click_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
    Json(req): Json<LatLng>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let mut builder = session.builder.lock().await;
    builder
        .on_surface_click(Coordinates::new(req.lat, req.lng))
        .await?;
    Ok(Json(snapshot(&builder)))
}

/// POST /api/tours/:tour_id/builder/markers/:stop_id
async fn marker_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path((tour_id, stop_id)): Path<(String, String)>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let mut builder = session.builder.lock().await;
    builder.on_marker_click(&StopId::new(stop_id))?;
    Ok(Json(snapshot(&builder)))
}

#[derive(Debug, Deserialize)]
pub struct PanelSaveRequest {
    pub name: String,
    /// Left as is when absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Save the panel's stop
///
/// PUT /api/tours/:tour_id/builder/panel
async fn panel_save_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
    Json(req): Json<PanelSaveRequest>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let mut builder = session.builder.lock().await;

    let panel = builder.panel_mut();
    panel.begin_edit();
    panel.set_name(req.name);
    if let Some(description) = req.description {
        panel.set_description(description);
    }
    builder.save_panel().await?;
    Ok(Json(snapshot(&builder)))
}

/// Delete the panel's stop
///
/// DELETE /api/tours/:tour_id/builder/panel
async fn panel_delete_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let mut builder = session.builder.lock().await;
    builder.delete_selected().await?;
    Ok(Json(snapshot(&builder)))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<StopId>,
}

/// POST /api/tours/:tour_id/builder/reorder
async fn reorder_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Path(tour_id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<SessionSnapshot>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let session = find_session(&state, &tour_id).await?;
    let mut builder = session.builder.lock().await;
    builder.reorder_ids(&req.order).await?;
    Ok(Json(snapshot(&builder)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponseBody {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Forward place search
///
/// GET /api/search?q=
async fn search_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponseBody>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Ok(Json(SearchResponseBody {
            query,
            results: Vec::new(),
        }));
    }

    let limit = state.config.read().await.search.limit;
    let results = state.geocoder.search(&query, limit).await?;
    debug!("Search {:?} returned {} results", query, results.len());
    Ok(Json(SearchResponseBody { query, results }))
}

/// Reverse geocode; falls back to a coordinate label, never fails upstream
///
/// POST /api/geocode/reverse
async fn reverse_geocode_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Json(req): Json<LatLng>,
) -> Result<Json<AddressInfo>, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let coords = Coordinates::new(req.lat, req.lng);
    coords.validate()?;
    let client = GeocodeClient::new(Arc::clone(&state.geocoder));
    Ok(Json(client.address_for(coords).await))
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub tour_id: Option<String>,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub format: Option<String>,
}

/// Stateless route derivation, optionally rendered in an export format
///
/// POST /api/route[?format=gpx]
async fn route_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Query(params): Query<RouteParams>,
    Json(req): Json<RouteRequest>,
) -> Result<Response, ApiError>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    for stop in &req.stops {
        stop.coordinates().validate()?;
    }

    let plan = RoutePlan::derive(
        req.tour_id.unwrap_or_default(),
        req.stops,
        state.directions.as_ref(),
    )
    .await;

    match params.format.as_deref() {
        None | Some("json") => Ok(Json(plan).into_response()),
        Some(name) => {
            let formatter = get_formatter(name).ok_or_else(|| {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "UNKNOWN_FORMAT",
                    format!("Unknown format: {}", name),
                )
            })?;
            let body = formatter.format(&plan)?;
            let content_type = match formatter.name() {
                "gpx" => "application/gpx+xml",
                "geojson" => "application/geo+json",
                _ => "text/plain; charset=utf-8",
            };
            Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Directions profile in use
    pub profile: String,
    pub sessions: usize,
    pub uptime_secs: u64,
}

/// GET /api/status
async fn status_handler<G, D>(State(state): State<Arc<AppState<G, D>>>) -> Json<StatusResponse>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend + 'static,
{
    let profile = state.config.read().await.directions.profile.clone();
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        profile,
        sessions: state.session_count().await,
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::directions::test_support::{Answer, StubDirections};
    use crate::geo::test_support::StubGeocoder;
    use crate::stop::test_support::stop;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_app(geocoder: StubGeocoder) -> Router {
        let state = Arc::new(AppState::new(
            Config::default(),
            geocoder,
            StubDirections::new(Answer::Detour),
        ));
        create_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn mounted_app() -> Router {
        let app = create_test_app(StubGeocoder::with_address("Lighthouse St, Galle"));
        let stops = vec![
            stop("A", 1, 6.0, 80.0),
            stop("B", 2, 6.1, 80.1),
            stop("C", 3, 6.2, 80.2),
        ];
        let (status, _) = send(
            &app,
            "POST",
            "/api/tours/t1/builder",
            Some(json!({ "stops": stops })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        app
    }

    fn stop_ids(snapshot: &Value) -> Vec<String> {
        snapshot["stops"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_test_app(StubGeocoder::default());
        let (status, body) = send(&app, "GET", "/api/status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["running"], true);
        assert_eq!(body["profile"], "walking");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_mount_and_snapshot() {
        let app = mounted_app().await;
        let (status, body) = send(&app, "GET", "/api/tours/t1/builder", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tour_id"], "t1");
        assert_eq!(body["markers"].as_array().unwrap().len(), 3);
        assert_eq!(body["layers"].as_array().unwrap().len(), 1);
        assert_eq!(body["route"]["state"], "routed");
        assert_eq!(body["panel"]["mode"], "closed");
        assert_eq!(body["form"]["revision"], 0);
    }

    #[tokio::test]
    async fn test_click_adds_stop_and_opens_editor() {
        let app = mounted_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/tours/t1/builder/click",
            Some(json!({"lat": 6.0535, "lng": 80.2210})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stops"].as_array().unwrap().len(), 4);
        assert_eq!(body["stops"][3]["location"]["address"], "Lighthouse St, Galle");
        assert_eq!(body["stops"][3]["name"], "Stop 4");
        assert_eq!(body["selected"], body["stops"][3]["id"]);
        assert_eq!(body["panel"]["mode"], "editing");
        assert_eq!(body["camera"]["zoom"], 15.0);
        assert_eq!(body["form"]["revision"], 1);
    }

    #[tokio::test]
    async fn test_click_rejects_invalid_coordinates() {
        let app = mounted_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/tours/t1/builder/click",
            Some(json!({"lat": 95.0, "lng": 80.0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_panel_save_validates_name() {
        let app = mounted_app().await;
        send(&app, "POST", "/api/tours/t1/builder/markers/B", None).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/tours/t1/builder/panel",
            Some(json!({"name": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_STOP_NAME");

        let (status, body) = send(
            &app,
            "PUT",
            "/api/tours/t1/builder/panel",
            Some(json!({"name": "Dutch Church", "description": "1755"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stops"][1]["name"], "Dutch Church");
        assert_eq!(body["stops"][1]["description"], "1755");
        assert_eq!(body["panel"]["mode"], "viewing");
    }

    #[tokio::test]
    async fn test_panel_delete_renumbers() {
        let app = mounted_app().await;
        send(&app, "POST", "/api/tours/t1/builder/markers/A", None).await;
        let (status, body) = send(&app, "DELETE", "/api/tours/t1/builder/panel", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(stop_ids(&body), vec!["B", "C"]);
        assert_eq!(body["stops"][0]["sequenceNo"], 1);
        assert_eq!(body["selected"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_marker() {
        let app = mounted_app().await;
        let (status, body) = send(&app, "POST", "/api/tours/t1/builder/markers/Z", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "UNKNOWN_STOP");
    }

    #[tokio::test]
    async fn test_reorder() {
        let app = mounted_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/tours/t1/builder/reorder",
            Some(json!({"order": ["C", "A"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "REORDER_MISMATCH");

        let (status, body) = send(
            &app,
            "POST",
            "/api/tours/t1/builder/reorder",
            Some(json!({"order": ["C", "A", "B"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stop_ids(&body), vec!["C", "A", "B"]);
        assert_eq!(body["stops"][0]["sequenceNo"], 1);
    }

    #[tokio::test]
    async fn test_unmount() {
        let app = mounted_app().await;
        let (status, _) = send(&app, "DELETE", "/api/tours/t1/builder", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/api/tours/t1/builder", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "UNKNOWN_TOUR");

        let (status, _) = send(&app, "DELETE", "/api/tours/t1/builder", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let app = create_test_app(StubGeocoder::with_results(&["Galle", "Galle Face"]));

        let (status, body) = send(&app, "GET", "/api/search?q=galle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
        assert_eq!(body["results"][0]["label"], "Galle");

        let (_, body) = send(&app, "GET", "/api/search?q=", None).await;
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reverse_geocode_falls_back() {
        let app = create_test_app(StubGeocoder::failing());
        let (status, body) = send(
            &app,
            "POST",
            "/api/geocode/reverse",
            Some(json!({"lat": 6.0535, "lng": 80.221})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "Location at 6.053500, 80.221000");
    }

    #[tokio::test]
    async fn test_route_endpoint() {
        let app = create_test_app(StubGeocoder::default());
        let stops = vec![stop("b", 2, 6.1, 80.1), stop("a", 1, 6.0, 80.0)];

        let (status, body) = send(
            &app,
            "POST",
            "/api/route",
            Some(json!({"tour_id": "t9", "stops": stops})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tour_id"], "t9");
        assert_eq!(body["stops"][0]["id"], "a");
        assert_eq!(body["route"]["state"], "routed");
    }

    #[tokio::test]
    async fn test_route_endpoint_formats() {
        let app = create_test_app(StubGeocoder::default());
        let stops = vec![stop("a", 1, 6.0, 80.0), stop("b", 2, 6.1, 80.1)];

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/route?format=gpx")
                    .header("Content-Type", "application/json")
                    .body(Body::from(json!({ "stops": stops }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/gpx+xml"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("<trkseg>"));

        let (status, body) = send(
            &app,
            "POST",
            "/api/route?format=kml",
            Some(json!({ "stops": stops })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_FORMAT");
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let app = create_test_app(StubGeocoder::default());
        let (status, body) = send(&app, "GET", "/api/formats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formats"].as_array().unwrap().len(), 4);
    }
}

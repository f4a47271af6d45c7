// Dashboard handlers - robot override and map, chart controls, readings and activity
use crate::application::chart_updater::ChartConfig;
use crate::application::dashboard_session::Direction;
use crate::application::position_engine::PositionEngine;
use crate::domain::robot::{parse_trail_limit, Facing, Pose, TrailPoint};
use crate::domain::sensor::{SensorDisplay, TemperatureUnit, Timescale};
use crate::infrastructure::activity_log::ActivityEntry;
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::{AppState, LiveSession};
use crate::presentation::handlers::parse_timescale;
use crate::presentation::refresh::refresh_once;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotView {
    pub pose: Pose,
    pub facing: Facing,
    pub trail: Vec<TrailPoint>,
    pub trail_limit: usize,
    pub readout: String,
    pub override_enabled: bool,
    pub last_override: Option<Direction>,
}

impl RobotView {
    fn of(session: &LiveSession) -> Self {
        let engine = session.engine();
        let pose = engine.pose();
        Self {
            pose,
            facing: pose.facing(),
            trail: engine.trail().to_vec(),
            trail_limit: engine.trail().limit(),
            readout: engine.readout(),
            override_enabled: session.override_enabled(),
            last_override: session.last_override(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub config: ChartConfig,
    pub revision: u64,
    pub visibility_order: Vec<usize>,
    pub temperature_unit: TemperatureUnit,
    pub timescale: Timescale,
}

impl ChartView {
    fn of(session: &LiveSession) -> Option<Self> {
        let chart = session.chart();
        let snapshot = chart.renderer()?;
        Some(Self {
            config: snapshot.config.clone(),
            revision: snapshot.revision,
            visibility_order: chart.visibility_order().to_vec(),
            temperature_unit: chart.unit(),
            timescale: session.timescale(),
        })
    }
}

fn chart_view(session: &LiveSession) -> Result<Json<ChartView>, ApiError> {
    ChartView::of(session)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No chart attached".to_string()))
}

/// Either an explicit direction or a keyboard key name.
#[derive(Debug, Default, Deserialize)]
pub struct OverrideRequest {
    pub direction: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct TrailLimitRequest {
    pub limit: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct UnitRequest {
    pub unit: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub pixel_density: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    pub timescale: Option<String>,
}

pub async fn get_robot(State(state): State<Arc<AppState>>) -> Json<RobotView> {
    let session = state.session.lock().await;
    Json(RobotView::of(&session))
}

/// Applies one override step. Answers 409 while override is disabled.
pub async fn post_override(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OverrideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let direction = match (&request.direction, &request.key) {
        (Some(name), _) => name.parse::<Direction>().ok(),
        (None, Some(key)) => Direction::from_key(key),
        (None, None) => None,
    }
    .ok_or_else(|| ApiError::BadRequest("Unknown direction".to_string()))?;

    let mut session = state.session.lock().await;
    let status = if session.send_override(direction) {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(RobotView::of(&session))))
}

pub async fn put_override_enabled(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnabledRequest>,
) -> Json<RobotView> {
    let mut session = state.session.lock().await;
    session.set_override_enabled(request.enabled);
    Json(RobotView::of(&session))
}

pub async fn post_reset(State(state): State<Arc<AppState>>) -> Json<RobotView> {
    let mut session = state.session.lock().await;
    session.engine_mut().reset();
    Json(RobotView::of(&session))
}

/// Accepts a number or numeric string; anything unparsable keeps the current limit.
pub async fn put_trail_limit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrailLimitRequest>,
) -> Json<RobotView> {
    let mut session = state.session.lock().await;
    let current = session.engine().trail().limit();
    let raw = match &request.limit {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let limit = parse_trail_limit(&raw, current);
    session
        .engine_mut()
        .set_trail_limit(i64::try_from(limit).unwrap_or(i64::MAX));
    Json(RobotView::of(&session))
}

/// Current map frame as SVG, re-rendered first when a new size is requested.
pub async fn get_map_svg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut session = state.session.lock().await;
    let engine = session.engine_mut();
    if query.width.is_some() || query.height.is_some() || query.pixel_density.is_some() {
        engine.update_surface(|surface| {
            let size = surface.css_size();
            surface.resize(
                query.width.unwrap_or(size.0),
                query.height.unwrap_or(size.1),
                query.pixel_density.unwrap_or(size.2),
            );
        });
    }
    let document = engine
        .surface()
        .map(|surface| surface.document())
        .ok_or_else(|| ApiError::NotFound("No map surface attached".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], document))
}

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Result<Json<ChartView>, ApiError> {
    let session = state.session.lock().await;
    chart_view(&session)
}

pub async fn put_series_visibility(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<ChartView>, ApiError> {
    let mut session = state.session.lock().await;
    if !session.toggle_series(index, request.visible) {
        return Err(ApiError::NotFound(format!("No chart series at index {}", index)));
    }
    chart_view(&session)
}

pub async fn put_temperature_unit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UnitRequest>,
) -> Result<Json<ChartView>, ApiError> {
    let unit = TemperatureUnit::from_code(&request.unit)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown unit '{}'", request.unit)))?;
    let mut session = state.session.lock().await;
    session.set_temperature_unit(unit);
    chart_view(&session)
}

/// Refreshes now, optionally switching the history window first.
pub async fn post_chart_refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ChartView>, ApiError> {
    let timescale = match query.timescale.as_deref() {
        Some(raw) => Some(parse_timescale(Some(raw), Timescale::Hour)?),
        None => None,
    };
    refresh_once(&state, timescale).await;
    let session = state.session.lock().await;
    chart_view(&session)
}

pub async fn get_readings(State(state): State<Arc<AppState>>) -> Json<SensorDisplay> {
    let session = state.session.lock().await;
    Json(session.display())
}

pub async fn get_activity(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityEntry>> {
    Json(state.activity.entries())
}

pub async fn clear_activity(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityEntry>> {
    state.activity.clear();
    Json(state.activity.entries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app_state;

    fn key(name: &str) -> Json<OverrideRequest> {
        Json(OverrideRequest {
            direction: None,
            key: Some(name.to_string()),
        })
    }

    #[tokio::test]
    async fn test_override_requires_enable() {
        let state = app_state();
        let response = post_override(State(state.clone()), key("ArrowUp"))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        put_override_enabled(State(state.clone()), Json(EnabledRequest { enabled: true })).await;
        let response = post_override(State(state.clone()), key("ArrowUp"))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let Json(robot) = get_robot(State(state)).await;
        assert_eq!(robot.pose.y, 1.0);
        assert_eq!(robot.last_override, Some(Direction::Up));
        assert_eq!(robot.trail.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected() {
        let state = app_state();
        let err = post_override(State(state), key("Space")).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trail_limit_parsing() {
        let state = app_state();
        let Json(robot) = put_trail_limit(
            State(state.clone()),
            Json(TrailLimitRequest {
                limit: serde_json::json!("3"),
            }),
        )
        .await;
        assert_eq!(robot.trail_limit, 3);

        let Json(robot) = put_trail_limit(
            State(state.clone()),
            Json(TrailLimitRequest {
                limit: serde_json::json!("abc"),
            }),
        )
        .await;
        assert_eq!(robot.trail_limit, 3);

        let Json(robot) = put_trail_limit(
            State(state),
            Json(TrailLimitRequest {
                limit: serde_json::json!(-5),
            }),
        )
        .await;
        assert_eq!(robot.trail_limit, 1);
    }

    #[tokio::test]
    async fn test_map_svg_resizes() {
        let state = app_state();
        let query = MapQuery {
            width: Some(500.0),
            height: Some(300.0),
            pixel_density: None,
        };
        let response = get_map_svg(State(state.clone()), Query(query))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let session = state.session.lock().await;
        let surface = session.engine().surface().unwrap();
        assert_eq!(surface.css_size(), (500.0, 300.0, 1.0));
    }

    #[tokio::test]
    async fn test_series_toggle_and_unit() {
        let state = app_state();
        let Json(chart) = put_series_visibility(
            State(state.clone()),
            Path(0),
            Json(VisibilityRequest { visible: false }),
        )
        .await
        .unwrap();
        assert_eq!(chart.visibility_order, vec![1]);
        assert!(chart.config.series[0].hidden);

        let err = put_series_visibility(
            State(state.clone()),
            Path(9),
            Json(VisibilityRequest { visible: true }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let Json(chart) = put_temperature_unit(
            State(state.clone()),
            Json(UnitRequest {
                unit: "F".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(chart.temperature_unit, TemperatureUnit::Fahrenheit);

        let bad = put_temperature_unit(
            State(state),
            Json(UnitRequest {
                unit: "K".to_string(),
            }),
        )
        .await;
        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn test_refresh_fills_chart_and_readings() {
        let state = app_state();
        let Json(chart) = post_chart_refresh(
            State(state.clone()),
            Query(RefreshQuery {
                timescale: Some("1d".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(chart.timescale, Timescale::Day);
        assert!(!chart.config.series[0].points.is_empty());

        let Json(display) = get_readings(State(state.clone())).await;
        assert_ne!(display.moisture, "--");

        let Json(entries) = get_activity(State(state.clone())).await;
        assert!(entries.iter().any(|e| e.text == "Synced data for Last day"));

        let Json(entries) = clear_activity(State(state)).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Log cleared");
    }
}

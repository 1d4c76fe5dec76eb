//! Relative Rotation Graph API Routes
//!
//! Every rotation request recomputes the full rotation; trail slicing happens
//! here, after the computation. Insights are asked for the series the client
//! already holds, so the commentary matches what is on screen.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rrg_core::{
    MarketInsight, Period, Quadrant, Sector, TickerSeries, DEFAULT_TRAIL_LENGTH, MAX_TRAIL_LENGTH,
    MIN_TRAIL_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct RrgQuery {
    pub period: Option<String>,
    /// Kept as text so a malformed value gets the JSON error envelope
    pub trail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RotationResponse {
    pub period: Period,
    pub benchmark: String,
    pub generated_at: DateTime<Utc>,
    pub trail_length: usize,
    pub sectors: Vec<TickerSeries>,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub sectors: Vec<TickerSeries>,
}

#[derive(Debug, Serialize)]
pub struct QuadrantLegend {
    pub quadrant: Quadrant,
    pub color: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UniverseResponse {
    pub benchmark: String,
    pub sectors: Vec<Sector>,
    pub periods: Vec<Period>,
    pub quadrants: Vec<QuadrantLegend>,
    pub default_period: Period,
    pub default_trail_length: usize,
}

pub fn rrg_routes() -> Router<AppState> {
    Router::new()
        .route("/api/rrg", get(get_rotation))
        .route("/api/rrg/insights", post(post_insights))
        .route("/api/sectors", get(get_sectors))
}

fn parse_period(raw: Option<&str>) -> Result<Period, AppError> {
    match raw {
        None | Some("") => Ok(Period::default()),
        Some(s) => s.parse().map_err(|_| {
            AppError::BadRequest(format!(
                "Unknown period '{}'. Expected one of: {}",
                s,
                Period::all().iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
            ))
        }),
    }
}

/// Trail length from the query, clamped to the displayable range
fn parse_trail(raw: Option<&str>) -> Result<usize, AppError> {
    let trail = match raw {
        None | Some("") => DEFAULT_TRAIL_LENGTH,
        Some(s) => s.trim().parse::<usize>().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid trail '{}'. Expected a whole number between {} and {}",
                s, MIN_TRAIL_LENGTH, MAX_TRAIL_LENGTH
            ))
        })?,
    };

    Ok(trail.clamp(MIN_TRAIL_LENGTH, MAX_TRAIL_LENGTH))
}

/// Rotation trajectories for every sector, history cut to the trail length
async fn get_rotation(
    State(state): State<AppState>,
    Query(query): Query<RrgQuery>,
) -> Result<Json<ApiResponse<RotationResponse>>, AppError> {
    let period = parse_period(query.period.as_deref())?;
    let trail_length = parse_trail(query.trail.as_deref())?;

    let snapshot = state.orchestrator.compute(period).await?;

    Ok(Json(ApiResponse::success(RotationResponse {
        period: snapshot.period,
        benchmark: snapshot.benchmark,
        generated_at: snapshot.generated_at,
        trail_length,
        sectors: snapshot
            .sectors
            .iter()
            .map(|s| s.with_trail(trail_length))
            .collect(),
    })))
}

/// Strategist commentary on the posted series; `data` is null when no
/// summarizer is available
async fn post_insights(
    State(state): State<AppState>,
    body: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Option<MarketInsight>>>, AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if request.sectors.is_empty() {
        return Err(AppError::BadRequest("No sectors to summarize".to_string()));
    }

    let insight = state.summarizer.summarize(&request.sectors).await;
    if insight.is_none() {
        tracing::debug!("No market insight available for {} sectors", request.sectors.len());
    }

    Ok(Json(ApiResponse::success(insight)))
}

async fn get_sectors(State(state): State<AppState>) -> Json<ApiResponse<UniverseResponse>> {
    Json(ApiResponse::success(UniverseResponse {
        benchmark: state.orchestrator.benchmark().to_string(),
        sectors: state.orchestrator.sectors().to_vec(),
        periods: Period::all(),
        quadrants: Quadrant::all()
            .into_iter()
            .map(|quadrant| QuadrantLegend {
                quadrant,
                color: quadrant.color(),
                description: quadrant.description(),
            })
            .collect(),
        default_period: Period::default(),
        default_trail_length: DEFAULT_TRAIL_LENGTH,
    }))
}

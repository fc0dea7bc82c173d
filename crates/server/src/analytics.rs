//! Read-only analytics endpoints.
//!
//! - `GET /api/revenue`             — revenue by channel/room_type/country/date
//! - `GET /api/occupancy`           — occupancy by day/week/month
//! - `GET /api/marketing`           — marketing performance by channel/date
//! - `GET /api/guests`              — guest demographics (lifetime metrics)
//! - `GET /api/weather-correlation` — ski spend vs. weather by date
//!
//! All endpoints accept optional `start_date`/`end_date` (ISO dates,
//! defaulting to the demo season). Validation failures return 400 before any
//! fact store access; fact store failures return a generic 503 with detail
//! kept in logs.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use snowline_core::analytics::marketing::MarketingRows;
use snowline_core::analytics::occupancy::OccupancyRows;
use snowline_core::analytics::{guest, marketing, occupancy, revenue, weather};
use snowline_core::{
    resolve, ApplicationError, DateRange, Domain, Envelope, Grouping, InterfaceError, QueryError,
    RevenueDimension,
};
use snowline_db::{
    ChargeFacts, DbPool, FactStoreError, GuestFacts, MarketingFacts, OccupancyFacts,
    SqlChargeFacts, SqlGuestFacts, SqlMarketingFacts, SqlOccupancyFacts,
};

#[derive(Clone)]
pub struct AnalyticsState {
    db_pool: DbPool,
}

#[derive(Debug, Deserialize, Default)]
pub struct DimensionQuery {
    pub dimension: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GroupByQuery {
    pub group_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/api/revenue", get(revenue_report))
        .route("/api/occupancy", get(occupancy_report))
        .route("/api/marketing", get(marketing_report))
        .route("/api/guests", get(guest_report))
        .route("/api/weather-correlation", get(weather_correlation_report))
        .with_state(AnalyticsState { db_pool })
}

/// Map an application-layer failure onto the HTTP boundary. Validation
/// errors echo their specific message; anything else stays generic.
fn reject(error: ApplicationError) -> HandlerError {
    let status = match &error {
        ApplicationError::Query(_) => StatusCode::BAD_REQUEST,
        ApplicationError::FactStore(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(ErrorBody { error: InterfaceError::from(error).user_message() }))
}

fn bad_request(error: QueryError) -> HandlerError {
    reject(ApplicationError::from(error))
}

fn store_failure(domain: Domain, error: FactStoreError) -> HandlerError {
    error!(
        event_name = "analytics.fact_store_failure",
        domain = domain.as_str(),
        error = %error,
        "fact store query failed"
    );
    reject(ApplicationError::FactStore(error.to_string()))
}

fn internal(domain: Domain) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: format!("failed to compute {} analytics", domain.as_str()) }),
    )
}

async fn revenue_report(
    State(state): State<AnalyticsState>,
    Query(query): Query<DimensionQuery>,
) -> Result<Response, HandlerError> {
    let dimension = query.dimension.as_deref().unwrap_or("channel");
    let spec = resolve(Domain::Revenue, dimension).map_err(bad_request)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(bad_request)?;
    let Grouping::Revenue(kind) = spec.grouping else {
        return Err(internal(Domain::Revenue));
    };

    let facts = SqlChargeFacts::new(state.db_pool.clone());
    // booking-level dimensions scope by check-in date, the per-day view by
    // charge date
    let records = match kind {
        RevenueDimension::Date => facts.stayed_by_charge_date(&range).await,
        _ => facts.stayed_by_check_in(&range).await,
    }
    .map_err(|e| store_failure(Domain::Revenue, e))?;

    let rows = revenue::aggregate(kind, &spec, &records);
    Ok(Json(Envelope::dimension(spec.dimension_key(), &range, rows)).into_response())
}

async fn occupancy_report(
    State(state): State<AnalyticsState>,
    Query(query): Query<GroupByQuery>,
) -> Result<Response, HandlerError> {
    let group_by = query.group_by.as_deref().unwrap_or("day");
    let spec = resolve(Domain::Occupancy, group_by).map_err(bad_request)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(bad_request)?;
    let Grouping::Occupancy(granularity) = spec.grouping else {
        return Err(internal(Domain::Occupancy));
    };

    let facts = SqlOccupancyFacts::new(state.db_pool.clone());
    let records =
        facts.property_daily(&range).await.map_err(|e| store_failure(Domain::Occupancy, e))?;

    let response = match occupancy::aggregate(granularity, &records) {
        OccupancyRows::Day(rows) => {
            Json(Envelope::grouped(spec.dimension_key(), &range, rows)).into_response()
        }
        OccupancyRows::Bucketed(rows) => {
            Json(Envelope::grouped(spec.dimension_key(), &range, rows)).into_response()
        }
    };
    Ok(response)
}

async fn marketing_report(
    State(state): State<AnalyticsState>,
    Query(query): Query<GroupByQuery>,
) -> Result<Response, HandlerError> {
    let group_by = query.group_by.as_deref().unwrap_or("channel");
    let spec = resolve(Domain::Marketing, group_by).map_err(bad_request)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(bad_request)?;
    let Grouping::Marketing(grouping) = spec.grouping else {
        return Err(internal(Domain::Marketing));
    };

    let facts = SqlMarketingFacts::new(state.db_pool.clone());
    let records = facts.in_range(&range).await.map_err(|e| store_failure(Domain::Marketing, e))?;

    let response = match marketing::aggregate(grouping, &spec, &records) {
        MarketingRows::Channel(rows) => {
            Json(Envelope::grouped(spec.dimension_key(), &range, rows)).into_response()
        }
        MarketingRows::Date(rows) => {
            Json(Envelope::grouped(spec.dimension_key(), &range, rows)).into_response()
        }
    };
    Ok(response)
}

async fn guest_report(
    State(state): State<AnalyticsState>,
    Query(query): Query<DimensionQuery>,
) -> Result<Response, HandlerError> {
    let dimension = query.dimension.as_deref().unwrap_or("country");
    let spec = resolve(Domain::Guest, dimension).map_err(bad_request)?;
    let Grouping::Guest(kind) = spec.grouping else {
        return Err(internal(Domain::Guest));
    };

    let facts = SqlGuestFacts::new(state.db_pool.clone());
    let records = facts.all_profiles().await.map_err(|e| store_failure(Domain::Guest, e))?;

    let rows = guest::aggregate(kind, &spec, &records);
    // lifetime metrics: any supplied date range is not applicable
    Ok(Json(Envelope::lifetime(spec.dimension_key(), rows)).into_response())
}

async fn weather_correlation_report(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, HandlerError> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(bad_request)?;

    let occupancy_facts = SqlOccupancyFacts::new(state.db_pool.clone());
    let charge_facts = SqlChargeFacts::new(state.db_pool.clone());

    let occupancy = occupancy_facts
        .property_daily(&range)
        .await
        .map_err(|e| store_failure(Domain::Occupancy, e))?;
    let charges = charge_facts
        .stayed_by_charge_date(&range)
        .await
        .map_err(|e| store_failure(Domain::Revenue, e))?;

    let rows = weather::correlate(&occupancy, &charges);
    Ok(Json(Envelope::range_only(&range, rows)).into_response())
}

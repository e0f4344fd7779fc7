use crate::infra::{deserialize_optional_date, AppState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use staybook::error::AppError;
use staybook::marketplace::{
    daily_profit, host_listing_ids, host_statistics, load_host_bookings, load_published_catalog,
    reconcile, search_catalog, AuthToken, Booking, BookingId, HostStatistics, Listing, ListingId,
    NotificationEvent, ProfitPoint, ProfitSeries, SearchFilters, SortKey, UserId,
};

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/catalog/search", post(catalog_search_endpoint))
        .route("/api/v1/host/profit", post(host_profit_endpoint))
        .route("/api/v1/host/profit/export", post(host_profit_export_endpoint))
        .route("/api/v1/host/statistics", post(host_statistics_endpoint))
        .route("/api/v1/notifications/poll", post(notifications_poll_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CatalogSearchRequest {
    #[serde(default)]
    pub(crate) filters: SearchFilters,
    #[serde(default)]
    pub(crate) sort: SortKey,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogSearchResponse {
    pub(crate) total: usize,
    pub(crate) listings: Vec<Listing>,
}

pub(crate) async fn catalog_search_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<CatalogSearchRequest>,
) -> Result<Json<CatalogSearchResponse>, AppError> {
    let catalog = load_published_catalog(state.marketplace.as_ref()).await?;
    let listings = search_catalog(catalog, &payload.filters, payload.sort);

    Ok(Json(CatalogSearchResponse {
        total: listings.len(),
        listings,
    }))
}

fn default_window_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HostProfitRequest {
    pub(crate) token: String,
    pub(crate) host: String,
    #[serde(default = "default_window_days")]
    pub(crate) window_days: u32,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HostProfitResponse {
    pub(crate) window_days: u32,
    pub(crate) reference_date: NaiveDate,
    pub(crate) total: String,
    pub(crate) points: Vec<ProfitPoint>,
}

async fn host_profit_series(
    state: &AppState,
    payload: HostProfitRequest,
) -> Result<(u32, NaiveDate, ProfitSeries), AppError> {
    let token = AuthToken(payload.token);
    let host = UserId(payload.host);
    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());

    let joined = load_host_bookings(state.marketplace.as_ref(), &token, &host).await?;
    let bookings: Vec<Booking> = joined.into_iter().map(|entry| entry.booking).collect();

    Ok((
        payload.window_days,
        today,
        daily_profit(&bookings, payload.window_days, today),
    ))
}

pub(crate) async fn host_profit_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<HostProfitRequest>,
) -> Result<Json<HostProfitResponse>, AppError> {
    let (window_days, reference_date, series) = host_profit_series(&state, payload).await?;

    Ok(Json(HostProfitResponse {
        window_days,
        reference_date,
        total: series.formatted_total(),
        points: series.points,
    }))
}

pub(crate) async fn host_profit_export_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<HostProfitRequest>,
) -> Result<Response, AppError> {
    let (_, _, series) = host_profit_series(&state, payload).await?;
    let csv = series.to_csv()?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HostStatisticsRequest {
    pub(crate) token: String,
    pub(crate) host: String,
    #[serde(default)]
    pub(crate) current_year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HostStatisticsResponse {
    pub(crate) current_year: i32,
    pub(crate) today: NaiveDate,
    pub(crate) statistics: HostStatistics,
}

pub(crate) async fn host_statistics_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<HostStatisticsRequest>,
) -> Result<Json<HostStatisticsResponse>, AppError> {
    let token = AuthToken(payload.token);
    let host = UserId(payload.host);
    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());
    let current_year = payload.current_year.unwrap_or_else(|| today.year());

    let joined = load_host_bookings(state.marketplace.as_ref(), &token, &host).await?;
    let statistics = host_statistics(&joined, current_year, today);

    Ok(Json(HostStatisticsResponse {
        current_year,
        today,
        statistics,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationPollRequest {
    pub(crate) token: String,
    pub(crate) identity: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotificationView {
    pub(crate) key: String,
    pub(crate) kind: &'static str,
    pub(crate) message: &'static str,
    pub(crate) booking_id: BookingId,
    pub(crate) listing_id: ListingId,
}

impl NotificationView {
    fn from_event(event: &NotificationEvent) -> Self {
        Self {
            key: event.key(),
            kind: event.kind.label(),
            message: event.message(),
            booking_id: event.booking_id.clone(),
            listing_id: event.listing_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationPollResponse {
    pub(crate) events: Vec<NotificationView>,
}

/// One poll cycle for `identity`. The snapshot-map lock is taken before the
/// upstream fetch and released after the commit, so cycles for the same
/// identity never interleave; a failed fetch returns before the commit and
/// leaves the previous snapshot in place.
pub(crate) async fn notifications_poll_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<NotificationPollRequest>,
) -> Result<Json<NotificationPollResponse>, AppError> {
    let token = AuthToken(payload.token);
    let identity = UserId(payload.identity);

    let mut snapshots = state.snapshots.lock().await;

    let bookings = state.marketplace.fetch_all_bookings(&token).await?;
    let listings = state.marketplace.fetch_all_listings().await?;
    let hosted = host_listing_ids(&identity, &listings);

    let previous = snapshots.get(&identity).cloned().unwrap_or_default();
    let outcome = reconcile(&previous, &bookings, &identity, &hosted);
    snapshots.insert(identity, outcome.snapshot);

    let events = outcome
        .events
        .iter()
        .map(NotificationView::from_event)
        .collect();
    Ok(Json(NotificationPollResponse { events }))
}

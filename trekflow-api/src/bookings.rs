use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use trekflow_inventory::{booking_actions_open, Booking, BookingStatus, Tbr};
use trekflow_ledger::{
    finalize_cancellation, preview_cancellation, CancellationProposal, LedgerSummary,
};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub active: Vec<Booking>,
    pub cancelled: Vec<Booking>,
    pub summary: LedgerSummary,
    /// Whether booking-level actions are still open on this record.
    pub actions_open: bool,
}

#[derive(Debug, Deserialize)]
pub struct PreviewCancellationRequest {
    /// Operator-entered refund. Only honoured after departure; the
    /// pre-departure split is fixed by rule.
    pub refund: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCancellationRequest {
    pub refund: Option<f64>,
    pub reason: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/inventory/{id}/ledger", get(get_ledger))
        .route(
            "/v1/inventory/{id}/bookings/{booking_id}/cancellation/preview",
            post(preview_booking_cancellation),
        )
        .route(
            "/v1/inventory/{id}/bookings/{booking_id}/cancellation/confirm",
            post(confirm_booking_cancellation),
        )
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_ledger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LedgerResponse>, AppError> {
    let now = Utc::now();
    let record = find_record(&state, &id)?;

    let summary = LedgerSummary::from_bookings(&record.bookings);
    let actions_open = booking_actions_open(&record, now, state.rules.post_arrival_action_days);

    let (active, cancelled) = record
        .bookings
        .into_iter()
        .partition(|b| b.status == BookingStatus::Active);

    Ok(Json(LedgerResponse {
        active,
        cancelled,
        summary,
        actions_open,
    }))
}

async fn preview_booking_cancellation(
    State(state): State<AppState>,
    Path((id, booking_id)): Path<(String, String)>,
    Json(req): Json<PreviewCancellationRequest>,
) -> Result<Json<CancellationProposal>, AppError> {
    let now = Utc::now();
    let record = find_record(&state, &id)?;
    let booking = find_booking(&record, &booking_id)?;

    if booking.status != BookingStatus::Active {
        return Err(AppError::ConflictError(format!(
            "Booking is not active: {}",
            booking_id
        )));
    }

    let mut proposal =
        preview_cancellation(booking, record.departure_time, record.arrival_time, now);
    if let Some(refund) = req.refund {
        proposal = proposal.with_refund(refund);
    }

    Ok(Json(proposal))
}

async fn confirm_booking_cancellation(
    State(state): State<AppState>,
    Path((id, booking_id)): Path<(String, String)>,
    Json(req): Json<ConfirmCancellationRequest>,
) -> Result<Json<Booking>, AppError> {
    let now = Utc::now();

    if req.reason.trim().is_empty() {
        return Err(AppError::ValidationError(
            "A cancellation reason is required".to_string(),
        ));
    }

    let record = find_record(&state, &id)?;
    let booking = find_booking(&record, &booking_id)?;

    let finalized = finalize_cancellation(
        booking,
        record.departure_time,
        record.arrival_time,
        now,
        req.refund,
        &req.reason,
    )
    .map_err(AppError::from_cancellation)?;

    let committed = state
        .repo
        .record_booking_cancellation(&id, finalized)
        .map_err(AppError::from_core)?;

    info!("Recorded cancellation of booking {} on {}", booking_id, id);
    Ok(Json(committed))
}

// ============================================================================
// Helpers
// ============================================================================

fn find_record(state: &AppState, id: &str) -> Result<Tbr, AppError> {
    state
        .repo
        .find_by_id(id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("Record not found: {}", id)))
}

fn find_booking<'a>(record: &'a Tbr, booking_id: &str) -> Result<&'a Booking, AppError> {
    record
        .bookings
        .iter()
        .find(|b| b.id == booking_id)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", booking_id)))
}

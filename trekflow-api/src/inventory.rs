use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use trekflow_inventory::{
    can_cancel_record, derive_status, is_bookable, pending_request_count, query_inventory,
    CancellationDecision, CancellationPolicy, CancellationRequestStatus, CaptainAssignment,
    CaptainPatch, InventoryFilters, Tbr, TbrPatch, TrekStatus,
};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub tbr_id: Option<String>,
    pub operator_id: Option<String>,
    pub destination: Option<String>,
    pub policy: Option<CancellationPolicy>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub request_status: Option<CancellationRequestStatus>,
    /// Feed window anchor. Defaults to the current time.
    pub anchor: Option<DateTime<Utc>>,
}

/// A record as the dashboard sees it: the stored fields plus the derived
/// lifecycle state, which is never persisted.
#[derive(Debug, Serialize)]
pub struct TbrView {
    #[serde(flatten)]
    pub record: Tbr,
    pub status: TrekStatus,
    pub bookable: bool,
}

impl TbrView {
    fn derive(record: Tbr, now: DateTime<Utc>) -> Self {
        let status = derive_status(&record, now);
        let bookable = is_bookable(&record, now);
        Self {
            record,
            status,
            bookable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingRequestCountResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CancelRecordRequest {
    pub performed_by: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveCancellationRequest {
    pub performed_by: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectCancellationRequest {
    pub performed_by: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignCaptainRequest {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub assigned_by: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/inventory", get(list_inventory))
        .route(
            "/v1/inventory/pending-requests/count",
            get(pending_requests),
        )
        .route("/v1/inventory/{id}", get(get_record).patch(patch_record))
        .route("/v1/inventory/{id}/cancel", post(cancel_record))
        .route(
            "/v1/inventory/{id}/cancellation-request/approve",
            post(approve_cancellation_request),
        )
        .route(
            "/v1/inventory/{id}/cancellation-request/reject",
            post(reject_cancellation_request),
        )
        .route(
            "/v1/inventory/{id}/captain",
            put(assign_captain).delete(unassign_captain),
        )
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<TbrView>>, AppError> {
    let now = Utc::now();
    let anchor = query.anchor.unwrap_or(now);

    let filters = InventoryFilters {
        tbr_id: query.tbr_id,
        operator_id: query.operator_id,
        destination: query.destination,
        policy: query.policy,
        start_date: query.start_date,
        end_date: query.end_date,
        request_status: query.request_status,
    };

    let records = state.repo.get_all().map_err(AppError::from_core)?;
    let rows = query_inventory(&records, &filters, anchor, now)
        .into_iter()
        .map(|record| TbrView::derive(record, now))
        .collect();

    Ok(Json(rows))
}

async fn pending_requests(
    State(state): State<AppState>,
) -> Result<Json<PendingRequestCountResponse>, AppError> {
    let records = state.repo.get_all().map_err(AppError::from_core)?;
    Ok(Json(PendingRequestCountResponse {
        count: pending_request_count(&records),
    }))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TbrView>, AppError> {
    let record = find_record(&state, &id)?;
    Ok(Json(TbrView::derive(record, Utc::now())))
}

async fn patch_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TbrPatch>,
) -> Result<Json<TbrView>, AppError> {
    let updated = state
        .repo
        .update(&id, patch)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("Record not found: {}", id)))?;

    Ok(Json(TbrView::derive(updated, Utc::now())))
}

/// Whole-record manual cancel. Only possible before departure; once the trek
/// has started the ledger tools take over.
async fn cancel_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CancelRecordRequest>,
) -> Result<Json<TbrView>, AppError> {
    let now = Utc::now();
    let record = find_record(&state, &id)?;

    if record.is_cancelled {
        return Err(AppError::ConflictError(format!(
            "Record already cancelled: {}",
            id
        )));
    }
    if !can_cancel_record(&record, now) {
        return Err(AppError::ValidationError(format!(
            "Record has already departed: {}",
            id
        )));
    }

    // A manual cancel lands in the same end state as an approved request.
    let patch = TbrPatch {
        is_cancelled: Some(true),
        cancellation_request_status: Some(CancellationRequestStatus::Approved),
        cancellation_decision: Some(CancellationDecision {
            by: req.performed_by,
            at: now,
            notes: req
                .notes
                .unwrap_or_else(|| "Manual cancellation from inventory feed.".to_string()),
        }),
        ..Default::default()
    };

    let updated = apply_patch(&state, &id, patch)?;
    info!("Cancelled record {}", id);
    Ok(Json(TbrView::derive(updated, now)))
}

async fn approve_cancellation_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApproveCancellationRequest>,
) -> Result<Json<TbrView>, AppError> {
    let now = Utc::now();
    let record = find_record(&state, &id)?;

    if record.cancellation_request_status != CancellationRequestStatus::Requested {
        return Err(AppError::ValidationError(format!(
            "No pending cancellation request on {}",
            id
        )));
    }

    // Approval cancels the record outright; the conflict guard then blocks
    // a later manual cancel from rewriting this decision.
    let patch = TbrPatch {
        is_cancelled: Some(true),
        cancellation_request_status: Some(CancellationRequestStatus::Approved),
        cancellation_decision: Some(CancellationDecision {
            by: req.performed_by,
            at: now,
            notes: "Approved from inventory feed.".to_string(),
        }),
        ..Default::default()
    };

    let updated = apply_patch(&state, &id, patch)?;
    info!("Approved cancellation request on {}", id);
    Ok(Json(TbrView::derive(updated, now)))
}

async fn reject_cancellation_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectCancellationRequest>,
) -> Result<Json<TbrView>, AppError> {
    let now = Utc::now();

    if req.reason.trim().is_empty() {
        return Err(AppError::ValidationError(
            "A rejection reason is required".to_string(),
        ));
    }

    let record = find_record(&state, &id)?;
    if record.cancellation_request_status != CancellationRequestStatus::Requested {
        return Err(AppError::ValidationError(format!(
            "No pending cancellation request on {}",
            id
        )));
    }

    let patch = TbrPatch {
        cancellation_request_status: Some(CancellationRequestStatus::Rejected),
        cancellation_decision: Some(CancellationDecision {
            by: req.performed_by,
            at: now,
            notes: req.reason,
        }),
        ..Default::default()
    };

    let updated = apply_patch(&state, &id, patch)?;
    info!("Rejected cancellation request on {}", id);
    Ok(Json(TbrView::derive(updated, now)))
}

async fn assign_captain(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignCaptainRequest>,
) -> Result<Json<TbrView>, AppError> {
    let now = Utc::now();

    let patch = TbrPatch {
        captain: Some(CaptainPatch::Assign(CaptainAssignment {
            id: req.id,
            name: req.name,
            contact: req.contact,
            assigned_by: req.assigned_by,
            assigned_at: now,
        })),
        ..Default::default()
    };

    let updated = apply_patch(&state, &id, patch)?;
    info!("Assigned captain on {}", id);
    Ok(Json(TbrView::derive(updated, now)))
}

async fn unassign_captain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TbrView>, AppError> {
    let patch = TbrPatch {
        captain: Some(CaptainPatch::Clear),
        ..Default::default()
    };

    let updated = apply_patch(&state, &id, patch)?;
    info!("Unassigned captain on {}", id);
    Ok(Json(TbrView::derive(updated, Utc::now())))
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

fn apply_patch(state: &AppState, id: &str, patch: TbrPatch) -> Result<Tbr, AppError> {
    state
        .repo
        .update(id, patch)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("Record not found: {}", id)))
}

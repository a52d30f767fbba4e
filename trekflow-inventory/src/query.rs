use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{CancellationPolicy, CancellationRequestStatus, Tbr, TrekStatus};
use crate::status::derive_status;

/// Width of the default arrival window, in days. The timeline pager steps the
/// anchor by the same amount so consecutive pages tile without gaps.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Filter set accepted by the inventory feed. Every field is optional and an
/// empty string counts as absent. An unfiltered query falls back to live
/// records inside the anchored window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryFilters {
    pub tbr_id: Option<String>,
    pub operator_id: Option<String>,
    pub destination: Option<String>,
    pub policy: Option<CancellationPolicy>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub request_status: Option<CancellationRequestStatus>,
}

/// Paging direction for the timeline anchor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineDirection {
    Prev,
    Next,
}

/// Move the anchor one window back or forward.
pub fn step_anchor(anchor: DateTime<Utc>, direction: TimelineDirection) -> DateTime<Utc> {
    match direction {
        TimelineDirection::Prev => anchor - Duration::days(DEFAULT_WINDOW_DAYS),
        TimelineDirection::Next => anchor + Duration::days(DEFAULT_WINDOW_DAYS),
    }
}

/// Number of records with an undecided vendor cancellation request. Feeds the
/// global alert badge, so it scans the whole store and ignores filters.
pub fn pending_request_count(records: &[Tbr]) -> usize {
    records
        .iter()
        .filter(|t| t.cancellation_request_status == CancellationRequestStatus::Requested)
        .count()
}

/// Run the inventory feed query over a snapshot of the store.
///
/// The pipeline applies its stages in a fixed order and is fully
/// deterministic for a given (records, filters, anchor, now) tuple:
///
/// 1. An id search short-circuits everything else, including the window.
/// 2. Operator filter. Selecting an operator also disables the default
///    window and the live-only fallback, so their full history is visible.
/// 3. Explicit arrival date range, else the default window of
///    [anchor, anchor + 7 days] when no operator is selected.
/// 4. Destination filter, which only surfaces live (ongoing or upcoming)
///    records.
/// 5. Policy filter.
/// 6. Cancellation-request-status filter.
/// 7. With no scoping filter active, restrict to live records.
/// 8. Stable sort: ongoing first, then upcoming, then the rest, each group
///    ordered by arrival time ascending.
pub fn query_inventory(
    records: &[Tbr],
    filters: &InventoryFilters,
    anchor: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<Tbr> {
    if let Some(id) = non_empty(&filters.tbr_id) {
        return records
            .iter()
            .filter(|t| t.id.eq_ignore_ascii_case(id))
            .cloned()
            .collect();
    }

    let mut results: Vec<Tbr> = records.to_vec();

    let operator_filter = non_empty(&filters.operator_id);
    if let Some(operator_id) = operator_filter {
        results.retain(|t| t.operator.id == operator_id);
    }

    let has_date_range = filters.start_date.is_some() || filters.end_date.is_some();
    if has_date_range {
        results.retain(|t| {
            let start_ok = filters.start_date.map_or(true, |s| t.arrival_time >= s);
            let end_ok = filters.end_date.map_or(true, |e| t.arrival_time <= e);
            start_ok && end_ok
        });
    } else if operator_filter.is_none() {
        let window_end = anchor + Duration::days(DEFAULT_WINDOW_DAYS);
        results.retain(|t| t.arrival_time >= anchor && t.arrival_time <= window_end);
    }

    let destination_filter = non_empty(&filters.destination);
    if let Some(destination) = destination_filter {
        results.retain(|t| t.destination == destination);
        results.retain(|t| is_live(t, now));
    }

    if let Some(policy) = filters.policy {
        results.retain(|t| t.cancellation_policy == policy);
    }

    if let Some(request_status) = filters.request_status {
        results.retain(|t| t.cancellation_request_status == request_status);
    }

    // Policy alone does not widen the feed: it narrows the default view but
    // keeps the live-only fallback in force.
    let has_scoping_filter = operator_filter.is_some()
        || has_date_range
        || destination_filter.is_some()
        || filters.request_status.is_some();
    if !has_scoping_filter {
        results.retain(|t| is_live(t, now));
    }

    results.sort_by(|a, b| {
        status_priority(derive_status(a, now))
            .cmp(&status_priority(derive_status(b, now)))
            .then_with(|| a.arrival_time.cmp(&b.arrival_time))
    });

    results
}

fn is_live(tbr: &Tbr, now: DateTime<Utc>) -> bool {
    matches!(
        derive_status(tbr, now),
        TrekStatus::Ongoing | TrekStatus::Upcoming
    )
}

fn status_priority(status: TrekStatus) -> u8 {
    match status {
        TrekStatus::Ongoing => 0,
        TrekStatus::Upcoming => 1,
        _ => 2,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

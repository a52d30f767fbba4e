use chrono::{DateTime, Duration, Utc};

use crate::record::{CancellationRequestStatus, Tbr, TrekStatus};

/// Derive the lifecycle status of a record at a given instant.
///
/// Precedence is fixed: an explicit cancellation (or an approved cancellation
/// request) wins over everything, an unapproved record is held back from the
/// timeline states, and only then does the clock decide upcoming vs ongoing
/// vs completed. The result is recomputed on every call and never cached, so
/// two calls with the same inputs always agree.
pub fn derive_status(tbr: &Tbr, now: DateTime<Utc>) -> TrekStatus {
    if tbr.is_cancelled || tbr.cancellation_request_status == CancellationRequestStatus::Approved {
        return TrekStatus::Cancelled;
    }

    if !tbr.is_approved {
        return TrekStatus::NeedsApproval;
    }

    if now < tbr.departure_time {
        TrekStatus::Upcoming
    } else if now < tbr.arrival_time {
        TrekStatus::Ongoing
    } else {
        TrekStatus::Completed
    }
}

/// Whether the record can accept new bookings right now.
///
/// Every gate must hold at once: derived status Upcoming, no cancellation
/// flag, approved, no open cancellation request of any kind, seats left, and
/// departure still in the future.
pub fn is_bookable(tbr: &Tbr, now: DateTime<Utc>) -> bool {
    derive_status(tbr, now) == TrekStatus::Upcoming
        && !tbr.is_cancelled
        && tbr.is_approved
        && tbr.cancellation_request_status == CancellationRequestStatus::None
        && tbr.available_slots() > 0
        && now < tbr.departure_time
}

/// Record-level cancellation is only offered before departure. Once the group
/// is on the trail the per-booking post-departure flow takes over.
pub fn can_cancel_record(tbr: &Tbr, now: DateTime<Utc>) -> bool {
    now < tbr.departure_time
}

/// Whether per-booking actions (cancellation) are still open on the ledger.
/// Open while the trek is upcoming or ongoing, and for a grace period after
/// arrival so late settlement disputes can still be processed.
pub fn booking_actions_open(tbr: &Tbr, now: DateTime<Utc>, post_arrival_grace_days: i64) -> bool {
    if now < tbr.arrival_time {
        return true;
    }
    now - tbr.arrival_time <= Duration::days(post_arrival_grace_days)
}

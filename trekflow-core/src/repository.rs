use trekflow_inventory::{Booking, Tbr, TbrPatch};

use crate::CoreResult;

/// Data access for trek booking records.
///
/// Mutations must be atomic against concurrent callers: `update` merges its
/// patch against the current row under one critical section, and
/// `record_booking_cancellation` swaps a booking row only while that row is
/// still active, so two operators racing to cancel the same booking cannot
/// both win.
pub trait TbrRepository: Send + Sync {
    /// Snapshot of every record, in insertion order.
    fn get_all(&self) -> CoreResult<Vec<Tbr>>;

    /// Exact-id lookup.
    fn find_by_id(&self, id: &str) -> CoreResult<Option<Tbr>>;

    /// Merge a partial update into a record and return the updated row.
    /// `Ok(None)` when the id is unknown.
    fn update(&self, id: &str, patch: TbrPatch) -> CoreResult<Option<Tbr>>;

    /// Replace one booking row with its cancelled form, provided the stored
    /// row is still active at commit time. Returns the row as stored.
    fn record_booking_cancellation(&self, tbr_id: &str, cancelled: Booking) -> CoreResult<Booking>;
}

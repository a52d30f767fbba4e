use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};
use trekflow_core::{CoreError, CoreResult, TbrRepository};
use trekflow_inventory::{Booking, BookingStatus, Tbr, TbrPatch};

/// In-memory record store.
///
/// Rows live in insertion order behind a single RwLock. Every mutation holds
/// the write lock for its whole read-modify-write, which is what makes patch
/// merges and booking-row swaps atomic against concurrent operators.
pub struct InMemoryTbrStore {
    records: RwLock<Vec<Tbr>>,
}

impl InMemoryTbrStore {
    pub fn new(records: Vec<Tbr>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn read_guard(&self) -> CoreResult<RwLockReadGuard<'_, Vec<Tbr>>> {
        self.records
            .read()
            .map_err(|_| CoreError::InternalError("record store lock poisoned".to_string()))
    }

    fn write_guard(&self) -> CoreResult<RwLockWriteGuard<'_, Vec<Tbr>>> {
        self.records
            .write()
            .map_err(|_| CoreError::InternalError("record store lock poisoned".to_string()))
    }
}

impl Default for InMemoryTbrStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl TbrRepository for InMemoryTbrStore {
    fn get_all(&self) -> CoreResult<Vec<Tbr>> {
        Ok(self.read_guard()?.clone())
    }

    fn find_by_id(&self, id: &str) -> CoreResult<Option<Tbr>> {
        Ok(self.read_guard()?.iter().find(|t| t.id == id).cloned())
    }

    fn update(&self, id: &str, patch: TbrPatch) -> CoreResult<Option<Tbr>> {
        let mut records = self.write_guard()?;
        match records.iter_mut().find(|t| t.id == id) {
            Some(record) => {
                record.apply(patch);
                debug!("Patched record {}", record.id);
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    fn record_booking_cancellation(&self, tbr_id: &str, cancelled: Booking) -> CoreResult<Booking> {
        let mut records = self.write_guard()?;
        let record = records
            .iter_mut()
            .find(|t| t.id == tbr_id)
            .ok_or_else(|| CoreError::NotFoundError(format!("record {}", tbr_id)))?;
        let row = record
            .bookings
            .iter_mut()
            .find(|b| b.id == cancelled.id)
            .ok_or_else(|| CoreError::NotFoundError(format!("booking {}", cancelled.id)))?;

        // The stored row decides, not the caller's snapshot: if another
        // operator already cancelled it, this commit loses.
        if row.status != BookingStatus::Active {
            return Err(CoreError::ConflictError(format!(
                "booking {} is not active",
                row.id
            )));
        }

        *row = cancelled;
        info!("Recorded cancellation of booking {} on {}", row.id, tbr_id);
        Ok(row.clone())
    }
}

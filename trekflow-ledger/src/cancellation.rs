use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trekflow_inventory::{Booking, BookingStatus};
use uuid::Uuid;

use crate::charges::{PLATFORM_FEE, PLATFORM_FEE_GST};
use crate::money::{to_decimal, to_money};

/// Flat amount retained on a pre-departure cancellation: the platform fee
/// plus its GST.
pub const PRE_DEPARTURE_HOLD: f64 = 10.0;

pub const TIME_SLAB_PRE_DEPARTURE: &str = ">24H";
pub const TIME_SLAB_POST_DEPARTURE: &str = "Post-Departure";

const REMARKS_PRE_DEPARTURE: &str = "Upcoming Cancellation: Only PF + GST PF retained.";
const REMARKS_POST_DEPARTURE: &str = "Post-Departure Adjustment. Full commission and taxes retained.";

const REASON_PRE_DEPARTURE: &str = "User Request";
const REASON_ONGOING: &str = "Force Majeure";
const REASON_COMPLETED: &str = "Admin Adjustment";

/// Which rulebook applies to a booking cancellation. Picked from the clock,
/// never from operator input, and re-derived again at finalize time in case
/// the departure passed while the proposal sat on screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationMode {
    /// Before departure: flat fee retention, refund is fixed.
    Standard,
    /// After departure: full platform share and taxes retained, the operator
    /// splits the remainder between customer refund and vendor credit.
    Manual,
}

/// A proposed refund/deduction/vendor-credit split for one booking.
///
/// The split always reconciles: `user_refund + deduction == total paid`, and
/// for the manual mode `deduction == non-refundable hold + vendor credit`
/// once the hold fits inside the paid amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationProposal {
    pub booking_id: String,
    pub mode: CancellationMode,
    pub user_refund: f64,
    pub deduction: f64,
    pub non_refundable_hold: f64,
    pub vendor_credit: f64,
    pub reason: String,
}

impl CancellationProposal {
    /// Apply an operator-entered refund. Only the manual mode is editable;
    /// the standard split is fixed by rule. Out-of-range values are clamped
    /// to the distributable amount, never rejected.
    pub fn with_refund(mut self, requested: f64) -> Self {
        if self.mode != CancellationMode::Manual {
            return self;
        }

        let paid = to_decimal(self.user_refund) + to_decimal(self.deduction);
        let hold = to_decimal(self.non_refundable_hold);
        let distributable = (paid - hold).max(Decimal::ZERO);
        let refund = to_decimal(requested).clamp(Decimal::ZERO, distributable);

        self.user_refund = to_money(refund);
        self.deduction = to_money(paid - refund);
        self.vendor_credit = to_money(distributable - refund);
        self
    }
}

/// Build the proposed split for cancelling a booking at `now`, given the
/// parent record's schedule.
pub fn preview_cancellation(
    booking: &Booking,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CancellationProposal {
    let paid = to_decimal(booking.total_paid);

    if now < departure {
        let hold = to_decimal(PRE_DEPARTURE_HOLD);
        let refund = (paid - hold).max(Decimal::ZERO);
        CancellationProposal {
            booking_id: booking.id.clone(),
            mode: CancellationMode::Standard,
            user_refund: to_money(refund),
            deduction: to_money(paid - refund),
            non_refundable_hold: PRE_DEPARTURE_HOLD,
            vendor_credit: 0.0,
            reason: REASON_PRE_DEPARTURE.to_string(),
        }
    } else {
        let hold = to_decimal(booking.platform_share) + to_decimal(booking.taxes);
        let distributable = (paid - hold).max(Decimal::ZERO);
        let reason = if now < arrival {
            REASON_ONGOING
        } else {
            REASON_COMPLETED
        };
        CancellationProposal {
            booking_id: booking.id.clone(),
            mode: CancellationMode::Manual,
            user_refund: 0.0,
            deduction: to_money(paid),
            non_refundable_hold: to_money(hold),
            vendor_credit: to_money(distributable),
            reason: reason.to_string(),
        }
    }
}

/// Commit a cancellation: re-derive the mode against the current clock,
/// apply any operator refund, and return the cancelled booking row.
///
/// Pre-departure cancellations rewrite the charge columns down to the flat
/// fee retention; post-departure ones keep every computed charge and only
/// record the split. Either way the caller gets back a row where
/// `refund_amount + deduction_amount` equals the amount paid.
pub fn finalize_cancellation(
    booking: &Booking,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    now: DateTime<Utc>,
    requested_refund: Option<f64>,
    reason: &str,
) -> Result<Booking, CancellationError> {
    if booking.status != BookingStatus::Active {
        return Err(CancellationError::BookingNotActive(booking.id.clone()));
    }

    let mut proposal = preview_cancellation(booking, departure, arrival, now);
    if let Some(refund) = requested_refund {
        proposal = proposal.with_refund(refund);
    }

    let mut cancelled = booking.clone();
    cancelled.status = BookingStatus::Cancelled;
    cancelled.refund_amount = Some(proposal.user_refund);
    cancelled.deduction_amount = Some(proposal.deduction);
    cancelled.vendor_share = proposal.vendor_credit;
    cancelled.cxl_id = Some(new_cancellation_id());
    cancelled.cxl_reason = Some(reason.to_string());

    match proposal.mode {
        CancellationMode::Standard => {
            // Only the platform fee and its GST survive; commission-based
            // charges are wiped from the row.
            cancelled.comm10 = 0.0;
            cancelled.get_comm18 = 0.0;
            cancelled.tcs1 = 0.0;
            cancelled.tds1 = 0.0;
            cancelled.pf = PLATFORM_FEE;
            cancelled.get_pf5 = PLATFORM_FEE_GST;
            cancelled.platform_share = PLATFORM_FEE;
            cancelled.taxes = PLATFORM_FEE_GST;
            cancelled.cxl_time_slab = Some(TIME_SLAB_PRE_DEPARTURE.to_string());
            cancelled.remarks = Some(REMARKS_PRE_DEPARTURE.to_string());
        }
        CancellationMode::Manual => {
            cancelled.cxl_time_slab = Some(TIME_SLAB_POST_DEPARTURE.to_string());
            cancelled.remarks = Some(REMARKS_POST_DEPARTURE.to_string());
        }
    }

    Ok(cancelled)
}

fn new_cancellation_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("CXL-{}", token[..8].to_uppercase())
}

#[derive(Debug, thiserror::Error)]
pub enum CancellationError {
    #[error("Booking is not active: {0}")]
    BookingNotActive(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn schedule() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 12, 10, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 13, 8, 0, 0).unwrap(),
        )
    }

    fn active_booking(total_paid: f64, platform_share: f64, taxes: f64) -> Booking {
        Booking {
            id: "BKG-5001".to_string(),
            booked_at: Utc.with_ymd_and_hms(2024, 5, 12, 17, 0, 0).unwrap(),
            traveller_name: "Aarav Sharma".to_string(),
            traveller_details: "24 / M".to_string(),
            sub_traveller_details: None,
            slots: 1,
            coupon_details: None,
            final_base_fare: total_paid,
            gst5: 0.0,
            pf: 9.52,
            ti: 0.0,
            ti_policy_id: None,
            fc: 0.0,
            fc_policy_id: None,
            total_paid,
            pending_amount: 0.0,
            is_fully_paid: true,
            comm10: 100.0,
            platform_share,
            get_comm18: 18.0,
            get_pf5: 0.48,
            tcs1: 10.0,
            tds1: 10.0,
            taxes,
            vendor_share: total_paid - platform_share - taxes,
            status: BookingStatus::Active,
            support_ticket: None,
            cxl_id: None,
            cxl_time_slab: None,
            refund_amount: None,
            deduction_amount: None,
            cxl_reason: None,
            remarks: None,
        }
    }

    #[test]
    fn test_pre_departure_split_is_flat_fee() {
        let (dep, arr) = schedule();
        let booking = active_booking(1000.0, 109.52, 40.0);
        let now = dep - Duration::days(2);

        let proposal = preview_cancellation(&booking, dep, arr, now);
        assert_eq!(proposal.mode, CancellationMode::Standard);
        assert_eq!(proposal.user_refund, 990.0);
        assert_eq!(proposal.deduction, 10.0);
        assert_eq!(proposal.vendor_credit, 0.0);
        assert_eq!(proposal.reason, "User Request");
    }

    #[test]
    fn test_pre_departure_refund_never_negative() {
        let (dep, arr) = schedule();
        let booking = active_booking(6.0, 109.52, 40.0);
        let now = dep - Duration::days(2);

        let proposal = preview_cancellation(&booking, dep, arr, now);
        assert_eq!(proposal.user_refund, 0.0);
        // Deduction still reconciles against what was actually paid.
        assert_eq!(proposal.deduction, 6.0);
    }

    #[test]
    fn test_standard_mode_ignores_refund_override() {
        let (dep, arr) = schedule();
        let booking = active_booking(1000.0, 109.52, 40.0);
        let now = dep - Duration::days(2);

        let proposal = preview_cancellation(&booking, dep, arr, now).with_refund(500.0);
        assert_eq!(proposal.user_refund, 990.0);
        assert_eq!(proposal.deduction, 10.0);
    }

    #[test]
    fn test_post_arrival_split_with_operator_refund() {
        let (dep, arr) = schedule();
        let booking = active_booking(2000.0, 300.0, 50.0);
        let now = arr + Duration::days(1);

        let proposal = preview_cancellation(&booking, dep, arr, now);
        assert_eq!(proposal.mode, CancellationMode::Manual);
        assert_eq!(proposal.user_refund, 0.0);
        assert_eq!(proposal.deduction, 2000.0);
        assert_eq!(proposal.non_refundable_hold, 350.0);
        assert_eq!(proposal.vendor_credit, 1650.0);
        assert_eq!(proposal.reason, "Admin Adjustment");

        let adjusted = proposal.with_refund(1000.0);
        assert_eq!(adjusted.user_refund, 1000.0);
        assert_eq!(adjusted.deduction, 1000.0);
        assert_eq!(adjusted.vendor_credit, 650.0);
    }

    #[test]
    fn test_ongoing_default_reason() {
        let (dep, arr) = schedule();
        let booking = active_booking(2000.0, 300.0, 50.0);
        let now = dep + Duration::hours(6);

        let proposal = preview_cancellation(&booking, dep, arr, now);
        assert_eq!(proposal.reason, "Force Majeure");
    }

    #[test]
    fn test_refund_override_clamps_both_ends() {
        let (dep, arr) = schedule();
        let booking = active_booking(2000.0, 300.0, 50.0);
        let now = arr + Duration::days(1);

        let too_big = preview_cancellation(&booking, dep, arr, now).with_refund(9999.0);
        assert_eq!(too_big.user_refund, 1650.0);
        assert_eq!(too_big.vendor_credit, 0.0);
        assert_eq!(too_big.deduction, 350.0);

        let negative = preview_cancellation(&booking, dep, arr, now).with_refund(-50.0);
        assert_eq!(negative.user_refund, 0.0);
        assert_eq!(negative.vendor_credit, 1650.0);
        assert_eq!(negative.deduction, 2000.0);
    }

    #[test]
    fn test_hold_larger_than_paid_distributes_nothing() {
        let (dep, arr) = schedule();
        // Deposit-only payment smaller than the retained share.
        let booking = active_booking(200.0, 300.0, 50.0);
        let now = arr + Duration::days(1);

        let proposal = preview_cancellation(&booking, dep, arr, now);
        assert_eq!(proposal.vendor_credit, 0.0);
        assert_eq!(proposal.user_refund, 0.0);
        assert_eq!(proposal.deduction, 200.0);

        let adjusted = proposal.with_refund(100.0);
        assert_eq!(adjusted.user_refund, 0.0);
        assert_eq!(adjusted.deduction, 200.0);
    }

    #[test]
    fn test_finalize_pre_departure_rewrites_charges() {
        let (dep, arr) = schedule();
        let booking = active_booking(1000.0, 109.52, 40.0);
        let now = dep - Duration::days(2);

        let cancelled =
            finalize_cancellation(&booking, dep, arr, now, None, "User Request").unwrap();

        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.refund_amount, Some(990.0));
        assert_eq!(cancelled.deduction_amount, Some(10.0));
        assert_eq!(cancelled.vendor_share, 0.0);
        assert_eq!(cancelled.comm10, 0.0);
        assert_eq!(cancelled.get_comm18, 0.0);
        assert_eq!(cancelled.tcs1, 0.0);
        assert_eq!(cancelled.tds1, 0.0);
        assert_eq!(cancelled.pf, 9.52);
        assert_eq!(cancelled.get_pf5, 0.48);
        assert_eq!(cancelled.platform_share, 9.52);
        assert_eq!(cancelled.taxes, 0.48);
        assert_eq!(cancelled.cxl_time_slab.as_deref(), Some(">24H"));
        assert_eq!(
            cancelled.remarks.as_deref(),
            Some("Upcoming Cancellation: Only PF + GST PF retained.")
        );
        let cxl_id = cancelled.cxl_id.unwrap();
        assert!(cxl_id.starts_with("CXL-"));
        assert_eq!(cxl_id.len(), 12);
    }

    #[test]
    fn test_cancelled_row_wire_shape() {
        let (dep, arr) = schedule();
        let booking = active_booking(1000.0, 109.52, 40.0);
        let now = dep - Duration::days(2);

        // The proposal is the preview response body; the dashboard reads
        // these exact keys.
        let proposal = preview_cancellation(&booking, dep, arr, now);
        let wire = serde_json::to_value(&proposal).unwrap();
        assert_eq!(wire["booking_id"], "BKG-5001");
        assert_eq!(wire["mode"], "STANDARD");
        assert_eq!(wire["user_refund"], 990.0);
        assert_eq!(wire["non_refundable_hold"], 10.0);

        let cancelled =
            finalize_cancellation(&booking, dep, arr, now, None, "User Request").unwrap();
        let row = serde_json::to_value(&cancelled).unwrap();
        assert_eq!(row["status"], "Cancelled");
        assert_eq!(row["cxl_time_slab"], ">24H");
        assert_eq!(row["refund_amount"], 990.0);
        assert_eq!(row["deduction_amount"], 10.0);
        assert_eq!(row["comm10"], 0.0);
        assert_eq!(row["pf"], 9.52);
    }

    #[test]
    fn test_finalize_post_departure_keeps_charges() {
        let (dep, arr) = schedule();
        let booking = active_booking(2000.0, 300.0, 50.0);
        let now = arr + Duration::days(1);

        let cancelled =
            finalize_cancellation(&booking, dep, arr, now, Some(1000.0), "Admin Adjustment")
                .unwrap();

        assert_eq!(cancelled.refund_amount, Some(1000.0));
        assert_eq!(cancelled.deduction_amount, Some(1000.0));
        assert_eq!(cancelled.vendor_share, 650.0);
        // Charge columns are untouched in the manual mode.
        assert_eq!(cancelled.comm10, booking.comm10);
        assert_eq!(cancelled.platform_share, booking.platform_share);
        assert_eq!(cancelled.taxes, booking.taxes);
        assert_eq!(cancelled.get_comm18, booking.get_comm18);
        assert_eq!(cancelled.cxl_time_slab.as_deref(), Some("Post-Departure"));
        assert_eq!(
            cancelled.remarks.as_deref(),
            Some("Post-Departure Adjustment. Full commission and taxes retained.")
        );
    }

    #[test]
    fn test_finalize_re_derives_mode_at_commit_time() {
        let (dep, arr) = schedule();
        let booking = active_booking(2000.0, 300.0, 50.0);

        // Previewed before departure, committed after: the commit clock wins.
        let preview_now = dep - Duration::hours(2);
        let proposal = preview_cancellation(&booking, dep, arr, preview_now);
        assert_eq!(proposal.mode, CancellationMode::Standard);

        let commit_now = dep + Duration::hours(2);
        let cancelled =
            finalize_cancellation(&booking, dep, arr, commit_now, None, "User Request").unwrap();
        assert_eq!(cancelled.cxl_time_slab.as_deref(), Some("Post-Departure"));
        assert_eq!(cancelled.comm10, booking.comm10);
    }

    #[test]
    fn test_finalize_rejects_already_cancelled() {
        let (dep, arr) = schedule();
        let mut booking = active_booking(1000.0, 109.52, 40.0);
        booking.status = BookingStatus::Cancelled;
        let now = dep - Duration::days(2);

        let err = finalize_cancellation(&booking, dep, arr, now, None, "User Request").unwrap_err();
        assert!(matches!(err, CancellationError::BookingNotActive(_)));
    }

    #[test]
    fn test_refund_and_deduction_reconcile_in_both_modes() {
        let (dep, arr) = schedule();
        let booking = active_booking(1234.56, 132.97, 43.21);

        let pre = finalize_cancellation(
            &booking,
            dep,
            arr,
            dep - Duration::days(1),
            None,
            "User Request",
        )
        .unwrap();
        let pre_total = pre.refund_amount.unwrap() + pre.deduction_amount.unwrap();
        assert!((pre_total - booking.total_paid).abs() < 0.005);

        let post = finalize_cancellation(
            &booking,
            dep,
            arr,
            arr + Duration::days(2),
            Some(700.0),
            "Admin Adjustment",
        )
        .unwrap();
        let post_total = post.refund_amount.unwrap() + post.deduction_amount.unwrap();
        assert!((post_total - booking.total_paid).abs() < 0.005);
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trekflow_inventory::{Booking, BookingStatus};

use crate::money::{to_decimal, to_money};

/// Roll-up of a record's booking ledger, partitioned by settlement state.
///
/// Payments, slots, platform share and payouts are kept per partition; the
/// tax components are summed across both partitions because tax already
/// collected does not disappear when a booking is cancelled. Refunds are
/// only ever issued against cancelled rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub active_paid: f64,
    pub active_slots: u32,
    pub cancelled_paid: f64,
    pub cancelled_slots: u32,
    pub active_platform_share: f64,
    pub cancelled_platform_share: f64,
    pub gst_commission: f64,
    pub gst_platform_fee: f64,
    pub gst_base_fare: f64,
    pub tcs: f64,
    pub tds: f64,
    /// gst_commission + gst_platform_fee + gst_base_fare + tcs + tds.
    pub total_taxes: f64,
    pub active_payout: f64,
    pub cancelled_payout: f64,
    pub refunds_issued: f64,
}

impl LedgerSummary {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut active_paid = Decimal::ZERO;
        let mut active_slots: u32 = 0;
        let mut cancelled_paid = Decimal::ZERO;
        let mut cancelled_slots: u32 = 0;
        let mut active_platform_share = Decimal::ZERO;
        let mut cancelled_platform_share = Decimal::ZERO;
        let mut gst_commission = Decimal::ZERO;
        let mut gst_platform_fee = Decimal::ZERO;
        let mut gst_base_fare = Decimal::ZERO;
        let mut tcs = Decimal::ZERO;
        let mut tds = Decimal::ZERO;
        let mut active_payout = Decimal::ZERO;
        let mut cancelled_payout = Decimal::ZERO;
        let mut refunds_issued = Decimal::ZERO;

        for booking in bookings {
            gst_commission += to_decimal(booking.get_comm18);
            gst_platform_fee += to_decimal(booking.get_pf5);
            gst_base_fare += to_decimal(booking.gst5);
            tcs += to_decimal(booking.tcs1);
            tds += to_decimal(booking.tds1);

            match booking.status {
                BookingStatus::Active => {
                    active_paid += to_decimal(booking.total_paid);
                    active_slots += booking.slots;
                    active_platform_share += to_decimal(booking.platform_share);
                    active_payout += to_decimal(booking.vendor_share);
                }
                BookingStatus::Cancelled => {
                    cancelled_paid += to_decimal(booking.total_paid);
                    cancelled_slots += booking.slots;
                    cancelled_platform_share += to_decimal(booking.platform_share);
                    cancelled_payout += to_decimal(booking.vendor_share);
                    refunds_issued += to_decimal(booking.refund_amount.unwrap_or(0.0));
                }
            }
        }

        let total_taxes = gst_commission + gst_platform_fee + gst_base_fare + tcs + tds;

        Self {
            active_paid: to_money(active_paid),
            active_slots,
            cancelled_paid: to_money(cancelled_paid),
            cancelled_slots,
            active_platform_share: to_money(active_platform_share),
            cancelled_platform_share: to_money(cancelled_platform_share),
            gst_commission: to_money(gst_commission),
            gst_platform_fee: to_money(gst_platform_fee),
            gst_base_fare: to_money(gst_base_fare),
            tcs: to_money(tcs),
            tds: to_money(tds),
            total_taxes: to_money(total_taxes),
            active_payout: to_money(active_payout),
            cancelled_payout: to_money(cancelled_payout),
            refunds_issued: to_money(refunds_issued),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn booking(id: &str, status: BookingStatus, total_paid: f64, slots: u32) -> Booking {
        Booking {
            id: id.to_string(),
            booked_at: Utc.with_ymd_and_hms(2024, 5, 12, 17, 0, 0).unwrap(),
            traveller_name: "Meera Pillai".to_string(),
            traveller_details: "29 / F".to_string(),
            sub_traveller_details: None,
            slots,
            coupon_details: None,
            final_base_fare: total_paid,
            gst5: 50.0,
            pf: 9.52,
            ti: 0.0,
            ti_policy_id: None,
            fc: 0.0,
            fc_policy_id: None,
            total_paid,
            pending_amount: 0.0,
            is_fully_paid: true,
            comm10: 100.0,
            platform_share: 109.52,
            get_comm18: 18.0,
            get_pf5: 0.48,
            tcs1: 10.0,
            tds1: 10.0,
            taxes: 38.48,
            vendor_share: 200.0,
            status,
            support_ticket: None,
            cxl_id: None,
            cxl_time_slab: None,
            refund_amount: match status {
                BookingStatus::Cancelled => Some(500.0),
                BookingStatus::Active => None,
            },
            deduction_amount: None,
            cxl_reason: None,
            remarks: None,
        }
    }

    #[test]
    fn test_partitions_and_tax_components() {
        let ledger = vec![
            booking("B-1", BookingStatus::Active, 1000.0, 2),
            booking("B-2", BookingStatus::Active, 2000.0, 1),
            booking("B-3", BookingStatus::Cancelled, 1500.0, 1),
        ];

        let summary = LedgerSummary::from_bookings(&ledger);

        assert_eq!(summary.active_paid, 3000.0);
        assert_eq!(summary.active_slots, 3);
        assert_eq!(summary.cancelled_paid, 1500.0);
        assert_eq!(summary.cancelled_slots, 1);

        assert_eq!(summary.active_platform_share, 219.04);
        assert_eq!(summary.cancelled_platform_share, 109.52);

        // Tax components come from both partitions.
        assert_eq!(summary.gst_commission, 54.0);
        assert_eq!(summary.gst_platform_fee, 1.44);
        assert_eq!(summary.gst_base_fare, 150.0);
        assert_eq!(summary.tcs, 30.0);
        assert_eq!(summary.tds, 30.0);
        assert_eq!(summary.total_taxes, 265.44);

        assert_eq!(summary.active_payout, 400.0);
        assert_eq!(summary.cancelled_payout, 200.0);
        assert_eq!(summary.refunds_issued, 500.0);
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let summary = LedgerSummary::from_bookings(&[]);
        assert_eq!(summary.active_paid, 0.0);
        assert_eq!(summary.cancelled_paid, 0.0);
        assert_eq!(summary.total_taxes, 0.0);
        assert_eq!(summary.refunds_issued, 0.0);
        assert_eq!(summary.active_slots, 0);
    }

    #[test]
    fn test_missing_refund_counts_as_zero() {
        let mut cancelled = booking("B-9", BookingStatus::Cancelled, 800.0, 1);
        cancelled.refund_amount = None;

        let summary = LedgerSummary::from_bookings(&[cancelled]);
        assert_eq!(summary.refunds_issued, 0.0);
        assert_eq!(summary.cancelled_paid, 800.0);
    }
}

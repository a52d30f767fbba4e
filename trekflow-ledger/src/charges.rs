use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trekflow_inventory::CancellationPolicy;

use crate::money::{round_money, to_decimal, to_money};

/// GST rate on the base fare.
pub const BASE_FARE_GST_RATE: f64 = 0.05;
/// Flat platform fee collected per booking.
pub const PLATFORM_FEE: f64 = 9.52;
/// GST rate on the platform fee.
pub const PLATFORM_FEE_GST_RATE: f64 = 0.05;
/// GST on the platform fee at today's flat fee, as retained on cancellation.
pub const PLATFORM_FEE_GST: f64 = 0.48;
/// Platform commission rate on the base fare.
pub const COMMISSION_RATE: f64 = 0.10;
/// GST rate on the commission.
pub const COMMISSION_GST_RATE: f64 = 0.18;
/// Tax collected at source, on the amount actually paid.
pub const TCS_RATE: f64 = 0.01;
/// Tax deducted at source, on the amount actually paid.
pub const TDS_RATE: f64 = 0.01;
/// Flexi-cancellation add-on, sold with the Standard plan only.
pub const FLEXI_CANCELLATION_FEE: f64 = 500.0;
/// Per-slot deposit due upfront under the Flexible plan.
pub const FLEXIBLE_DEPOSIT_PER_SLOT: f64 = 999.0;

/// Inputs needed to derive a booking's charge columns.
#[derive(Debug, Clone)]
pub struct ChargeInputs {
    /// Base fare after any coupon, for all slots together.
    pub base_fare: f64,
    pub slots: u32,
    pub policy: CancellationPolicy,
    /// Travel insurance premium, 0 when not opted in.
    pub travel_insurance: f64,
    /// Flexible-plan bookings may defer the balance and pay only the
    /// per-slot deposit upfront. Ignored for Standard, which always pays in
    /// full.
    pub pay_in_full: bool,
}

/// The derived money columns for one booking: customer-side collections on
/// top of the base fare, then the platform-side splits out of what was paid.
/// Every column is rounded to two decimals, and the sheet reconciles exactly:
/// `vendor_share = total_paid - platform_share - taxes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeSheet {
    pub final_base_fare: f64,
    pub gst5: f64,
    pub pf: f64,
    pub ti: f64,
    pub fc: f64,
    pub total_payable: f64,
    pub total_paid: f64,
    pub pending_amount: f64,
    pub is_fully_paid: bool,
    pub comm10: f64,
    pub platform_share: f64,
    pub get_comm18: f64,
    pub get_pf5: f64,
    pub tcs1: f64,
    pub tds1: f64,
    pub taxes: f64,
    pub vendor_share: f64,
}

impl ChargeSheet {
    pub fn compute(inputs: &ChargeInputs) -> Self {
        let base = to_decimal(inputs.base_fare);
        let gst5 = round_money(base * to_decimal(BASE_FARE_GST_RATE));
        let pf = to_decimal(PLATFORM_FEE);
        let ti = to_decimal(inputs.travel_insurance);
        let fc = if inputs.policy == CancellationPolicy::Standard {
            to_decimal(FLEXI_CANCELLATION_FEE)
        } else {
            Decimal::ZERO
        };
        let total_payable = base + gst5 + pf + ti + fc;

        let fully_paid = inputs.pay_in_full || inputs.policy == CancellationPolicy::Standard;
        let total_paid = if fully_paid {
            total_payable
        } else {
            to_decimal(FLEXIBLE_DEPOSIT_PER_SLOT) * Decimal::from(inputs.slots)
        };
        let pending_amount = total_payable - total_paid;

        let comm10 = round_money(base * to_decimal(COMMISSION_RATE));
        let platform_share = comm10 + pf;
        let get_comm18 = round_money(comm10 * to_decimal(COMMISSION_GST_RATE));
        let get_pf5 = round_money(pf * to_decimal(PLATFORM_FEE_GST_RATE));
        let tcs1 = round_money(total_paid * to_decimal(TCS_RATE));
        let tds1 = round_money(total_paid * to_decimal(TDS_RATE));
        let taxes = get_comm18 + get_pf5 + tcs1 + tds1;
        let vendor_share = total_paid - platform_share - taxes;

        Self {
            final_base_fare: to_money(base),
            gst5: to_money(gst5),
            pf: to_money(pf),
            ti: to_money(ti),
            fc: to_money(fc),
            total_payable: to_money(total_payable),
            total_paid: to_money(total_paid),
            pending_amount: to_money(pending_amount),
            is_fully_paid: fully_paid,
            comm10: to_money(comm10),
            platform_share: to_money(platform_share),
            get_comm18: to_money(get_comm18),
            get_pf5: to_money(get_pf5),
            tcs1: to_money(tcs1),
            tds1: to_money(tds1),
            taxes: to_money(taxes),
            vendor_share: to_money(vendor_share),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a trek record. Never stored: always derived from the
/// record's governance flags and its position on the timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrekStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
    #[serde(rename = "Needs Approval")]
    NeedsApproval,
}

/// Payment plan sold with the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CancellationPolicy {
    Standard,
    Flexible,
}

/// State of a vendor-raised cancellation request against the whole record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CancellationRequestStatus {
    None,
    Requested,
    Approved,
    Rejected,
}

/// Settlement state of a single booking row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportMode {
    Train,
    Bus,
    #[serde(rename = "Mini Bus")]
    MiniBus,
    Car,
}

/// Vendor operating the trek.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub review_count: u32,
}

/// One leg of the published route plan. Dates and times here are display
/// strings from the vendor sheet, not schedule-bearing timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStage {
    pub name: String,
    pub location: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub mode: TransportMode,
    pub point: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day_number: u32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrekRoute {
    pub departure_stages: Vec<RouteStage>,
    pub meeting_point: RouteStage,
    pub trek_stages: Vec<RouteStage>,
    pub return_stage: RouteStage,
}

/// Descriptive content shown on the detail page. Carried on the record but
/// never consulted by the status or query engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrekDetails {
    pub operator_contact_number: String,
    pub route: TrekRoute,
    pub itinerary: Vec<ItineraryDay>,
    pub activities: Vec<Activity>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub other_policies: Vec<String>,
}

/// Who approved the record for sale, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalSnapshot {
    pub approved_by: String,
    pub approved_at: DateTime<Utc>,
    pub version_hash: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    pub status: TicketStatus,
    pub opened_at: DateTime<Utc>,
}

/// A single booking row in the record's ledger.
///
/// The charge columns mirror the settlement sheet: amounts collected from the
/// customer on top of the base fare, then the platform-side splits taken out
/// of what was actually paid. All amounts are rupees rounded to two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub booked_at: DateTime<Utc>,
    pub traveller_name: String,
    pub traveller_details: String,
    pub sub_traveller_details: Option<String>,
    pub slots: u32,
    pub coupon_details: Option<String>,
    /// Base fare after coupon, for all slots.
    pub final_base_fare: f64,
    /// GST at 5% on the base fare.
    pub gst5: f64,
    /// Flat platform fee.
    pub pf: f64,
    /// Travel insurance premium, 0 when not opted in.
    pub ti: f64,
    pub ti_policy_id: Option<String>,
    /// Flexi-cancellation add-on, 0 when not sold.
    pub fc: f64,
    pub fc_policy_id: Option<String>,
    pub total_paid: f64,
    pub pending_amount: f64,
    pub is_fully_paid: bool,
    /// Platform commission at 10% of base fare.
    pub comm10: f64,
    /// comm10 + pf.
    pub platform_share: f64,
    /// GST at 18% on the commission.
    pub get_comm18: f64,
    /// GST at 5% on the platform fee.
    pub get_pf5: f64,
    /// Tax collected at source, 1% of total paid.
    pub tcs1: f64,
    /// Tax deducted at source, 1% of total paid.
    pub tds1: f64,
    /// get_comm18 + get_pf5 + tcs1 + tds1.
    pub taxes: f64,
    /// total_paid - platform_share - taxes.
    pub vendor_share: f64,
    pub status: BookingStatus,
    pub support_ticket: Option<SupportTicket>,
    /// Set only once the booking is cancelled.
    pub cxl_id: Option<String>,
    pub cxl_time_slab: Option<String>,
    pub refund_amount: Option<f64>,
    pub deduction_amount: Option<f64>,
    pub cxl_reason: Option<String>,
    pub remarks: Option<String>,
}

/// Admin decision recorded against a record-level cancellation or request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationDecision {
    pub by: String,
    pub at: DateTime<Utc>,
    pub notes: String,
}

/// Trek captain currently assigned to lead the departure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptainAssignment {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
}

/// A Trek Booking Record: one scheduled departure of a trek, with its
/// governance flags, sales counters and the full booking ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tbr {
    pub id: String,
    pub trek_name: String,
    pub destination: String,
    pub operator: Operator,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub sold_slots: u32,
    pub total_slots: u32,
    pub slot_price: f64,
    pub is_cancelled: bool,
    pub is_approved: bool,
    pub cancellation_policy: CancellationPolicy,
    pub cancellation_policy_desc: String,
    pub approval_details: Option<ApprovalSnapshot>,
    pub cancellation_request_status: CancellationRequestStatus,
    pub cancellation_requested_by: Option<String>,
    pub cancellation_requested_at: Option<DateTime<Utc>>,
    pub cancellation_request_reason: Option<String>,
    pub cancellation_decision: Option<CancellationDecision>,
    pub captain: Option<CaptainAssignment>,
    pub trek_details: Option<TrekDetails>,
    pub bookings: Vec<Booking>,
}

impl Tbr {
    pub fn available_slots(&self) -> u32 {
        self.total_slots.saturating_sub(self.sold_slots)
    }

    /// Merge a partial update into the record. Only the fields carried by the
    /// patch change; everything else (identity, schedule, pricing) is fixed
    /// for the life of the record.
    pub fn apply(&mut self, patch: TbrPatch) {
        if let Some(v) = patch.is_cancelled {
            self.is_cancelled = v;
        }
        if let Some(v) = patch.is_approved {
            self.is_approved = v;
        }
        if let Some(v) = patch.cancellation_request_status {
            self.cancellation_request_status = v;
        }
        if let Some(v) = patch.cancellation_decision {
            self.cancellation_decision = Some(v);
        }
        match patch.captain {
            Some(CaptainPatch::Assign(assignment)) => self.captain = Some(assignment),
            Some(CaptainPatch::Clear) => self.captain = None,
            None => {}
        }
        if let Some(v) = patch.bookings {
            self.bookings = v;
        }
        if let Some(v) = patch.sold_slots {
            self.sold_slots = v;
        }
    }
}

/// Captain changes need a third state beyond "set" and "leave alone":
/// an explicit unassign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaptainPatch {
    Assign(CaptainAssignment),
    Clear,
}

/// Partial update against a record. Absent fields are left untouched.
/// The booking ledger is replaced wholesale when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TbrPatch {
    pub is_cancelled: Option<bool>,
    pub is_approved: Option<bool>,
    pub cancellation_request_status: Option<CancellationRequestStatus>,
    pub cancellation_decision: Option<CancellationDecision>,
    pub captain: Option<CaptainPatch>,
    pub bookings: Option<Vec<Booking>>,
    pub sold_slots: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_tbr() -> Tbr {
        Tbr {
            id: "TBR-1001".to_string(),
            trek_name: "Kedarkantha Summit".to_string(),
            destination: "Uttarakhand".to_string(),
            operator: Operator {
                id: "OP-01".to_string(),
                name: "Himalayan Trails".to_string(),
                rating: 4.6,
                review_count: 812,
            },
            departure_time: Utc.with_ymd_and_hms(2024, 12, 10, 8, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 12, 13, 8, 0, 0).unwrap(),
            sold_slots: 8,
            total_slots: 20,
            slot_price: 4500.0,
            is_cancelled: false,
            is_approved: true,
            cancellation_policy: CancellationPolicy::Standard,
            cancellation_policy_desc: "Full charge retention after departure".to_string(),
            approval_details: None,
            cancellation_request_status: CancellationRequestStatus::None,
            cancellation_requested_by: None,
            cancellation_requested_at: None,
            cancellation_request_reason: None,
            cancellation_decision: None,
            captain: None,
            trek_details: None,
            bookings: vec![],
        }
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&TrekStatus::NeedsApproval).unwrap(),
            "\"Needs Approval\""
        );
        assert_eq!(
            serde_json::to_string(&TrekStatus::Upcoming).unwrap(),
            "\"Upcoming\""
        );
        assert_eq!(
            serde_json::to_string(&TransportMode::MiniBus).unwrap(),
            "\"Mini Bus\""
        );
        assert_eq!(
            serde_json::from_str::<CancellationRequestStatus>("\"Requested\"").unwrap(),
            CancellationRequestStatus::Requested
        );
    }

    #[test]
    fn test_available_slots_never_underflows() {
        let mut tbr = sample_tbr();
        assert_eq!(tbr.available_slots(), 12);

        tbr.sold_slots = 25;
        assert_eq!(tbr.available_slots(), 0);
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut tbr = sample_tbr();
        let decision_at = Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap();

        tbr.apply(TbrPatch {
            is_cancelled: Some(true),
            cancellation_request_status: Some(CancellationRequestStatus::Approved),
            cancellation_decision: Some(CancellationDecision {
                by: "Admin Alex".to_string(),
                at: decision_at,
                notes: "Manual cancellation from inventory feed.".to_string(),
            }),
            ..Default::default()
        });

        assert!(tbr.is_cancelled);
        assert_eq!(
            tbr.cancellation_request_status,
            CancellationRequestStatus::Approved
        );
        assert!(tbr.is_approved); // untouched
        assert_eq!(tbr.sold_slots, 8); // untouched
        assert_eq!(tbr.cancellation_decision.unwrap().by, "Admin Alex");
    }

    #[test]
    fn test_apply_captain_assign_and_clear() {
        let mut tbr = sample_tbr();
        let assigned_at = Utc.with_ymd_and_hms(2024, 12, 2, 9, 0, 0).unwrap();

        tbr.apply(TbrPatch {
            captain: Some(CaptainPatch::Assign(CaptainAssignment {
                id: "CAP-7".to_string(),
                name: "Ravi Negi".to_string(),
                contact: "+91-98100-11223".to_string(),
                assigned_by: "Admin Alex".to_string(),
                assigned_at,
            })),
            ..Default::default()
        });
        assert_eq!(tbr.captain.as_ref().unwrap().name, "Ravi Negi");

        tbr.apply(TbrPatch {
            captain: Some(CaptainPatch::Clear),
            ..Default::default()
        });
        assert!(tbr.captain.is_none());

        // A patch with no captain field leaves the assignment alone.
        tbr.apply(TbrPatch::default());
        assert!(tbr.captain.is_none());
    }
}

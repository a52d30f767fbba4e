use chrono::{DateTime, Duration, TimeZone, Utc};
use trekflow_inventory::{
    Activity, ApprovalSnapshot, Booking, BookingStatus, CancellationPolicy,
    CancellationRequestStatus, ItineraryDay, Operator, RouteStage, SupportTicket, Tbr, TicketStatus,
    TransportMode, TrekDetails, TrekRoute,
};
use trekflow_ledger::money::{to_decimal, to_money};
use trekflow_ledger::{ChargeInputs, ChargeSheet};

const OPERATORS: [(&str, &str, f64, u32); 3] = [
    ("OP-001", "Alpine Explorers", 4.8, 1250),
    ("OP-002", "Himalayan Trails", 4.5, 890),
    ("OP-003", "Summit Seekers", 4.9, 2100),
];

const DESTINATIONS: [&str; 8] = [
    "Rohtang Pass",
    "Everest Base Camp",
    "Hampta Pass",
    "Valley of Flowers",
    "Kedarnath",
    "Kashmir Great Lakes",
    "Goechala",
    "Sandakphu",
];

const TRAVELLERS: [&str; 6] = [
    "Abhishek",
    "Priya",
    "Vikram Singh",
    "Meera Deshpande",
    "Siddharth",
    "Ananya",
];

/// Build the sample inventory: a dense block of historical December
/// departures plus a rolling block anchored on `now`, so the default feed
/// window always has live records in it.
pub fn sample_inventory(now: DateTime<Utc>) -> Vec<Tbr> {
    let mut records = Vec::new();
    let mut next_id = 8000u32;

    // December high-density block, one departure per listed day.
    let december_days: [u32; 15] = [11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 24, 25, 26];
    for (idx, day) in december_days.iter().enumerate() {
        let departure = Utc.with_ymd_and_hms(2024, 12, *day, 8, 0, 0).unwrap();
        let arrival = departure + Duration::days(3);
        let policy = if idx % 2 == 0 {
            CancellationPolicy::Flexible
        } else {
            CancellationPolicy::Standard
        };
        let slot_price = 4500.0 + (*day as f64) * 20.0;
        let sold_slots = 8 + (idx as u32 % 6);
        let destination = DESTINATIONS[idx % DESTINATIONS.len()];

        let id = format!("TBR-{next_id}");
        next_id += 1;

        records.push(Tbr {
            id,
            trek_name: format!("{destination} Winter Trek"),
            destination: destination.to_string(),
            operator: operator(idx),
            departure_time: departure,
            arrival_time: arrival,
            sold_slots,
            total_slots: 20,
            slot_price,
            is_cancelled: false,
            is_approved: true,
            cancellation_policy: policy,
            cancellation_policy_desc: format!("{} Historical Policy", policy_name(policy)),
            approval_details: Some(ApprovalSnapshot {
                approved_by: "System Migration".to_string(),
                approved_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
                version_hash: Some(format!("VH-DEC-{next_id}")),
            }),
            cancellation_request_status: CancellationRequestStatus::None,
            cancellation_requested_by: None,
            cancellation_requested_at: None,
            cancellation_request_reason: None,
            cancellation_decision: None,
            captain: None,
            trek_details: Some(winter_details(departure, arrival)),
            bookings: sample_ledger(sold_slots, slot_price, policy),
        });
    }

    // Rolling block relative to the clock, arrivals spread across windows.
    let offsets: [i64; 8] = [0, 1, 4, 8, 15, 22, 35, 50];
    for (idx, offset) in offsets.iter().enumerate() {
        let departure = now + Duration::days(*offset);
        let arrival = departure + Duration::days(4);
        let policy = if idx % 2 == 0 {
            CancellationPolicy::Flexible
        } else {
            CancellationPolicy::Standard
        };
        let destination = DESTINATIONS[(idx + 4) % DESTINATIONS.len()];

        let id = format!("TBR-{next_id}");
        next_id += 1;

        records.push(Tbr {
            id,
            trek_name: format!("{destination} Adventure"),
            destination: destination.to_string(),
            operator: operator(idx),
            departure_time: departure,
            arrival_time: arrival,
            sold_slots: 12,
            total_slots: 30,
            slot_price: 6500.0,
            is_cancelled: false,
            is_approved: true,
            cancellation_policy: policy,
            cancellation_policy_desc: format!("{} Policy T&C", policy_name(policy)),
            approval_details: Some(ApprovalSnapshot {
                approved_by: "Admin Alex".to_string(),
                approved_at: now,
                version_hash: Some(format!("VH-NW-{next_id}")),
            }),
            cancellation_request_status: CancellationRequestStatus::None,
            cancellation_requested_by: None,
            cancellation_requested_at: None,
            cancellation_request_reason: None,
            cancellation_decision: None,
            captain: None,
            trek_details: Some(adventure_details(departure, arrival)),
            bookings: sample_ledger(12, 6500.0, policy),
        });
    }

    records
}

/// Generate a booking ledger with a fixed cadence: every third booking takes
/// two slots, the first carries a coupon, even rows add travel insurance and
/// pay in full, and the fifth row is a historical cancellation.
fn sample_ledger(count: u32, slot_price: f64, policy: CancellationPolicy) -> Vec<Booking> {
    (0..count)
        .map(|i| {
            let slots = if i % 3 == 0 { 2 } else { 1 };
            let coupon = if i == 0 { 1000.0 } else { 0.0 };
            let base_fare = slot_price * slots as f64 - coupon;
            let travel_insurance = if i % 2 == 0 { 150.0 } else { 0.0 };

            let sheet = ChargeSheet::compute(&ChargeInputs {
                base_fare,
                slots,
                policy,
                travel_insurance,
                pay_in_full: i % 2 == 0,
            });

            let cancelled = i == 4;
            let refund = to_money(to_decimal(sheet.total_paid) - to_decimal(10.0));

            Booking {
                id: format!("BK{}{}", 700 + i, (b'A' + (i % 26) as u8) as char),
                booked_at: Utc.with_ymd_and_hms(2024, 5, 12, 17, 0, 0).unwrap(),
                traveller_name: TRAVELLERS[i as usize % TRAVELLERS.len()].to_string(),
                traveller_details: "24 / M".to_string(),
                sub_traveller_details: (slots > 1).then(|| "Guest Traveller".to_string()),
                slots,
                coupon_details: (i == 0).then(|| "NEWYEAR (₹1000)".to_string()),
                final_base_fare: sheet.final_base_fare,
                gst5: sheet.gst5,
                pf: sheet.pf,
                ti: sheet.ti,
                ti_policy_id: (travel_insurance > 0.0).then(|| "TI-FLX-R44".to_string()),
                fc: sheet.fc,
                fc_policy_id: (sheet.fc > 0.0).then(|| "FC-STD-P10".to_string()),
                total_paid: sheet.total_paid,
                pending_amount: sheet.pending_amount,
                is_fully_paid: sheet.is_fully_paid,
                comm10: sheet.comm10,
                platform_share: sheet.platform_share,
                get_comm18: sheet.get_comm18,
                get_pf5: sheet.get_pf5,
                tcs1: sheet.tcs1,
                tds1: sheet.tds1,
                taxes: sheet.taxes,
                vendor_share: sheet.vendor_share,
                status: if cancelled {
                    BookingStatus::Cancelled
                } else {
                    BookingStatus::Active
                },
                support_ticket: (i == 2).then(|| SupportTicket {
                    id: format!("HTK-99{i}"),
                    status: TicketStatus::Open,
                    opened_at: Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap(),
                }),
                cxl_id: cancelled.then(|| format!("CXL-{}", 300 + i)),
                cxl_time_slab: cancelled.then(|| ">24H".to_string()),
                refund_amount: cancelled.then_some(refund),
                deduction_amount: cancelled.then_some(10.0),
                cxl_reason: cancelled.then(|| "Personal Emergency".to_string()),
                remarks: None,
            }
        })
        .collect()
}

fn operator(idx: usize) -> Operator {
    let (id, name, rating, review_count) = OPERATORS[idx % OPERATORS.len()];
    Operator {
        id: id.to_string(),
        name: name.to_string(),
        rating,
        review_count,
    }
}

fn policy_name(policy: CancellationPolicy) -> &'static str {
    match policy {
        CancellationPolicy::Standard => "Standard",
        CancellationPolicy::Flexible => "Flexible",
    }
}

fn stage(name: &str, at: DateTime<Utc>, mode: TransportMode) -> RouteStage {
    RouteStage {
        name: name.to_string(),
        location: None,
        date: at.to_rfc3339(),
        time: None,
        mode,
        point: None,
    }
}

fn winter_details(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> TrekDetails {
    TrekDetails {
        operator_contact_number: "+91 99887 76655".to_string(),
        route: TrekRoute {
            departure_stages: vec![stage("Central Point", departure, TransportMode::Bus)],
            meeting_point: stage("Village Entry", departure, TransportMode::Car),
            trek_stages: vec![stage("High Ridge", departure, TransportMode::MiniBus)],
            return_stage: stage("Central Point", arrival, TransportMode::Bus),
        },
        itinerary: vec![ItineraryDay {
            day_number: 1,
            title: "Arrival".to_string(),
            description: "Winter Setup".to_string(),
        }],
        activities: vec![Activity {
            name: "Night Hike".to_string(),
            description: Some("Star Gazing".to_string()),
        }],
        inclusions: vec!["All meals".to_string()],
        exclusions: vec!["Alcohol".to_string()],
        other_policies: vec!["Zero Waste".to_string()],
    }
}

fn adventure_details(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> TrekDetails {
    TrekDetails {
        operator_contact_number: "+91 90000 00001".to_string(),
        route: TrekRoute {
            departure_stages: vec![stage("City Hub", departure, TransportMode::Bus)],
            meeting_point: stage("Base Camp", departure, TransportMode::Car),
            trek_stages: vec![stage("Ridge Cross", departure, TransportMode::MiniBus)],
            return_stage: stage("City Hub", arrival, TransportMode::Bus),
        },
        itinerary: vec![ItineraryDay {
            day_number: 1,
            title: "Day 1".to_string(),
            description: "Start of journey".to_string(),
        }],
        activities: vec![Activity {
            name: "Climbing".to_string(),
            description: Some("Intro session".to_string()),
        }],
        inclusions: vec!["Safety Gear".to_string()],
        exclusions: vec!["Insurance".to_string()],
        other_policies: vec!["Eco-friendly".to_string()],
    }
}

pub mod query;
pub mod record;
pub mod status;

pub use query::{
    pending_request_count, query_inventory, step_anchor, InventoryFilters, TimelineDirection,
    DEFAULT_WINDOW_DAYS,
};
pub use record::{
    Activity, ApprovalSnapshot, Booking, BookingStatus, CancellationDecision, CancellationPolicy,
    CancellationRequestStatus, CaptainAssignment, CaptainPatch, ItineraryDay, Operator, RouteStage,
    SupportTicket, Tbr, TbrPatch, TicketStatus, TransportMode, TrekDetails, TrekRoute, TrekStatus,
};
pub use status::{booking_actions_open, can_cancel_record, derive_status, is_bookable};

pub mod aggregate;
pub mod cancellation;
pub mod charges;
pub mod money;

pub use aggregate::LedgerSummary;
pub use cancellation::{
    finalize_cancellation, preview_cancellation, CancellationError, CancellationMode,
    CancellationProposal,
};
pub use charges::{ChargeInputs, ChargeSheet};

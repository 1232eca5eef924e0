//! Canonical record shapes returned to callers

pub mod fine;
pub mod holding;
pub mod loan;
pub mod outcome;
pub mod patron;
pub mod pickup;
pub mod request;

// Re-export commonly used types
pub use fine::{Fine, FinesSummary};
pub use holding::{HoldType, Holding, ItemStatus};
pub use loan::Loan;
pub use outcome::{CancelBatchResult, CancelOutcome, RenewBatchResult, RenewOutcome, RequestOutcome};
pub use patron::{PatronAccount, PatronProfile};
pub use pickup::PickupLocation;
pub use request::{PatronRequest, RequestType};

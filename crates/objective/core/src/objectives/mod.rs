//! Concrete objectives.
//!
//! - [`RepairScan`]: ambient duty that decomposes into per-target repairs
//! - [`RepairTarget`]: repair one target until it is back at full condition
//! - [`Idle`]: lowest-priority fallback

mod idle;
mod repair_scan;
mod repair_target;

pub use idle::Idle;
pub use repair_scan::{RepairScan, ScanState};
pub use repair_target::RepairTarget;

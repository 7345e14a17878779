//! Hierarchical, priority-driven objective scheduling for autonomous characters.
//!
//! Each character owns an [`ObjectiveManager`]. Every simulation tick the
//! manager scores its top-level [`Objective`]s, picks one winner and lets it
//! make incremental progress. Objectives decompose into sub-objectives at
//! runtime; each parent owns its children exclusively and retires them as they
//! finish or become invalid.
//!
//! - **Cooperative**: one `update` per character per tick, no blocking, no threads
//! - **Deterministic**: identical state yields the identical selection
//! - **Commanded goals win**: the current order preempts emergent priorities
//!
//! # Architecture
//!
//! - [`objective`]: the [`Objective`] contract, [`ObjectiveNode`] and [`SubObjectives`]
//! - [`manager`]: per-character arbitration and generation-checked order handles
//! - [`objectives`]: [`RepairScan`], [`RepairTarget`] and [`Idle`]
//! - [`world`]: the [`TargetIndex`] read/mutation surface and [`WorldTargets`]

pub mod config;
pub mod error;
pub mod handle;
pub mod ids;
pub mod manager;
pub mod objective;
pub mod objectives;
pub mod priority;
pub mod world;

pub use config::SchedulerConfig;
pub use error::{ErrorSeverity, ObjectiveError, SchedulerError, TargetError, report};
pub use handle::ObjectiveHandle;
pub use ids::{CharacterId, FacetId, TargetId};
pub use manager::ObjectiveManager;
pub use objective::{
    ActContext, Objective, ObjectiveNode, ObjectiveSummary, PriorityContext, SubObjectives,
};
pub use objectives::{Idle, RepairScan, RepairTarget, ScanState};
pub use priority::Priority;
pub use world::{RepairFacet, Target, TargetIndex, WorldTargets};

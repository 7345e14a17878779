//! The objective contract.
//!
//! An [`Objective`] is one unit of goal-directed behavior. Objectives never own
//! their children directly: the scheduler wraps every objective in an
//! [`ObjectiveNode`] that carries the owner and a [`SubObjectives`] collection,
//! and hands that collection to the objective whenever it scores or acts.
//!
//! # Capability set
//!
//! - [`Objective::priority`]: desirability this tick; may decompose into children
//! - [`Objective::is_completed`]: the objective's own completion predicate
//! - [`Objective::is_duplicate`]: "same goal" test used for deduplication
//! - [`Objective::act`]: one incremental work step
//!
//! New kinds of behavior are new implementations of this trait.

mod node;

pub use node::{ObjectiveNode, SubObjectives};

use core::any::Any;

use crate::config::SchedulerConfig;
use crate::ids::CharacterId;
use crate::world::TargetIndex;

/// Read-only view handed to [`Objective::priority`].
///
/// Priority evaluation never sees a mutable world, so no objective observes
/// another objective's mutations while the manager is still scoring.
pub struct PriorityContext<'a> {
    pub owner: CharacterId,
    pub world: &'a dyn TargetIndex,
    pub config: &'a SchedulerConfig,
    /// Manager clock in seconds.
    pub clock: f64,
    /// True when the objective being scored is the character's current order.
    pub is_current_order: bool,
}

impl<'a> PriorityContext<'a> {
    pub fn new(owner: CharacterId, world: &'a dyn TargetIndex, config: &'a SchedulerConfig) -> Self {
        Self {
            owner,
            world,
            config,
            clock: 0.0,
            is_current_order: false,
        }
    }

    pub fn at(mut self, clock: f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn ordered(mut self, is_current_order: bool) -> Self {
        self.is_current_order = is_current_order;
        self
    }
}

/// Mutable view handed to [`Objective::act`].
pub struct ActContext<'a> {
    pub owner: CharacterId,
    pub world: &'a mut dyn TargetIndex,
    pub config: &'a SchedulerConfig,
    /// Seconds elapsed since the previous tick.
    pub delta: f32,
}

impl<'a> ActContext<'a> {
    pub fn new(
        owner: CharacterId,
        world: &'a mut dyn TargetIndex,
        config: &'a SchedulerConfig,
        delta: f32,
    ) -> Self {
        Self {
            owner,
            world,
            config,
            delta,
        }
    }
}

/// Read-only descriptive data for display collaborators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectiveSummary {
    pub label: String,
    pub required_skills: Vec<String>,
    pub required_items: Vec<String>,
    /// Children that still have work left.
    pub pending_children: usize,
}

impl ObjectiveSummary {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// True for the neutral value returned by failed queries.
    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

/// A goal-directed unit of character behavior.
pub trait Objective: Any + Send + Sync {
    /// Short identifier used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Computes this objective's current desirability.
    ///
    /// Side effects are allowed (a scan may append children here) but must be
    /// idempotent with respect to already-decomposed state: re-running it must
    /// never duplicate an existing child. When `ctx.is_current_order` is set the
    /// objective should report [`crate::Priority::ORDER`].
    fn priority(&mut self, ctx: &PriorityContext<'_>, children: &mut SubObjectives) -> f32;

    /// The objective's own completion predicate.
    ///
    /// [`ObjectiveNode::is_completed`] never reports completion while a child
    /// is still incomplete, regardless of what this returns.
    fn is_completed(&self) -> bool {
        true
    }

    /// False once the objective can no longer make progress (its target
    /// vanished, someone else took it). Invalid objectives are detached.
    fn is_valid(&self, _owner: CharacterId, _world: &dyn TargetIndex) -> bool {
        true
    }

    /// Default: two objectives of the same concrete type are the same goal.
    fn is_duplicate(&self, other: &dyn Objective) -> bool {
        Any::type_id(self.as_any()) == Any::type_id(other.as_any())
    }

    /// One incremental work step. Called once per tick while this objective
    /// (or one of its ancestors) is the selected driver.
    fn act(&mut self, ctx: &mut ActContext<'_>, children: &mut SubObjectives);

    fn summary(&self) -> ObjectiveSummary {
        ObjectiveSummary::labelled(self.name())
    }

    /// Called once when the objective is detached or torn down, with the
    /// index available so world-side claims can be released.
    fn on_detach(&mut self, _owner: CharacterId, _world: &mut dyn TargetIndex) {}

    fn as_any(&self) -> &dyn Any;
}

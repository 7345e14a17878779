//! Repair one specific target.

use core::any::Any;

use crate::error::{SchedulerError, report};
use crate::ids::{CharacterId, FacetId, TargetId};
use crate::objective::{ActContext, Objective, ObjectiveSummary, PriorityContext, SubObjectives};
use crate::priority::Priority;
use crate::world::{RepairFacet, Target, TargetIndex};

/// Leaf objective spawned by [`super::RepairScan`], one per damaged target.
///
/// Each act claims the target (first act only), restores
/// `repair_rate * delta` condition and, once the target is back at full
/// condition, marks the facet fixed and releases the claim.
#[derive(Clone, Debug)]
pub struct RepairTarget {
    target: TargetId,
    facet: FacetId,
    label: String,
    required_skill: Option<String>,
    required_items: Vec<String>,
    claimed: bool,
    repaired: bool,
    abandoned: bool,
}

impl RepairTarget {
    /// Snapshots the descriptive data of the qualifying facet.
    pub fn new(target: &Target, facet: FacetId, details: &RepairFacet) -> Self {
        Self {
            target: target.id,
            facet,
            label: format!("Repair {} ({})", target.name, details.name),
            required_skill: details.required_skill.clone(),
            required_items: details.required_items.clone(),
            claimed: false,
            repaired: false,
            abandoned: false,
        }
    }

    #[inline]
    pub fn target(&self) -> TargetId {
        self.target
    }

    #[inline]
    pub fn facet(&self) -> FacetId {
        self.facet
    }

    #[inline]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    fn abandon<E: SchedulerError>(&mut self, owner: CharacterId, err: &E) {
        report(err);
        tracing::debug!(character = %owner, target = %self.target, "repair abandoned");
        self.abandoned = true;
    }
}

impl Objective for RepairTarget {
    fn name(&self) -> &'static str {
        "repair_target"
    }

    /// Scales with damage: `baseline + missing / FULL_CONDITION`.
    fn priority(&mut self, ctx: &PriorityContext<'_>, _children: &mut SubObjectives) -> f32 {
        if self.abandoned || self.repaired {
            return Priority::NONE;
        }
        if ctx.is_current_order {
            return Priority::ORDER;
        }
        match ctx.world.get(self.target) {
            Some(target) => {
                let missing = Target::FULL_CONDITION - target.condition;
                ctx.config.baseline_priority + missing / Target::FULL_CONDITION
            }
            None => Priority::NONE,
        }
    }

    fn is_completed(&self) -> bool {
        self.repaired
    }

    fn is_valid(&self, owner: CharacterId, world: &dyn TargetIndex) -> bool {
        !self.abandoned
            && world
                .get(self.target)
                .is_some_and(|target| target.is_claimable_by(owner))
    }

    /// Same goal when it is about the same target.
    fn is_duplicate(&self, other: &dyn Objective) -> bool {
        other
            .as_any()
            .downcast_ref::<RepairTarget>()
            .is_some_and(|other| other.target == self.target)
    }

    fn act(&mut self, ctx: &mut ActContext<'_>, _children: &mut SubObjectives) {
        if self.repaired || self.abandoned {
            return;
        }

        if !self.claimed {
            if let Err(err) = ctx.world.claim(self.target, ctx.owner) {
                self.abandon(ctx.owner, &err);
                return;
            }
            self.claimed = true;
        }

        let condition = match ctx.world.repair(self.target, ctx.config.repair_rate * ctx.delta) {
            Ok(condition) => condition,
            Err(err) => {
                self.claimed = false;
                self.abandon(ctx.owner, &err);
                return;
            }
        };

        tracing::trace!(character = %ctx.owner, target = %self.target, condition, "repairing");
        if condition < Target::FULL_CONDITION {
            return;
        }

        if let Err(err) = ctx.world.mark_fixed(self.target, self.facet) {
            report(&err);
        }
        if let Err(err) = ctx.world.release(self.target, ctx.owner) {
            report(&err);
        }
        self.claimed = false;
        self.repaired = true;
        tracing::debug!(character = %ctx.owner, target = %self.target, "repair finished");
    }

    fn summary(&self) -> ObjectiveSummary {
        ObjectiveSummary {
            label: self.label.clone(),
            required_skills: self.required_skill.iter().cloned().collect(),
            required_items: self.required_items.clone(),
            pending_children: 0,
        }
    }

    fn on_detach(&mut self, owner: CharacterId, world: &mut dyn TargetIndex) {
        if !self.claimed {
            return;
        }
        self.claimed = false;
        if let Err(err) = world.release(self.target, owner) {
            report(&err);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

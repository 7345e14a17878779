//! Ambient duty: find damaged targets and queue repair work for them.

use core::any::Any;

use super::RepairTarget;
use crate::ids::{CharacterId, FacetId};
use crate::objective::{ActContext, Objective, ObjectiveSummary, PriorityContext, SubObjectives};
use crate::priority::Priority;
use crate::world::{Target, TargetIndex};

/// Where the scan duty currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Delegating,
}

/// Perpetual objective that decomposes into one [`RepairTarget`] per
/// damaged, unclaimed target.
///
/// Scanning piggybacks on priority evaluation. Two knobs bound its cost:
/// results are reused until `scan_interval` seconds of manager clock have
/// passed, and each scan examines at most `scan_budget` targets, resuming
/// from where the previous scan stopped.
#[derive(Clone, Debug, Default)]
pub struct RepairScan {
    state: ScanState,
    cursor: usize,
    last_scan: Option<f64>,
}

impl RepairScan {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    fn scan_due(&self, clock: f64, interval: f64) -> bool {
        match self.last_scan {
            None => true,
            Some(last) => clock - last >= interval,
        }
    }

    /// Examines up to `budget` targets (`0` = all) and queues repair work for
    /// the qualifying ones. Returns how many children were added.
    pub fn scan(
        &mut self,
        owner: CharacterId,
        world: &dyn TargetIndex,
        budget: usize,
        children: &mut SubObjectives,
    ) -> usize {
        self.state = ScanState::Scanning;

        let targets = world.list_all();
        if targets.is_empty() {
            self.cursor = 0;
            return 0;
        }

        let examined = if budget == 0 {
            targets.len()
        } else {
            budget.min(targets.len())
        };
        let start = self.cursor % targets.len();

        let mut added = 0;
        for step in 0..examined {
            let target = &targets[(start + step) % targets.len()];
            if let Some(repair) = Self::qualify(owner, target) {
                if children.add(repair) {
                    added += 1;
                }
            }
        }
        self.cursor = (start + examined) % targets.len();

        tracing::trace!(character = %owner, examined, added, "repair scan");
        added
    }

    /// First qualifying facet wins; at most one repair per target.
    fn qualify(owner: CharacterId, target: &Target) -> Option<RepairTarget> {
        if !target.is_damaged() || !target.is_claimable_by(owner) {
            return None;
        }

        target
            .facets
            .iter()
            .enumerate()
            .find(|(_, facet)| !facet.is_fixed && target.condition <= facet.show_repair_threshold)
            .map(|(index, facet)| RepairTarget::new(target, FacetId(index as u16), facet))
    }

    fn settle(&mut self, children: &SubObjectives) {
        self.state = if children.is_empty() {
            ScanState::Idle
        } else {
            ScanState::Delegating
        };
    }
}

impl Objective for RepairScan {
    fn name(&self) -> &'static str {
        "repair_scan"
    }

    /// Baseline priority, or [`Priority::ORDER`] when ordered with work pending.
    fn priority(&mut self, ctx: &PriorityContext<'_>, children: &mut SubObjectives) -> f32 {
        if self.scan_due(ctx.clock, ctx.config.scan_interval) {
            self.scan(ctx.owner, ctx.world, ctx.config.scan_budget, children);
            self.last_scan = Some(ctx.clock);
        }
        self.settle(children);

        if ctx.is_current_order && children.pending_count(ctx.world) > 0 {
            Priority::ORDER
        } else {
            ctx.config.baseline_priority
        }
    }

    /// Ambient duty; never retires on its own.
    fn is_completed(&self) -> bool {
        false
    }

    fn act(&mut self, ctx: &mut ActContext<'_>, children: &mut SubObjectives) {
        children.drive(ctx);
        self.settle(children);
    }

    fn summary(&self) -> ObjectiveSummary {
        ObjectiveSummary::labelled("Repair damaged targets")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::ids::TargetId;
    use crate::objective::ObjectiveNode;
    use crate::world::{RepairFacet, WorldTargets};

    const CREW: CharacterId = CharacterId(1);

    fn scan_once(node: &mut ObjectiveNode, world: &WorldTargets, config: &SchedulerConfig) -> f32 {
        let ctx = PriorityContext::new(CREW, world, config);
        node.priority(&ctx)
    }

    fn damaged(id: u32, condition: f32) -> Target {
        Target::new(TargetId(id), format!("Target {id}"), condition)
    }

    #[test]
    fn full_condition_targets_are_skipped() {
        let config = SchedulerConfig::uncached();
        let world = WorldTargets::new(vec![
            damaged(1, 100.0).with_facet(RepairFacet::new("Panel", 100.0)),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert!(node.children().is_empty());
    }

    #[test]
    fn fixed_facets_are_skipped() {
        let config = SchedulerConfig::uncached();
        let world = WorldTargets::new(vec![
            damaged(1, 20.0).with_facet(RepairFacet::new("Panel", 50.0).fixed()),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert!(node.children().is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let config = SchedulerConfig::uncached();
        let mut world = WorldTargets::new(vec![
            damaged(1, 50.5).with_facet(RepairFacet::new("Panel", 50.0)),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert!(node.children().is_empty());

        world.damage(TargetId(1), 0.5).unwrap();
        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn first_qualifying_facet_wins() {
        let config = SchedulerConfig::uncached();
        let world = WorldTargets::new(vec![
            damaged(1, 30.0)
                .with_facet(RepairFacet::new("Casing", 50.0).fixed())
                .with_facet(RepairFacet::new("Wiring", 40.0))
                .with_facet(RepairFacet::new("Valves", 60.0)),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 1);
        let repair = node.children().current().unwrap().downcast_ref::<RepairTarget>().unwrap();
        assert_eq!(repair.facet(), FacetId(1));
    }

    #[test]
    fn targets_claimed_by_others_are_skipped() {
        let config = SchedulerConfig::uncached();
        let mut world = WorldTargets::new(vec![
            damaged(1, 30.0).with_facet(RepairFacet::new("Panel", 50.0)),
        ]);
        world.claim(TargetId(1), CharacterId(9)).unwrap();
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert!(node.children().is_empty());
    }

    #[test]
    fn rescans_do_not_duplicate_children() {
        let config = SchedulerConfig::uncached();
        let world = WorldTargets::new(vec![
            damaged(1, 30.0).with_facet(RepairFacet::new("Panel", 50.0)),
            damaged(2, 10.0).with_facet(RepairFacet::new("Panel", 50.0)),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        for _ in 0..3 {
            scan_once(&mut node, &world, &config);
        }
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.downcast_ref::<RepairScan>().unwrap().state(), ScanState::Delegating);
    }

    #[test]
    fn budget_resumes_where_previous_scan_stopped() {
        let config = SchedulerConfig::uncached().with_scan_budget(2);
        let world = WorldTargets::new(
            (1..=5)
                .map(|id| damaged(id, 10.0).with_facet(RepairFacet::new("Panel", 50.0)))
                .collect(),
        );
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 2);
        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 4);
        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 5);
    }

    #[test]
    fn cached_scan_waits_for_interval() {
        let config = SchedulerConfig::new().with_scan_interval(1.0).with_scan_budget(0);
        let mut world = WorldTargets::new(vec![damaged(1, 100.0).with_facet(RepairFacet::new("Panel", 50.0))]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        node.priority(&PriorityContext::new(CREW, &world, &config).at(0.0));
        world.damage(TargetId(1), 80.0).unwrap();

        node.priority(&PriorityContext::new(CREW, &world, &config).at(0.5));
        assert!(node.children().is_empty());

        node.priority(&PriorityContext::new(CREW, &world, &config).at(1.0));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn any_two_scans_are_duplicates() {
        let mut busy = RepairScan::new();
        busy.state = ScanState::Delegating;
        busy.cursor = 3;

        assert!(RepairScan::new().is_duplicate(&busy));
        assert!(busy.is_duplicate(&RepairScan::new()));
    }

    #[test]
    fn never_completes_even_without_work() {
        let node = ObjectiveNode::new(CREW, RepairScan::new());
        assert!(!node.is_completed());
    }

    #[test]
    fn ordered_priority_requires_pending_work() {
        let config = SchedulerConfig::uncached();
        let mut world = WorldTargets::default();
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        let ordered = PriorityContext::new(CREW, &world, &config).ordered(true);
        assert_eq!(node.priority(&ordered), config.baseline_priority);

        world.insert(damaged(1, 40.0).with_facet(RepairFacet::new("Panel", 50.0)));
        let ordered = PriorityContext::new(CREW, &world, &config).ordered(true);
        assert_eq!(node.priority(&ordered), Priority::ORDER);
    }

    #[test]
    fn ordered_priority_ignores_children_that_went_invalid() {
        let config = SchedulerConfig::new().with_scan_interval(10.0);
        let mut world = WorldTargets::new(vec![
            damaged(1, 40.0).with_facet(RepairFacet::new("Panel", 50.0)),
        ]);
        let mut node = ObjectiveNode::new(CREW, RepairScan::new());

        scan_once(&mut node, &world, &config);
        assert_eq!(node.children().len(), 1);

        world.claim(TargetId(1), CharacterId(9)).unwrap();
        assert_eq!(node.children().pending_count(&world), 0);

        // Still inside the cache window, so the stale child is not rescanned away.
        let ordered = PriorityContext::new(CREW, &world, &config).at(1.0).ordered(true);
        assert_eq!(node.priority(&ordered), config.baseline_priority);
    }
}

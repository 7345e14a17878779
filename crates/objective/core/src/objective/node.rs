//! Ownership and bookkeeping for objective trees.

use super::{ActContext, Objective, ObjectiveSummary, PriorityContext};
use crate::ids::CharacterId;
use crate::world::TargetIndex;

/// An objective together with its owner and its exclusively owned children.
///
/// Dropping a node drops its whole subtree. [`ObjectiveNode::detach`] is the
/// orderly path: it gives every objective in the subtree a chance to release
/// world-side claims first.
pub struct ObjectiveNode {
    owner: CharacterId,
    objective: Box<dyn Objective>,
    children: SubObjectives,
}

impl ObjectiveNode {
    pub fn new<O: Objective>(owner: CharacterId, objective: O) -> Self {
        Self::boxed(owner, Box::new(objective))
    }

    pub fn boxed(owner: CharacterId, objective: Box<dyn Objective>) -> Self {
        Self {
            owner,
            objective,
            children: SubObjectives::new(owner),
        }
    }

    #[inline]
    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.objective.name()
    }

    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    pub fn downcast_ref<O: Objective>(&self) -> Option<&O> {
        self.objective.as_any().downcast_ref::<O>()
    }

    pub fn children(&self) -> &SubObjectives {
        &self.children
    }

    /// Never true while a child still has work left.
    pub fn is_completed(&self) -> bool {
        !self.children.has_incomplete() && self.objective.is_completed()
    }

    pub fn is_valid(&self, world: &dyn TargetIndex) -> bool {
        self.objective.is_valid(self.owner, world)
    }

    pub fn is_duplicate(&self, other: &dyn Objective) -> bool {
        self.objective.is_duplicate(other)
    }

    pub fn priority(&mut self, ctx: &PriorityContext<'_>) -> f32 {
        self.objective.priority(ctx, &mut self.children)
    }

    pub fn act(&mut self, ctx: &mut ActContext<'_>) {
        self.objective.act(ctx, &mut self.children);
    }

    /// Dedup chokepoint: inserts `child` unless a duplicate is already present.
    pub fn add_sub_objective<O: Objective>(&mut self, child: O) -> bool {
        self.children.add(child)
    }

    /// Own summary, enriched with the current child's requirements.
    pub fn summary(&self) -> ObjectiveSummary {
        let mut summary = self.objective.summary();
        if let Some(current) = self.children.current() {
            let child = current.summary();
            for skill in child.required_skills {
                if !summary.required_skills.contains(&skill) {
                    summary.required_skills.push(skill);
                }
            }
            for item in child.required_items {
                if !summary.required_items.contains(&item) {
                    summary.required_items.push(item);
                }
            }
        }
        summary.pending_children = self.children.live_count();
        summary
    }

    /// Detaches completed or invalid descendants at every depth.
    pub fn prune_children(&mut self, world: &mut dyn TargetIndex) -> usize {
        self.children.prune_tree(world)
    }

    /// Tears the subtree down leaf-first, releasing world-side state.
    pub fn detach(mut self, world: &mut dyn TargetIndex) {
        self.children.detach_all(world);
        self.objective.on_detach(self.owner, world);
    }
}

impl core::fmt::Debug for ObjectiveNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectiveNode")
            .field("owner", &self.owner)
            .field("objective", &self.name())
            .field("children", &self.children.len())
            .finish()
    }
}

/// Ordered children of one objective. The first entry is the current child.
#[derive(Debug)]
pub struct SubObjectives {
    owner: CharacterId,
    nodes: Vec<ObjectiveNode>,
}

impl SubObjectives {
    pub fn new(owner: CharacterId) -> Self {
        Self {
            owner,
            nodes: Vec::new(),
        }
    }

    pub fn add<O: Objective>(&mut self, child: O) -> bool {
        self.add_boxed(Box::new(child))
    }

    /// Appends `child` unless an existing child is its duplicate, in which
    /// case the new instance is dropped and `false` is returned.
    pub fn add_boxed(&mut self, child: Box<dyn Objective>) -> bool {
        if self.nodes.iter().any(|node| node.is_duplicate(child.as_ref())) {
            tracing::trace!(
                character = %self.owner,
                objective = child.name(),
                "duplicate sub-objective rejected"
            );
            return false;
        }

        tracing::debug!(
            character = %self.owner,
            objective = child.name(),
            position = self.nodes.len(),
            "sub-objective added"
        );
        self.nodes.push(ObjectiveNode::boxed(self.owner, child));
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectiveNode> {
        self.nodes.iter()
    }

    pub fn current(&self) -> Option<&ObjectiveNode> {
        self.nodes.first()
    }

    /// Children that are not yet completed.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|node| !node.is_completed()).count()
    }

    pub fn has_incomplete(&self) -> bool {
        self.nodes.iter().any(|node| !node.is_completed())
    }

    /// Children that still have work left and can still make progress in
    /// `world`. Unlike [`SubObjectives::live_count`] this ignores children
    /// that went invalid since the last prune.
    pub fn pending_count(&self, world: &dyn TargetIndex) -> usize {
        self.nodes
            .iter()
            .filter(|node| !node.is_completed() && node.is_valid(world))
            .count()
    }

    /// Prunes every level of the subtree, deepest first, so a parent is
    /// judged only after its own children were settled.
    pub fn prune_tree(&mut self, world: &mut dyn TargetIndex) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            removed += node.children.prune_tree(world);
        }
        removed + self.prune(world)
    }

    /// Detaches every completed or invalid child. Returns how many were removed.
    pub fn prune(&mut self, world: &mut dyn TargetIndex) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.nodes.len() {
            let node = &self.nodes[index];
            let completed = node.is_completed();
            if completed || !node.is_valid(&*world) {
                let node = self.nodes.remove(index);
                tracing::debug!(
                    character = %self.owner,
                    objective = node.name(),
                    completed,
                    "sub-objective detached"
                );
                node.detach(world);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Delegates one tick of work to the current child.
    ///
    /// Stale children are pruned first; the child that acts is detached right
    /// away if that act completed it. Returns false when no child was left.
    pub fn drive(&mut self, ctx: &mut ActContext<'_>) -> bool {
        self.prune(&mut *ctx.world);

        let Some(current) = self.nodes.first_mut() else {
            return false;
        };
        current.act(ctx);

        if current.is_completed() {
            let node = self.nodes.remove(0);
            tracing::debug!(
                character = %self.owner,
                objective = node.name(),
                "sub-objective finished"
            );
            node.detach(&mut *ctx.world);
        }
        true
    }

    pub(crate) fn detach_all(&mut self, world: &mut dyn TargetIndex) {
        for node in self.nodes.drain(..) {
            node.detach(world);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::any::Any;

    use super::*;
    use crate::config::SchedulerConfig;
    use crate::world::WorldTargets;

    /// Leaf that needs a fixed number of acts.
    struct Steps {
        key: u32,
        remaining: u32,
    }

    impl Steps {
        fn new(key: u32, remaining: u32) -> Self {
            Self { key, remaining }
        }
    }

    impl Objective for Steps {
        fn name(&self) -> &'static str {
            "steps"
        }

        fn priority(&mut self, _ctx: &PriorityContext<'_>, _children: &mut SubObjectives) -> f32 {
            1.0
        }

        fn is_completed(&self) -> bool {
            self.remaining == 0
        }

        fn is_duplicate(&self, other: &dyn Objective) -> bool {
            other
                .as_any()
                .downcast_ref::<Steps>()
                .is_some_and(|other| other.key == self.key)
        }

        fn act(&mut self, _ctx: &mut ActContext<'_>, _children: &mut SubObjectives) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Parent that only delegates.
    struct Delegate;

    impl Objective for Delegate {
        fn name(&self) -> &'static str {
            "delegate"
        }

        fn priority(&mut self, _ctx: &PriorityContext<'_>, _children: &mut SubObjectives) -> f32 {
            1.0
        }

        fn act(&mut self, ctx: &mut ActContext<'_>, children: &mut SubObjectives) {
            children.drive(ctx);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn duplicate_child_does_not_grow_collection() {
        let mut node = ObjectiveNode::new(CharacterId(1), Delegate);

        assert!(node.add_sub_objective(Steps::new(1, 2)));
        assert!(!node.add_sub_objective(Steps::new(1, 5)));
        assert!(node.add_sub_objective(Steps::new(2, 2)));
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn parent_with_incomplete_child_is_not_completed() {
        let mut node = ObjectiveNode::new(CharacterId(1), Delegate);
        assert!(node.is_completed());

        node.add_sub_objective(Steps::new(1, 1));
        assert!(!node.is_completed());
        assert_eq!(node.children().live_count(), 1);
    }

    #[test]
    fn drive_acts_only_the_current_child_and_detaches_it_when_done() {
        let config = SchedulerConfig::default();
        let mut world = WorldTargets::default();
        let mut node = ObjectiveNode::new(CharacterId(1), Delegate);
        node.add_sub_objective(Steps::new(1, 1));
        node.add_sub_objective(Steps::new(2, 2));

        let mut ctx = ActContext::new(CharacterId(1), &mut world, &config, 0.1);
        node.act(&mut ctx);
        assert_eq!(node.children().len(), 1);
        let remaining = node.children().current().unwrap().downcast_ref::<Steps>().unwrap();
        assert_eq!(remaining.key, 2);
        assert_eq!(remaining.remaining, 2);

        node.act(&mut ctx);
        node.act(&mut ctx);
        assert!(node.children().is_empty());
        assert!(node.is_completed());
    }

    #[test]
    fn completion_implies_no_live_children() {
        let config = SchedulerConfig::default();
        let mut world = WorldTargets::default();
        let mut node = ObjectiveNode::new(CharacterId(4), Delegate);
        for key in 0..4 {
            node.add_sub_objective(Steps::new(key, key % 3 + 1));
        }

        let mut ctx = ActContext::new(CharacterId(4), &mut world, &config, 0.1);
        for _ in 0..16 {
            if node.is_completed() {
                assert_eq!(node.children().live_count(), 0);
            }
            node.act(&mut ctx);
        }
        assert!(node.is_completed());
    }

    #[test]
    fn summary_counts_pending_children() {
        let mut node = ObjectiveNode::new(CharacterId(1), Delegate);
        node.add_sub_objective(Steps::new(1, 1));
        node.add_sub_objective(Steps::new(2, 1));

        let summary = node.summary();
        assert_eq!(summary.label, "delegate");
        assert_eq!(summary.pending_children, 2);
    }
}

//! Per-character objective arbitration.
//!
//! # Tick pipeline
//!
//! Every [`ObjectiveManager::update`] runs the same four steps:
//!
//! 1. **Release**: objectives removed since the last tick release their claims
//! 2. **Prune**: completed or invalid objectives are torn down, sub-objectives
//!    first and then the top level
//! 3. **Evaluate**: every survivor is scored against a read-only world
//! 4. **Act**: exactly one winner gets its incremental [`Objective::act`] call
//!
//! Pruning happens before arbitration, so a just-completed objective never
//! receives one extra act.
//!
//! # Selection
//!
//! The live current order always wins. Otherwise the highest priority wins,
//! and among equal priorities the objective added first wins.

use crate::config::SchedulerConfig;
use crate::error::{ObjectiveError, report};
use crate::handle::{Arena, ObjectiveHandle};
use crate::ids::CharacterId;
use crate::objective::{ActContext, Objective, ObjectiveNode, ObjectiveSummary, PriorityContext};
use crate::priority::Priority;
use crate::world::TargetIndex;

struct ActiveObjective {
    node: ObjectiveNode,
    /// Priority from the most recent evaluation pass; `None` until scored.
    priority: Option<f32>,
}

/// Owns and arbitrates the top-level objectives of one character.
///
/// Objectives removed or evicted between ticks keep their world-side claims
/// until the next [`update`](Self::update), [`release_retired`](Self::release_retired)
/// or [`teardown`](Self::teardown). Dropping a manager without one of those
/// leaves such claims in the index.
pub struct ObjectiveManager {
    character: CharacterId,
    config: SchedulerConfig,
    objectives: Arena<ActiveObjective>,
    /// Live handles in insertion order; drives deterministic tie-breaking.
    insertion: Vec<ObjectiveHandle>,
    current_order: Option<ObjectiveHandle>,
    selected: Option<ObjectiveHandle>,
    /// Removed outside of `update`; released through the index next tick.
    retired: Vec<ObjectiveNode>,
    clock: f64,
}

impl ObjectiveManager {
    pub fn new(character: CharacterId, config: SchedulerConfig) -> Self {
        Self {
            character,
            config,
            objectives: Arena::new(),
            insertion: Vec::new(),
            current_order: None,
            selected: None,
            retired: Vec::new(),
            clock: 0.0,
        }
    }

    #[inline]
    pub fn character(&self) -> CharacterId {
        self.character
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Seconds accumulated over all updates.
    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.len() == 0
    }

    /// Live handles in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = ObjectiveHandle> + '_ {
        self.insertion.iter().copied()
    }

    pub fn contains(&self, handle: ObjectiveHandle) -> bool {
        self.objectives.contains(handle)
    }

    pub fn objective(&self, handle: ObjectiveHandle) -> Option<&ObjectiveNode> {
        self.objectives.get(handle).map(|active| &active.node)
    }

    /// Priority recorded for `handle` during the last evaluation pass.
    pub fn priority_of(&self, handle: ObjectiveHandle) -> Option<f32> {
        self.objectives.get(handle).and_then(|active| active.priority)
    }

    /// Objective that acted during the last update.
    pub fn selected(&self) -> Option<ObjectiveHandle> {
        self.selected.filter(|handle| self.objectives.contains(*handle))
    }

    /// Adds a top-level objective.
    ///
    /// If an active objective is already a duplicate of `objective`, the new
    /// instance is dropped and the existing handle is returned. When the active
    /// set is full, the lowest-priority objective that is not the current order
    /// is evicted first.
    pub fn add_objective<O: Objective>(&mut self, objective: O) -> ObjectiveHandle {
        self.add_boxed(Box::new(objective))
    }

    pub fn add_boxed(&mut self, objective: Box<dyn Objective>) -> ObjectiveHandle {
        if let Some(existing) = self.find_duplicate(objective.as_ref()) {
            tracing::trace!(
                character = %self.character,
                objective = objective.name(),
                "duplicate objective rejected"
            );
            return existing;
        }

        if self.objectives.len() >= self.config.max_active_objectives {
            self.evict_one();
        }

        let name = objective.name();
        let handle = self.objectives.insert(ActiveObjective {
            node: ObjectiveNode::boxed(self.character, objective),
            priority: None,
        });
        self.insertion.push(handle);
        tracing::debug!(character = %self.character, objective = name, ?handle, "objective added");
        handle
    }

    /// Removes a top-level objective and its subtree. World-side claims are
    /// released during the next update, or right away through
    /// [`release_retired`](Self::release_retired).
    pub fn remove_objective(&mut self, handle: ObjectiveHandle) -> bool {
        match self.take(handle) {
            Some(node) => {
                tracing::debug!(character = %self.character, objective = node.name(), ?handle, "objective removed");
                self.retired.push(node);
                true
            }
            None => false,
        }
    }

    /// Releases the claims of objectives removed or evicted since the last
    /// update. Returns how many objectives were released.
    pub fn release_retired(&mut self, world: &mut dyn TargetIndex) -> usize {
        let released = self.retired.len();
        for node in self.retired.drain(..) {
            node.detach(&mut *world);
        }
        released
    }

    /// Designates `handle` as the current order.
    ///
    /// The manager does not own the order: if the objective disappears the
    /// reference simply stops resolving.
    pub fn set_order(&mut self, handle: ObjectiveHandle) {
        if !self.objectives.contains(handle) {
            tracing::debug!(character = %self.character, ?handle, "order set on objective that is not live");
        }
        self.current_order = Some(handle);
    }

    pub fn clear_order(&mut self) {
        self.current_order = None;
    }

    /// Adds `objective` (or finds its active duplicate) and makes it the order.
    pub fn issue_order<O: Objective>(&mut self, objective: O) -> ObjectiveHandle {
        let handle = self.add_objective(objective);
        self.set_order(handle);
        handle
    }

    /// The current order, or `None` if it was never set or no longer resolves.
    pub fn current_order(&self) -> Option<ObjectiveHandle> {
        self.current_order.filter(|handle| self.objectives.contains(*handle))
    }

    /// Runs one tick: release, prune, evaluate, act. Returns the objective
    /// that acted, if any.
    pub fn update(
        &mut self,
        delta: f32,
        world: &mut dyn TargetIndex,
    ) -> Option<ObjectiveHandle> {
        self.clock += f64::from(delta.max(0.0));

        self.release_retired(&mut *world);
        self.prune(&mut *world);

        let order = self.current_order();
        if self.current_order.is_some() && order.is_none() {
            tracing::debug!(character = %self.character, "dangling order treated as no order");
            self.current_order = None;
        }

        self.evaluate(&*world, order);

        let winner = order.or_else(|| self.best_organic());
        self.selected = winner;
        let handle = winner?;

        let Some(active) = self.objectives.get_mut(handle) else {
            return None;
        };
        tracing::debug!(
            character = %self.character,
            objective = active.node.name(),
            priority = active.priority.unwrap_or(Priority::NONE),
            ordered = order == Some(handle),
            "objective selected"
        );

        let mut ctx = ActContext::new(self.character, world, &self.config, delta);
        active.node.act(&mut ctx);
        Some(handle)
    }

    /// Tears down every objective, releasing all claims.
    pub fn teardown(&mut self, world: &mut dyn TargetIndex) {
        self.release_retired(&mut *world);
        for handle in std::mem::take(&mut self.insertion) {
            if let Some(active) = self.objectives.remove(handle) {
                active.node.detach(&mut *world);
            }
        }
        self.current_order = None;
        self.selected = None;
    }

    /// Descriptive data for display, as of the last update. Unknown handles
    /// log a diagnostic and yield an empty summary.
    pub fn describe(&self, handle: ObjectiveHandle) -> ObjectiveSummary {
        self.try_describe(handle).unwrap_or_else(|err| {
            report(&err);
            ObjectiveSummary::default()
        })
    }

    pub fn try_describe(&self, handle: ObjectiveHandle) -> Result<ObjectiveSummary, ObjectiveError> {
        self.objectives
            .get(handle)
            .map(|active| active.node.summary())
            .ok_or(ObjectiveError::UnknownObjective {
                character: self.character,
                handle,
            })
    }

    /// Summary of the objective that acted last tick.
    pub fn describe_selected(&self) -> ObjectiveSummary {
        match self.selected() {
            Some(handle) => self.describe(handle),
            None => {
                report(&ObjectiveError::NothingSelected {
                    character: self.character,
                });
                ObjectiveSummary::default()
            }
        }
    }

    fn find_duplicate(&self, objective: &dyn Objective) -> Option<ObjectiveHandle> {
        self.insertion.iter().copied().find(|handle| {
            self.objectives
                .get(*handle)
                .is_some_and(|active| active.node.is_duplicate(objective))
        })
    }

    fn take(&mut self, handle: ObjectiveHandle) -> Option<ObjectiveNode> {
        let active = self.objectives.remove(handle)?;
        self.insertion.retain(|h| *h != handle);
        if self.selected == Some(handle) {
            self.selected = None;
        }
        Some(active.node)
    }

    /// Evicts the lowest-scored objective other than the order. Objectives
    /// that were never scored rank above every scored one, oldest first.
    fn evict_one(&mut self) {
        let order = self.current_order();
        let candidates: Vec<(ObjectiveHandle, Option<f32>)> = self
            .insertion
            .iter()
            .copied()
            .filter(|handle| Some(*handle) != order)
            .filter_map(|handle| Some((handle, self.objectives.get(handle)?.priority)))
            .collect();

        // Strict comparison keeps the oldest among equals.
        let victim = candidates
            .iter()
            .filter_map(|&(handle, priority)| Some((handle, priority?)))
            .fold(None, |lowest: Option<(ObjectiveHandle, f32)>, (handle, priority)| match lowest {
                Some((_, low)) if low <= priority => lowest,
                _ => Some((handle, priority)),
            })
            .or_else(|| {
                candidates
                    .first()
                    .map(|&(handle, _)| (handle, Priority::NONE))
            });

        match victim {
            Some((handle, priority)) => {
                if let Some(node) = self.take(handle) {
                    tracing::debug!(
                        character = %self.character,
                        objective = node.name(),
                        priority,
                        "objective evicted"
                    );
                    self.retired.push(node);
                }
            }
            None => tracing::warn!(
                character = %self.character,
                capacity = self.config.max_active_objectives,
                "active set full and nothing evictable"
            ),
        }
    }

    fn prune(&mut self, world: &mut dyn TargetIndex) {
        for &handle in &self.insertion {
            if let Some(active) = self.objectives.get_mut(handle) {
                active.node.prune_children(&mut *world);
            }
        }

        let stale: Vec<ObjectiveHandle> = self
            .insertion
            .iter()
            .copied()
            .filter(|handle| {
                self.objectives.get(*handle).is_some_and(|active| {
                    active.node.is_completed() || !active.node.is_valid(&*world)
                })
            })
            .collect();

        for handle in stale {
            if let Some(node) = self.take(handle) {
                tracing::debug!(character = %self.character, objective = node.name(), ?handle, "objective pruned");
                node.detach(&mut *world);
            }
        }
    }

    fn evaluate(&mut self, world: &dyn TargetIndex, order: Option<ObjectiveHandle>) {
        for &handle in &self.insertion {
            let Some(active) = self.objectives.get_mut(handle) else {
                continue;
            };
            let is_order = order == Some(handle);
            let ctx = PriorityContext {
                owner: self.character,
                world,
                config: &self.config,
                clock: self.clock,
                is_current_order: is_order,
            };

            let raw = active.node.priority(&ctx);
            active.priority = Some(if !raw.is_finite() {
                report(&ObjectiveError::InvalidPriority {
                    character: self.character,
                    objective: active.node.name(),
                });
                Priority::NONE
            } else if is_order {
                raw
            } else {
                if raw > Priority::MAX_ORGANIC {
                    tracing::warn!(
                        character = %self.character,
                        objective = active.node.name(),
                        priority = raw,
                        "organic priority clamped"
                    );
                }
                Priority::clamp_organic(raw)
            });
        }
    }

    /// Highest priority wins; the earliest insertion wins ties.
    fn best_organic(&self) -> Option<ObjectiveHandle> {
        let mut best: Option<(ObjectiveHandle, f32)> = None;
        for &handle in &self.insertion {
            let Some(active) = self.objectives.get(handle) else {
                continue;
            };
            let priority = active.priority.unwrap_or(Priority::NONE);
            match best {
                Some((_, best_priority)) if best_priority >= priority => {}
                _ => best = Some((handle, priority)),
            }
        }
        best.map(|(handle, _)| handle)
    }
}

impl core::fmt::Debug for ObjectiveManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectiveManager")
            .field("character", &self.character)
            .field("objectives", &self.objectives.len())
            .field("current_order", &self.current_order)
            .field("selected", &self.selected)
            .field("clock", &self.clock)
            .finish()
    }
}

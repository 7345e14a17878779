//! Crew tick loop.

use objective_core::{
    CharacterId, Idle, ObjectiveHandle, ObjectiveManager, RepairScan, SchedulerConfig, TargetIndex,
    WorldTargets,
};

use crate::config::SimConfig;

struct CrewMember {
    manager: ObjectiveManager,
    last_selected: Option<ObjectiveHandle>,
}

/// A crew of characters sharing one world.
pub struct Simulation {
    sim: SimConfig,
    world: WorldTargets,
    crew: Vec<CrewMember>,
    tick: u32,
}

impl Simulation {
    /// Every character starts with the repair duty and an idle fallback.
    pub fn new(sim: SimConfig, scheduler: SchedulerConfig, world: WorldTargets) -> Self {
        let crew = (1..=sim.crew)
            .map(|id| {
                let mut manager = ObjectiveManager::new(CharacterId(id), scheduler.clone());
                manager.add_objective(RepairScan::new());
                manager.add_objective(Idle::new());
                CrewMember {
                    manager,
                    last_selected: None,
                }
            })
            .collect();

        Self {
            sim,
            world,
            crew,
            tick: 0,
        }
    }

    #[cfg(test)]
    pub fn world(&self) -> &WorldTargets {
        &self.world
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[cfg(test)]
    pub fn manager(&self, character: CharacterId) -> Option<&ObjectiveManager> {
        self.crew
            .iter()
            .map(|member| &member.manager)
            .find(|manager| manager.character() == character)
    }

    pub fn run(&mut self) {
        while self.tick < self.sim.ticks {
            self.step();
        }
        self.finish();
    }

    pub fn step(&mut self) {
        if self.tick == self.sim.order_tick() {
            self.issue_orders();
        }
        if self.sim.damage_every > 0 && self.tick > 0 && self.tick % self.sim.damage_every == 0 {
            self.damage_round();
        }

        for member in &mut self.crew {
            let selected = member.manager.update(self.sim.delta, &mut self.world);
            if selected != member.last_selected {
                let summary = member.manager.describe_selected();
                tracing::info!(
                    tick = self.tick,
                    character = %member.manager.character(),
                    objective = %summary.label,
                    skills = ?summary.required_skills,
                    items = ?summary.required_items,
                    "now working on"
                );
                member.last_selected = selected;
            }
        }

        self.tick += 1;
    }

    /// The first character is ordered onto repairs, the last stands down.
    fn issue_orders(&mut self) {
        let last = self.crew.len().saturating_sub(1);
        for (index, member) in self.crew.iter_mut().enumerate() {
            let character = member.manager.character();
            if index == 0 {
                member.manager.issue_order(RepairScan::new());
                tracing::info!(tick = self.tick, character = %character, "ordered to repair");
            } else if index == last {
                member.manager.issue_order(Idle::new());
                tracing::info!(tick = self.tick, character = %character, "ordered to stand down");
            }
        }
    }

    /// Damages one target per round, cycling through the world.
    fn damage_round(&mut self) {
        let count = self.world.len();
        if count == 0 {
            return;
        }
        let round = (self.tick / self.sim.damage_every) as usize;
        let id = self.world.list_all()[round % count].id;

        match self.world.damage(id, self.sim.damage_amount) {
            Ok(condition) => tracing::info!(tick = self.tick, target = %id, condition, "damaged"),
            Err(e) => tracing::warn!(tick = self.tick, target = %id, error = %e, "damage failed"),
        }
    }

    fn finish(&mut self) {
        for member in &mut self.crew {
            member.manager.teardown(&mut self.world);
        }
        for target in self.world.list_all() {
            tracing::info!(
                target = %target.id,
                name = %target.name,
                condition = target.condition,
                "final condition"
            );
        }
    }
}

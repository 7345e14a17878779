//! Fallback objective for characters with nothing better to do.

use core::any::Any;

use crate::objective::{ActContext, Objective, ObjectiveSummary, PriorityContext, SubObjectives};
use crate::priority::Priority;

/// Fallback objective: always a candidate, never preferred over real work.
#[derive(Clone, Debug, Default)]
pub struct Idle {
    idle_time: f32,
}

impl Idle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds spent acting as the selected driver.
    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }
}

impl Objective for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn priority(&mut self, ctx: &PriorityContext<'_>, _children: &mut SubObjectives) -> f32 {
        if ctx.is_current_order {
            Priority::ORDER
        } else {
            ctx.config.idle_priority
        }
    }

    fn is_completed(&self) -> bool {
        false
    }

    fn act(&mut self, ctx: &mut ActContext<'_>, _children: &mut SubObjectives) {
        self.idle_time += ctx.delta;
    }

    fn summary(&self) -> ObjectiveSummary {
        ObjectiveSummary::labelled(format!("Idle ({:.0}s)", self.idle_time))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

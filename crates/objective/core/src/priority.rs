//! Priority scale used during arbitration.

/// Priority constants shared by every objective.
///
/// Organic priorities live in `[NONE, MAX_ORGANIC]`. The manager clamps
/// anything above `MAX_ORGANIC`, so only a commanded objective can report
/// [`Priority::ORDER`].
pub struct Priority;

impl Priority {
    /// Reported by an objective that is the character's current order.
    pub const ORDER: f32 = 100.0;
    /// Upper bound of emergent, non-ordered priorities.
    pub const MAX_ORGANIC: f32 = 99.0;
    /// Nothing to gain from running this objective.
    pub const NONE: f32 = 0.0;

    /// Clamps an emergent priority into the organic range.
    #[inline]
    pub fn clamp_organic(priority: f32) -> f32 {
        priority.clamp(Self::NONE, Self::MAX_ORGANIC)
    }
}

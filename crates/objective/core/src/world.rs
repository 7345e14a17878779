//! World target index: the registry of damageable world objects.
//!
//! The scheduler reads the index on every scan and mutates it only through
//! the narrow surface exposed here (claiming, releasing, repairing, marking a
//! facet fixed). Everything else about targets belongs to gameplay systems.

use crate::error::TargetError;
use crate::ids::{CharacterId, FacetId, TargetId};

/// One repairable aspect of a target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairFacet {
    pub name: String,
    /// Set once the facet has been repaired; cleared when the target is damaged again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_fixed: bool,
    /// Target condition above which this facet does not ask for repair.
    pub show_repair_threshold: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_skill: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_items: Vec<String>,
}

impl RepairFacet {
    pub fn new(name: impl Into<String>, show_repair_threshold: f32) -> Self {
        Self {
            name: name.into(),
            is_fixed: false,
            show_repair_threshold,
            required_skill: None,
            required_items: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skill = Some(skill.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.required_items.push(item.into());
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }
}

/// A world object that can be damaged and repaired.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    /// Condition in `[0, FULL_CONDITION]`.
    pub condition: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub facets: Vec<RepairFacet>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub claimed_by: Option<CharacterId>,
}

impl Target {
    pub const FULL_CONDITION: f32 = 100.0;

    pub fn new(id: TargetId, name: impl Into<String>, condition: f32) -> Self {
        Self {
            id,
            name: name.into(),
            condition: condition.clamp(0.0, Self::FULL_CONDITION),
            facets: Vec::new(),
            claimed_by: None,
        }
    }

    pub fn with_facet(mut self, facet: RepairFacet) -> Self {
        self.facets.push(facet);
        self
    }

    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.condition < Self::FULL_CONDITION
    }

    /// True unless another character holds the claim.
    #[inline]
    pub fn is_claimable_by(&self, character: CharacterId) -> bool {
        self.claimed_by.is_none_or(|holder| holder == character)
    }

    pub fn facet(&self, facet: FacetId) -> Option<&RepairFacet> {
        self.facets.get(facet.index())
    }
}

/// Queryable registry of interactable world objects.
pub trait TargetIndex {
    /// Every target currently in the world, in a stable order.
    fn list_all(&self) -> &[Target];

    fn get(&self, id: TargetId) -> Option<&Target> {
        self.list_all().iter().find(|target| target.id == id)
    }

    /// Claims `id` for `by`. Re-claiming by the current holder succeeds.
    fn claim(&mut self, id: TargetId, by: CharacterId) -> Result<(), TargetError>;

    /// Drops a claim held by `by`. Releasing an unclaimed target succeeds.
    fn release(&mut self, id: TargetId, by: CharacterId) -> Result<(), TargetError>;

    /// Restores `amount` condition and returns the new condition.
    fn repair(&mut self, id: TargetId, amount: f32) -> Result<f32, TargetError>;

    fn mark_fixed(&mut self, id: TargetId, facet: FacetId) -> Result<(), TargetError>;
}

/// `Vec`-backed target index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldTargets {
    targets: Vec<Target>,
}

impl WorldTargets {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    pub fn insert(&mut self, target: Target) {
        match self.targets.iter_mut().find(|t| t.id == target.id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(index))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Gameplay-side damage. A target that drops below full condition is
    /// broken again, so every facet loses its fixed mark.
    pub fn damage(&mut self, id: TargetId, amount: f32) -> Result<f32, TargetError> {
        let target = self.target_mut(id)?;
        target.condition = (target.condition - amount.max(0.0)).max(0.0);
        if target.is_damaged() {
            for facet in &mut target.facets {
                facet.is_fixed = false;
            }
        }
        Ok(target.condition)
    }

    fn target_mut(&mut self, id: TargetId) -> Result<&mut Target, TargetError> {
        self.targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TargetError::NotFound(id))
    }
}

impl TargetIndex for WorldTargets {
    fn list_all(&self) -> &[Target] {
        &self.targets
    }

    fn claim(&mut self, id: TargetId, by: CharacterId) -> Result<(), TargetError> {
        let target = self.target_mut(id)?;
        match target.claimed_by {
            Some(holder) if holder != by => Err(TargetError::ClaimedByOther { target: id, holder }),
            _ => {
                target.claimed_by = Some(by);
                Ok(())
            }
        }
    }

    fn release(&mut self, id: TargetId, by: CharacterId) -> Result<(), TargetError> {
        let target = self.target_mut(id)?;
        match target.claimed_by {
            Some(holder) if holder != by => Err(TargetError::ClaimedByOther { target: id, holder }),
            _ => {
                target.claimed_by = None;
                Ok(())
            }
        }
    }

    fn repair(&mut self, id: TargetId, amount: f32) -> Result<f32, TargetError> {
        let target = self.target_mut(id)?;
        target.condition = (target.condition + amount.max(0.0)).min(Target::FULL_CONDITION);
        Ok(target.condition)
    }

    fn mark_fixed(&mut self, id: TargetId, facet: FacetId) -> Result<(), TargetError> {
        let target = self.target_mut(id)?;
        let entry = target
            .facets
            .get_mut(facet.index())
            .ok_or(TargetError::FacetNotFound { target: id, facet })?;
        entry.is_fixed = true;
        Ok(())
    }
}

//! Generation-checked handles into a manager-owned objective arena.
//!
//! A freed slot bumps its generation, so a handle kept by an order issuer
//! stops resolving the moment its objective is removed, even if the slot is
//! reused for a newer objective.

/// Weak, copyable reference to a top-level objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectiveHandle {
    index: u32,
    generation: u32,
}

impl ObjectiveHandle {
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with free-list reuse.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, value: T) -> ObjectiveHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return ObjectiveHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        ObjectiveHandle {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, handle: ObjectiveHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn get(&self, handle: ObjectiveHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: ObjectiveHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub(crate) fn contains(&self, handle: ObjectiveHandle) -> bool {
        self.get(handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_stops_resolving() {
        let mut arena = Arena::new();
        let handle = arena.insert("scan");

        assert_eq!(arena.remove(handle), Some("scan"));
        assert!(!arena.contains(handle));
        assert_eq!(arena.remove(handle), None);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn reused_slot_does_not_revive_stale_handle() {
        let mut arena = Arena::new();
        let stale = arena.insert(1);
        arena.remove(stale);

        let fresh = arena.insert(2);
        assert_eq!(fresh.index(), stale.index());
        assert_ne!(fresh.generation(), stale.generation());
        assert_eq!(arena.get(stale), None);
        assert_eq!(arena.get(fresh), Some(&2));
    }
}

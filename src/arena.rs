//! Reusable state storage for the search queues.
//!
//! Queued search nodes refer to their state through a [`SlotId`] instead of
//! owning it. A slot is filled when a state is first discovered and released
//! when that state is expanded; released slots are reused for later
//! discoveries, so the backing storage stops growing once the queues reach
//! their peak size.
//!
//! Reuse order is deterministic: the most recently released slot is handed
//! out first.

use crate::state::CubeState;

/// Index of a slot in a [`StatePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

#[derive(Debug, Clone)]
struct Slot {
    state: CubeState,
    live: bool,
}

/// Contiguous state storage with free-list reuse.
#[derive(Debug, Clone, Default)]
pub struct StatePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live_count: usize,
}

impl StatePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `state` into a free slot, growing the pool only when none is free.
    pub fn store(&mut self, state: &CubeState) -> SlotId {
        self.live_count += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.live, "free slot should not be live");
            slot.state.clone_from(state);
            slot.live = true;
            SlotId(index)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                state: state.clone(),
                live: true,
            });
            SlotId(index)
        }
    }

    /// Returns the state held in a live slot.
    pub fn get(&self, id: SlotId) -> Option<&CubeState> {
        self.slots
            .get(id.0 as usize)
            .filter(|slot| slot.live)
            .map(|slot| &slot.state)
    }

    /// Copies the state out of a live slot into `out` and releases the slot.
    ///
    /// Returns `false` if the slot was not live.
    pub fn take_into(&mut self, id: SlotId, out: &mut CubeState) -> bool {
        let Some(state) = self.get(id) else {
            return false;
        };
        out.clone_from(state);
        self.release(id)
    }

    /// Marks a slot free for reuse.
    ///
    /// Returns `true` if the slot was live.
    pub fn release(&mut self, id: SlotId) -> bool {
        match self.slots.get_mut(id.0 as usize) {
            Some(slot) if slot.live => {
                slot.live = false;
                self.free.push(id.0);
                self.live_count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Number of slots currently holding a queued state.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Total number of slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveTable;

    #[test]
    fn test_store_and_get() {
        let mut pool = StatePool::new();
        let solved = CubeState::solved();
        let id = pool.store(&solved);
        assert_eq!(pool.get(id), Some(&solved));
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn test_released_slot_is_reused() {
        let table = MoveTable::new();
        let mut pool = StatePool::new();
        let first = pool.store(&CubeState::solved());
        let _second = pool.store(&CubeState::solved());
        assert!(pool.release(first));
        assert_eq!(pool.get(first), None);

        let turned = CubeState::solved().apply(&table, 0).unwrap();
        let third = pool.store(&turned);
        assert_eq!(third, first, "Most recently released slot should be reused");
        assert_eq!(pool.get(third), Some(&turned));
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_take_into_releases() {
        let table = MoveTable::new();
        let mut pool = StatePool::new();
        let turned = CubeState::solved().apply(&table, 4).unwrap();
        let id = pool.store(&turned);

        let mut out = CubeState::solved();
        assert!(pool.take_into(id, &mut out));
        assert_eq!(out, turned);
        assert_eq!(pool.live_count(), 0);
        assert!(!pool.take_into(id, &mut out), "Slot already released");
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut pool = StatePool::new();
        let id = pool.store(&CubeState::solved());
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert!(!pool.release(SlotId(42)));
        assert_eq!(pool.live_count(), 0);
    }
}

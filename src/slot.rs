//! Slot array: one fixed-capacity generation of tri-state slots.

use crate::error::TableError;
use crate::fault::{FaultPoint, FaultSwitches};
use crate::growth;
use crate::table::Iter;

/// State of one slot.
///
/// `Tombstone` keeps a probe chain intact after an erase; it is never
/// confused with a stored value because the state is an explicit tag.
#[derive(Debug)]
pub(crate) enum Slot<'a, V: ?Sized> {
    Empty,
    Tombstone,
    Occupied { key: &'a [u8], value: &'a V },
}

// Manual impls: the slot only holds references, so it is `Copy` for any `V`.
impl<'a, V: ?Sized> Clone for Slot<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V: ?Sized> Copy for Slot<'a, V> {}

impl<'a, V: ?Sized> Slot<'a, V> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&'a V> {
        match *self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A generation: `PRIMES[index]` slots plus the counters that describe them.
///
/// `consumed` is the number of `Occupied` plus `Tombstone` slots and drives
/// growth; `live` counts `Occupied` slots only.
pub(crate) struct Generation<'a, V: ?Sized> {
    pub(crate) index: usize,
    pub(crate) slots: Box<[Slot<'a, V>]>,
    pub(crate) consumed: usize,
    pub(crate) live: usize,
}

impl<'a, V: ?Sized> Generation<'a, V> {
    /// Allocates an all-empty generation at growth `index`.
    ///
    /// `faults` can force the index out of range or the allocation to fail.
    pub(crate) fn alloc(index: usize, faults: &FaultSwitches) -> Result<Self, TableError> {
        let index = if faults.is_enabled(FaultPoint::GrowthOverflow) {
            growth::PRIMES.len()
        } else {
            index
        };
        let capacity = growth::capacity_for(index)?;

        let mut slots = Vec::new();
        if slots.try_reserve_exact(capacity).is_err()
            || faults.is_enabled(FaultPoint::GenerationAlloc)
        {
            return Err(TableError::AllocationFailure { capacity });
        }
        slots.resize(capacity, Slot::Empty);

        Ok(Self {
            index,
            slots: slots.into_boxed_slice(),
            consumed: 0,
            live: 0,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True when one more consumed slot would leave no `Empty` slot behind.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.consumed == self.capacity() - 1
    }

    /// Occupied slots in array-index order.
    #[inline]
    pub(crate) fn occupied(&self) -> Iter<'_, 'a, V> {
        Iter::new(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_generation_is_all_empty() {
        let g: Generation<'_, u32> = Generation::alloc(0, &FaultSwitches::new()).unwrap();
        assert_eq!(g.capacity(), growth::MIN_CAPACITY);
        assert_eq!(g.index, 0);
        assert!(g.slots.iter().all(Slot::is_empty));
        assert_eq!((g.consumed, g.live), (0, 0));
        assert_eq!(g.occupied().count(), 0);
    }

    #[test]
    fn index_past_sequence_is_exhausted() {
        let r = Generation::<'_, u32>::alloc(growth::PRIMES.len(), &FaultSwitches::new());
        assert!(matches!(r, Err(TableError::GrowthExhausted { index: 64 })));
    }

    /// Invariant: an enabled switch fails allocation no matter the index.
    #[test]
    fn switches_force_failures() {
        let f = FaultSwitches::new().with(FaultPoint::GenerationAlloc);
        let r = Generation::<'_, u32>::alloc(3, &f);
        assert!(matches!(
            r,
            Err(TableError::AllocationFailure { capacity: 107 })
        ));

        let f = FaultSwitches::new().with(FaultPoint::GrowthOverflow);
        let r = Generation::<'_, u32>::alloc(0, &f);
        assert!(matches!(r, Err(TableError::GrowthExhausted { .. })));
    }

    #[test]
    fn occupied_skips_empty_and_tombstones() {
        let (a, b) = (1u32, 2u32);
        let mut g: Generation<'_, u32> = Generation::alloc(0, &FaultSwitches::new()).unwrap();
        g.slots[5] = Slot::Occupied { key: b"b", value: &b };
        g.slots[2] = Slot::Occupied { key: b"a", value: &a };
        g.slots[3] = Slot::Tombstone;
        let seen: Vec<_> = g.occupied().map(|(k, v)| (k, *v)).collect();
        assert_eq!(seen, vec![(&b"a"[..], 1), (&b"b"[..], 2)]);
    }
}

//! Probe engine: linear probing with wraparound over one generation.
//!
//! Three walks share the same step function:
//! - insertion stops at the first `Empty` or `Tombstone` and writes there;
//!   it never compares keys, so a repeated key gets a second entry;
//! - lookup skips tombstones and non-matching keys until it reaches the key
//!   or an `Empty`, and moves a found entry back into the first tombstone it
//!   passed;
//! - erase-at-position collapses a slot to `Empty` only when the next slot
//!   is already `Empty`, otherwise it leaves a tombstone.
//!
//! Every walk terminates because a generation always keeps at least one
//! `Empty` slot (`consumed < capacity`).

use crate::slot::{Generation, Slot};

/// Cursor over the probe sequence of one hash.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Probe {
    // Current slot index.
    pub(crate) pos: usize,
    // Slot the sequence started from.
    pub(crate) home: usize,
    capacity: usize,
}

impl Probe {
    #[inline]
    pub(crate) fn start(hash: u64, capacity: usize) -> Probe {
        let home = (hash % capacity as u64) as usize;
        Probe {
            pos: home,
            home,
            capacity,
        }
    }

    #[inline]
    pub(crate) fn next(&mut self) {
        self.pos = next_position(self.pos, self.capacity);
    }
}

#[inline]
pub(crate) fn next_position(pos: usize, capacity: usize) -> usize {
    (pos + 1) % capacity
}

/// Where a lookup walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    pub(crate) found: Option<usize>,
    pub(crate) home: usize,
    pub(crate) first_tombstone: Option<usize>,
}

impl<'a, V: ?Sized> Generation<'a, V> {
    /// Insertion walk. The caller has already made room (`!is_full()`).
    ///
    /// Returns the slot written.
    pub(crate) fn insert_hashed(&mut self, hash: u64, key: &'a [u8], value: &'a V) -> usize {
        debug_assert!(!self.is_full(), "insert into a full generation");
        let mut probe = Probe::start(hash, self.capacity());
        while let Slot::Occupied { .. } = self.slots[probe.pos] {
            probe.next();
        }

        if self.slots[probe.pos].is_empty() {
            self.consumed += 1;
        }
        self.slots[probe.pos] = Slot::Occupied { key, value };
        self.live += 1;
        probe.pos
    }

    /// Lookup walk without side effects.
    pub(crate) fn locate(&self, hash: u64, key: &[u8]) -> Located {
        let mut probe = Probe::start(hash, self.capacity());
        let mut first_tombstone = None;
        let found = loop {
            match self.slots[probe.pos] {
                Slot::Empty => break None,
                Slot::Tombstone if first_tombstone.is_none() => {
                    first_tombstone = Some(probe.pos);
                }
                Slot::Tombstone => {}
                Slot::Occupied { key: k, .. } if k == key => break Some(probe.pos),
                Slot::Occupied { .. } => {}
            }
            probe.next();
        };
        Located {
            found,
            home: probe.home,
            first_tombstone,
        }
    }

    /// Lookup walk with opportunistic compaction.
    ///
    /// Returns the position the entry lives at afterwards.
    pub(crate) fn find_hashed(&mut self, hash: u64, key: &[u8]) -> Option<usize> {
        let Located {
            found,
            home,
            first_tombstone,
        } = self.locate(hash, key);
        let pos = found?;
        match first_tombstone {
            Some(earlier) if pos != home => {
                self.slots[earlier] = self.slots[pos];
                self.vacate(pos);
                tracing::trace!(from = pos, to = earlier, "compacted probe chain");
                Some(earlier)
            }
            _ => Some(pos),
        }
    }

    /// Erase-at-position for an `Occupied` slot. Returns the value removed.
    pub(crate) fn erase_at(&mut self, pos: usize) -> &'a V {
        let Slot::Occupied { value, .. } = self.slots[pos] else {
            panic!("erase_at on a slot that is not occupied: {pos}");
        };
        self.vacate(pos);
        self.live -= 1;
        value
    }

    /// Turns `pos` into `Empty` if its successor is `Empty`, else a tombstone.
    ///
    /// Only `consumed` is adjusted; `live` is the caller's business.
    fn vacate(&mut self, pos: usize) {
        let next = next_position(pos, self.capacity());
        if self.slots[next].is_empty() {
            self.slots[pos] = Slot::Empty;
            debug_assert!(self.consumed > 0);
            self.consumed -= 1;
        } else {
            self.slots[pos] = Slot::Tombstone;
        }
    }
}

//! OpenTable: the public container and its growth orchestration.

use core::fmt;
use core::hash::BuildHasher;

use crate::error::TableError;
use crate::fault::FaultSwitches;
use crate::hash::{hash_key, DefaultHashBuilder};
use crate::slot::{Generation, Slot};

/// An open-addressing table from byte-string keys to borrowed values.
///
/// The table stores references only. Every key and value handed to
/// [`insert`](Self::insert) must outlive `'a`, and entries may be moved
/// between slots (by growth or by lookup compaction) at any time while the
/// table holds them.
///
/// Inserting a key that is already present adds a second, independent
/// entry; see [`insert`](Self::insert).
pub struct OpenTable<'a, V: ?Sized, S = DefaultHashBuilder> {
    hasher: S,
    table: Generation<'a, V>,
    faults: FaultSwitches,
}

impl<'a, V: ?Sized> OpenTable<'a, V> {
    /// Builds an empty table with CRC32 hashing.
    pub fn new() -> Result<Self, TableError> {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

/// Iterator over occupied slots, in slot order.
pub struct Iter<'t, 'a, V: ?Sized> {
    it: core::slice::Iter<'t, Slot<'a, V>>,
}

impl<'t, 'a, V: ?Sized> Iter<'t, 'a, V> {
    pub(crate) fn new(slots: &'t [Slot<'a, V>]) -> Self {
        Iter { it: slots.iter() }
    }
}

impl<'t, 'a, V: ?Sized> Iterator for Iter<'t, 'a, V> {
    type Item = (&'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(|s| match *s {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.it.size_hint().1)
    }
}

impl<'a, V: ?Sized, S> OpenTable<'a, V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Result<Self, TableError> {
        Self::with_hasher_and_faults(hasher, FaultSwitches::new())
    }

    /// Builds an empty table that consults `faults` before every allocation.
    pub fn with_hasher_and_faults(hasher: S, faults: FaultSwitches) -> Result<Self, TableError> {
        let table = Generation::alloc(0, &faults)?;
        Ok(Self {
            hasher,
            table,
            faults,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.live
    }

    pub fn is_empty(&self) -> bool {
        self.table.live == 0
    }

    /// Occupied plus tombstoned slots; growth triggers on this, not `len`.
    pub fn consumed(&self) -> usize {
        self.table.consumed
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Index of the current generation in the growth sequence.
    pub fn generation(&self) -> usize {
        self.table.index
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn faults(&self) -> &FaultSwitches {
        &self.faults
    }

    /// Stores a reference to `value` under `key`.
    ///
    /// If the current generation has a single `Empty` slot left, the table
    /// grows first. When growth fails the error is returned and the table is
    /// unchanged.
    ///
    /// No key comparison happens here: inserting a key twice leaves two
    /// entries. `find` returns whichever the probe sequence reaches first and
    /// `erase` removes only that one.
    pub fn insert<K>(&mut self, key: &'a K, value: &'a V) -> Result<(), TableError>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key: &'a [u8] = key.as_ref();
        if self.table.is_full() {
            if let Err(err) = self.grow() {
                tracing::warn!(
                    %err,
                    capacity = self.table.capacity(),
                    consumed = self.table.consumed,
                    "table cannot grow; insert refused"
                );
                return Err(err);
            }
        }
        let hash = hash_key(&self.hasher, key);
        self.table.insert_hashed(hash, key, value);
        Ok(())
    }

    /// Returns the value stored under `key`.
    ///
    /// Takes `&mut self` because a hit may move the entry back into an
    /// earlier tombstone on its probe path. The live count never changes.
    pub fn find<K>(&mut self, key: &K) -> Option<&'a V>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let hash = hash_key(&self.hasher, key);
        let pos = self.table.find_hashed(hash, key)?;
        self.table.slots[pos].value()
    }

    /// Lookup without compaction.
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let hash = hash_key(&self.hasher, key);
        self.table.locate(hash, key).found.is_some()
    }

    /// Removes the entry for `key` and returns its value; `None` if absent.
    pub fn erase<K>(&mut self, key: &K) -> Option<&'a V>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let hash = hash_key(&self.hasher, key);
        let pos = self.table.find_hashed(hash, key)?;
        Some(self.table.erase_at(pos))
    }

    /// Visits every live entry once, in slot order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&'a [u8], &'a V),
    {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }

    pub fn iter(&self) -> Iter<'_, 'a, V> {
        self.table.occupied()
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[Slot<'a, V>] {
        &self.table.slots
    }

    // Moves every live entry into the next generation. On failure nothing
    // has been touched.
    fn grow(&mut self) -> Result<(), TableError> {
        let mut next = Generation::alloc(self.table.index + 1, &self.faults)?;
        for (key, value) in self.table.occupied() {
            debug_assert!(!next.is_full(), "rehash outgrew the next generation");
            next.insert_hashed(hash_key(&self.hasher, key), key, value);
        }
        tracing::debug!(
            from = self.table.capacity(),
            to = next.capacity(),
            live = next.live,
            tombstones = self.table.consumed - self.table.live,
            "table grew"
        );
        self.table = next;
        Ok(())
    }
}

impl<'t, 'a, V: ?Sized, S> IntoIterator for &'t OpenTable<'a, V, S>
where
    S: BuildHasher,
{
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'t, 'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V: ?Sized, S> fmt::Debug for OpenTable<'a, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTable")
            .field("len", &self.table.live)
            .field("consumed", &self.table.consumed)
            .field("capacity", &self.table.capacity())
            .field("generation", &self.table.index)
            .finish()
    }
}

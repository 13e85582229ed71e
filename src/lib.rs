//! probe-table: a single-threaded, open-addressing table from byte-string
//! keys to borrowed values, with tombstone deletion and prime-sized growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the whole algorithm (probe sequence, tombstones, growth) in a
//!   few small layers that can each be checked on their own.
//! - Layers:
//!   - `growth`: the fixed sequence of prime capacities; a generation is just
//!     an index into it.
//!   - `slot`: one generation's slot array plus its `consumed`/`live`
//!     counters. Each slot is an explicit `Empty | Tombstone | Occupied` tag.
//!   - `probe`: linear probing with wraparound; insertion, lookup (with
//!     opportunistic compaction) and erase-at-position walks.
//!   - `OpenTable`: public API; owns the hasher, the fault switches and
//!     exactly one generation, and replaces that generation on growth.
//!
//! Constraints
//! - Single-threaded: no atomics, no locks. `find` relocates entries, so a
//!   shared table needs exclusive access for lookups as well as writes.
//! - References only: keys are `&'a [u8]`, values `&'a V`. The table never
//!   copies or drops them; `'a` carries the caller's obligation to keep them
//!   alive and unmodified while stored.
//! - Never shrinks. Growth is proactive: an insert that would consume the
//!   last `Empty` slot first moves everything into the next generation.
//!
//! Counters
//! - `consumed` counts `Occupied` and `Tombstone` slots and decides growth,
//!   so a table full of tombstones grows even with few live entries.
//! - `live` counts `Occupied` slots and backs `len()`.
//! - `consumed < capacity` holds after every operation, which guarantees
//!   each probe walk meets an `Empty` slot and terminates.
//!
//! Failure model
//! - Growth needs a fresh allocation and a next index in the sequence.
//!   Either can fail (for real or through [`FaultSwitches`]); the insert
//!   then returns a [`TableError`] and the old generation stays in use.
//! - A missing key is `None`, never an error.
//!
//! Notes and non-goals
//! - Repeated inserts of one key create separate entries. Lookup sees the
//!   first one on the probe path, and erase removes only that one.
//! - Keys are byte strings only; C strings can be stored via
//!   `CStr::to_bytes`.
//! - Hashing is pluggable through any `BuildHasher`; the default is CRC32.

pub mod error;
pub mod fault;
pub mod growth;
pub mod hash;
mod probe;
mod slot;
mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use fault::{FaultPoint, FaultSwitches};
pub use hash::{crc32_hash, DefaultHashBuilder};
pub use table::{Iter, OpenTable};

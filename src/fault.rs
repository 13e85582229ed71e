//! Injected fault switches for exercising failure paths deterministically.
//!
//! A table consults its switches at two points: right before allocating a
//! generation's slots, and right before resolving a growth index to a
//! capacity. Switches are owned per table and start disabled, so a table
//! built without them behaves as if the facility did not exist.

use core::cell::Cell;

/// A decision point a table consults before growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// Treat the allocation of a generation's slots as failed.
    GenerationAlloc,
    /// Push the requested growth index past the end of the growth sequence.
    GrowthOverflow,
}

/// Independently toggleable switches, one per [`FaultPoint`].
///
/// Toggling goes through `&self`, so a test can flip a switch on a table it
/// is still borrowing.
#[derive(Debug, Default)]
pub struct FaultSwitches {
    generation_alloc: Cell<bool>,
    growth_overflow: Cell<bool>,
}

impl FaultSwitches {
    /// All switches disabled.
    pub const fn new() -> Self {
        Self {
            generation_alloc: Cell::new(false),
            growth_overflow: Cell::new(false),
        }
    }

    /// Builder-style: returns `self` with `point` enabled.
    pub fn with(self, point: FaultPoint) -> Self {
        self.enable(point);
        self
    }

    fn cell(&self, point: FaultPoint) -> &Cell<bool> {
        match point {
            FaultPoint::GenerationAlloc => &self.generation_alloc,
            FaultPoint::GrowthOverflow => &self.growth_overflow,
        }
    }

    pub fn set(&self, point: FaultPoint, enabled: bool) {
        self.cell(point).set(enabled);
    }

    pub fn enable(&self, point: FaultPoint) {
        self.set(point, true);
    }

    pub fn disable(&self, point: FaultPoint) {
        self.set(point, false);
    }

    #[inline]
    pub fn is_enabled(&self, point: FaultPoint) -> bool {
        let on = self.cell(point).get();
        if on {
            tracing::trace!(?point, "fault switch fired");
        }
        on
    }
}

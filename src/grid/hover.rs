//! Tooltip hover debounce.
//!
//! The engine core tracks only the pending target and a generation counter;
//! the host layer owns the actual timer. Every retarget bumps the
//! generation, so a timer callback armed for an earlier hover is a no-op by
//! the time it fires. Clearing on teardown prevents a dangling callback from
//! touching a torn-down grid.

use crate::types::CellCoord;

#[derive(Debug, Default)]
pub struct HoverDebounce {
    generation: u64,
    target: Option<CellCoord>,
}

impl HoverDebounce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the debounce at a new cell; returns the generation the host
    /// must pass back when its timer fires.
    pub fn retarget(&mut self, cell: CellCoord) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.target = Some(cell);
        self.generation
    }

    /// Drop the pending target and invalidate any armed timer.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.target = None;
    }

    /// Timer expiry. Yields the target only if no retarget or clear happened
    /// since the timer was armed.
    pub fn fire(&mut self, generation: u64) -> Option<CellCoord> {
        if generation == self.generation {
            self.target
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_with_current_generation() {
        let mut hover = HoverDebounce::new();
        let generation = hover.retarget(CellCoord::new(1, 2));
        assert_eq!(hover.fire(generation), Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn test_retarget_invalidates_previous_generation() {
        let mut hover = HoverDebounce::new();
        let old = hover.retarget(CellCoord::new(1, 2));
        let new = hover.retarget(CellCoord::new(3, 4));
        assert_eq!(hover.fire(old), None);
        assert_eq!(hover.fire(new), Some(CellCoord::new(3, 4)));
    }

    #[test]
    fn test_clear_drops_pending_target() {
        let mut hover = HoverDebounce::new();
        let generation = hover.retarget(CellCoord::new(1, 2));
        hover.clear();
        assert_eq!(hover.fire(generation), None);
    }
}

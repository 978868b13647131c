//! Fill-handle pattern gate.
//!
//! A single synchronous predicate decides whether a fill-handle drag may
//! propagate the source value into the destination rectangle. `false`
//! cancels the drag entirely; there is no partial fill. When the source
//! row cannot be resolved from the cache the gate is not consulted and the
//! fill proceeds unguarded. Callers that need a stricter policy must deny
//! from the predicate itself.

use std::rc::Rc;

use tracing::debug;

use crate::types::{ColumnDescriptor, GridRect};

/// Predicate: `(source_rect, dest_rect, columns, source_row) → allow`.
pub type FillPatternFn<R> = Rc<dyn Fn(&GridRect, &GridRect, &[ColumnDescriptor], &R) -> bool>;

/// Optional gate over fill-handle propagation.
pub struct FillPatternGate<R> {
    predicate: Option<FillPatternFn<R>>,
}

impl<R> Default for FillPatternGate<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FillPatternGate<R> {
    #[must_use]
    pub fn new() -> Self {
        Self { predicate: None }
    }

    /// Install or replace the predicate. `None` removes the gate.
    pub fn set_predicate(&mut self, predicate: Option<FillPatternFn<R>>) {
        self.predicate = predicate;
    }

    /// Whether the fill may proceed.
    #[must_use]
    pub fn evaluate(
        &self,
        source: &GridRect,
        dest: &GridRect,
        columns: &[ColumnDescriptor],
        source_row: Option<&R>,
    ) -> bool {
        match (&self.predicate, source_row) {
            (Some(predicate), Some(row)) => predicate(source, dest, columns, row),
            (Some(_), None) => {
                debug!("fill source row not cached, proceeding unguarded");
                true
            }
            (None, _) => true,
        }
    }
}

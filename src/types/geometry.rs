use serde::{Deserialize, Serialize};

/// A rectangle of cells in visual coordinates.
///
/// Used both for the rendered viewport (the rectangle the grid currently
/// shows) and for fill-handle source/destination rectangles. Structural
/// equality gates viewport reprocessing, so two reports of the same visible
/// region are a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRect {
    /// First visible column.
    pub x: u32,
    /// First visible row.
    pub y: u32,
    /// Number of visible columns.
    pub width: u32,
    /// Number of visible rows.
    pub height: u32,
}

impl GridRect {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Column range covered by this rectangle.
    #[must_use]
    pub fn columns(&self) -> std::ops::Range<u32> {
        self.x..self.x.saturating_add(self.width)
    }

    /// Row range covered by this rectangle.
    #[must_use]
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.y..self.y.saturating_add(self.height)
    }
}

/// A single `(column, row)` coordinate in visual space.
///
/// Also the unit of damage notifications: a damaged cell is a coordinate
/// whose rendered content is stale and must be re-queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCoord {
    pub col: u32,
    pub row: u32,
}

impl CellCoord {
    #[must_use]
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use tabula_engine::engine::{Grid, Position, Size};

use super::view::{CellView, CellViewMut};

/// A sparse grid of cells.
///
/// The sheet owns every cell. Cells refer to one another only by
/// [`Position`], and every cross-cell lookup goes through the sheet's grid.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Cells keyed by position; absent positions behave as empty.
    pub(crate) cells: Grid,
    pub(crate) config: SheetConfig,
}

impl Sheet {
    /// Create an empty sheet with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with custom limits.
    pub fn with_config(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sheet {
            cells: Grid::new(),
            config,
        })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub(crate) fn check_position(&self, pos: Position) -> Result<()> {
        if self.config.contains(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    /// Look up the cell at `pos`. `Ok(None)` means no cell exists there.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.cells.get(&pos).map(|cell| CellView::new(self, pos, cell)))
    }

    /// Mutable counterpart of [`Sheet::get_cell`].
    pub fn get_cell_mut(&mut self, pos: Position) -> Result<Option<CellViewMut<'_>>> {
        self.check_position(pos)?;
        if self.cells.contains_key(&pos) {
            Ok(Some(CellViewMut::new(self, pos)))
        } else {
            Ok(None)
        }
    }

    /// Number of stored cells, including empty cells kept alive because
    /// formulas reference them.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest rectangle anchored at A1 covering every cell with non-empty text.
    pub fn printable_size(&self) -> Size {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.content().is_empty())
            .fold(Size::default(), |size, (pos, _)| Size {
                rows: size.rows.max(pos.row + 1),
                cols: size.cols.max(pos.col + 1),
            })
    }
}

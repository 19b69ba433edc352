//! Borrowed handles to a single cell of a [`Sheet`].

use crate::error::Result;
use tabula_engine::engine::{Cell, CellContent, Position, Value};

use super::Sheet;

/// Read access to a cell. Evaluation resolves references through the sheet.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(sheet: &'a Sheet, pos: Position, cell: &'a Cell) -> Self {
        CellView { sheet, pos, cell }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn content(&self) -> &'a CellContent {
        self.cell.content()
    }

    /// Computed value, memoized until an upstream edit invalidates it.
    pub fn value(&self) -> &'a Value {
        self.cell.value(&self.sheet.cells)
    }

    /// Stored text: raw text, or `=` plus the canonical formula.
    pub fn text(&self) -> String {
        self.cell.text()
    }

    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    /// Cells whose formulas reference this one, in row-major order.
    pub fn dependents(&self) -> Vec<Position> {
        let mut dependents: Vec<_> = self.cell.dependents().collect();
        dependents.sort();
        dependents
    }

    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }

    pub fn is_cached(&self) -> bool {
        self.cell.is_cached()
    }
}

/// Write access to an existing cell.
///
/// Edits go through the owning sheet so dependency edges stay consistent.
#[derive(Debug)]
pub struct CellViewMut<'a> {
    sheet: &'a mut Sheet,
    pos: Position,
}

impl<'a> CellViewMut<'a> {
    pub(crate) fn new(sheet: &'a mut Sheet, pos: Position) -> Self {
        CellViewMut { sheet, pos }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Same as [`Sheet::set_cell`] at this position.
    pub fn set(&mut self, text: &str) -> Result<()> {
        self.sheet.set_cell(self.pos, text)
    }

    /// Same as [`Sheet::clear_cell`] at this position.
    pub fn clear(&mut self) -> Result<()> {
        self.sheet.clear_cell(self.pos)
    }

    /// Read view of the cell, or None if an edit removed it.
    pub fn view(&self) -> Option<CellView<'_>> {
        let sheet: &Sheet = &*self.sheet;
        sheet
            .cells
            .get(&self.pos)
            .map(|cell| CellView::new(sheet, self.pos, cell))
    }
}

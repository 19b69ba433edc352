use super::Sheet;
use crate::error::{Result, SheetError};
use tabula_engine::engine::{
    CellContent, Position, find_cycle, invalidate_dependents, prune_if_unused, update_dependents,
};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// - `""` clears the cell
    /// - `=expr` (at least one character after `=`) stores a formula
    /// - anything else is stored as text
    ///
    /// A formula that fails to parse resets the cell to empty. A formula that
    /// would close a reference cycle, or references a position outside the
    /// sheet, is rejected without changing anything.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;

        let content = match CellContent::from_input(text) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("rejected input for {}: {}", pos, e);
                self.reset_cell(pos);
                return Err(e.into());
            }
        };

        let new_refs = content.referenced_cells();
        if let Some(&outside) = new_refs.iter().find(|r| !self.config.contains(**r)) {
            log::debug!("rejected formula for {}: reference outside sheet", pos);
            return Err(SheetError::InvalidPosition(outside));
        }

        // Check for circular dependencies before touching any state.
        if let Some(path) = find_cycle(&self.cells, pos, new_refs) {
            log::debug!("rejected formula for {}: circular dependency", pos);
            return Err(SheetError::CircularDependency { cell: pos, path });
        }

        self.commit(pos, content);
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// The cell stays in place as empty while other formulas still reference
    /// it; otherwise it is removed.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.check_position(pos)?;
        self.reset_cell(pos);
        Ok(())
    }

    fn reset_cell(&mut self, pos: Position) {
        if self.cells.contains_key(&pos) {
            self.commit(pos, CellContent::Empty);
        }
    }

    /// Swap in already validated content: rewire edges, store, then invalidate.
    fn commit(&mut self, pos: Position, content: CellContent) {
        let old_refs = self
            .cells
            .get(&pos)
            .map(|cell| cell.referenced_cells().to_vec())
            .unwrap_or_default();
        let detached =
            update_dependents(&mut self.cells, pos, &old_refs, content.referenced_cells());

        let is_empty = content.is_empty();
        self.cells.entry(pos).or_default().set_content(content);

        let invalidated = invalidate_dependents(&mut self.cells, pos);
        log::trace!("edit at {} invalidated {} cell(s)", pos, invalidated);

        // Drop placeholder cells nothing points at anymore.
        for referenced in detached {
            prune_if_unused(&mut self.cells, referenced);
        }
        if is_empty {
            prune_if_unused(&mut self.cells, pos);
        }

        log::debug!("committed {}", pos);
    }
}

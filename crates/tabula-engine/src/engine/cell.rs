//! Cell data structures for the spreadsheet grid.
//!
//! - [`CellContent`] - What a cell holds (empty, text or formula)
//! - [`Cell`] - Content plus its dependents and memoized value
//! - [`Grid`] - Sparse storage for cells, keyed by [`Position`]

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

use super::formula::Formula;
use super::parser::ParseError;
use super::position::Position;
use super::value::{FormulaError, Value};

/// Leading character that marks formula input.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces the rest of the input to be literal text.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Parse user input into cell content.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula
    /// - Anything else (including a lone `=`) -> Text, stored verbatim
    pub fn from_input(input: &str) -> Result<CellContent, ParseError> {
        if input.is_empty() {
            return Ok(CellContent::Empty);
        }

        if input.len() > 1 {
            if let Some(expression) = input.strip_prefix(FORMULA_SIGN) {
                return Ok(CellContent::Formula(Formula::parse(expression)?));
            }
        }

        Ok(CellContent::Text(input.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Stored form of the content; formulas are rendered canonically.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_SIGN, f.expression()),
        }
    }

    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(f) => f.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    fn evaluate(&self, grid: &Grid) -> Value {
        match self {
            CellContent::Empty => Value::Text(String::new()),
            CellContent::Text(s) => {
                Value::Text(s.strip_prefix(ESCAPE_SIGN).unwrap_or(s.as_str()).to_string())
            }
            CellContent::Formula(f) => f.evaluate(|pos| resolve_number(grid, pos)),
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    content: CellContent,
    /// Cells whose formulas reference this one.
    dependents: HashSet<Position>,
    cache: OnceCell<Value>,
}

impl Cell {
    pub fn new(content: CellContent) -> Cell {
        Cell {
            content,
            ..Cell::default()
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Replace the content and drop the memoized value.
    ///
    /// Dependency edges and dependents' caches are the caller's concern; see
    /// [`update_dependents`](super::update_dependents) and
    /// [`invalidate_dependents`](super::invalidate_dependents).
    pub fn set_content(&mut self, content: CellContent) {
        self.content = content;
        self.cache.take();
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        self.content.referenced_cells()
    }

    /// Value of the cell, computed on first use and memoized until invalidated.
    ///
    /// Referenced cells are filled leaf-first with an explicit stack, so the
    /// length of a reference chain never shows up as call depth.
    pub fn value(&self, grid: &Grid) -> &Value {
        if let Some(value) = self.cache.get() {
            return value;
        }
        let filled = fill_references(grid, self.referenced_cells());
        if filled > 0 {
            log::trace!("filled {} referenced cache(s)", filled);
        }
        self.fill(grid)
    }

    /// Evaluate into the cache. Referenced cells are expected to be cached
    /// already, so evaluation reads them without recursing further.
    fn fill(&self, grid: &Grid) -> &Value {
        self.cache.get_or_init(|| self.content.evaluate(grid))
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Drop the memoized value. Returns whether one was present.
    pub fn invalidate_cache(&mut self) -> bool {
        self.cache.take().is_some()
    }

    pub fn dependents(&self) -> impl Iterator<Item = Position> + '_ {
        self.dependents.iter().copied()
    }

    pub fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub fn remove_dependent(&mut self, pos: Position) {
        self.dependents.remove(&pos);
    }

    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }
}

/// Sparse grid storage. Absent positions behave as empty cells.
pub type Grid = HashMap<Position, Cell>;

/// Fill the caches of every uncached cell reachable from `roots`, in post
/// order. Returns how many caches were filled.
///
/// The reference graph is acyclic, so a cell is expanded at most once.
fn fill_references(grid: &Grid, roots: &[Position]) -> usize {
    let mut filled = 0;
    let mut stack: Vec<(Position, bool)> = roots.iter().map(|&pos| (pos, false)).collect();

    while let Some((pos, expanded)) = stack.pop() {
        let Some(cell) = grid.get(&pos) else {
            continue;
        };
        if cell.is_cached() {
            continue;
        }
        if expanded {
            cell.fill(grid);
            filled += 1;
        } else {
            stack.push((pos, true));
            stack.extend(cell.referenced_cells().iter().map(|&next| (next, false)));
        }
    }

    filled
}

/// Resolve a referenced cell to a number for formula evaluation.
/// Absent and empty cells count as zero; text and errors are arithmetic errors.
fn resolve_number(grid: &Grid, pos: Position) -> Result<f64, FormulaError> {
    let Some(cell) = grid.get(&pos) else {
        return Ok(0.0);
    };
    if cell.content.is_empty() {
        return Ok(0.0);
    }
    match cell.value(grid) {
        Value::Number(n) => Ok(*n),
        Value::Text(_) | Value::Error(_) => Err(FormulaError::Arithmetic),
    }
}

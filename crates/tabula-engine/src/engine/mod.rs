//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Position`], [`Size`] - Grid coordinates (A1 notation ↔ row/col indices)
//! - [`Value`], [`FormulaError`] - Computed cell values
//! - [`Formula`] - Parsed formula with canonical text and referenced cells
//! - [`Cell`], [`CellContent`], [`Grid`] - Data structures for cell storage
//! - [`find_cycle`] - Circular dependency detection
//! - [`update_dependents`], [`invalidate_dependents`] - Dependency graph upkeep

mod cell;
mod cycle;
mod deps;
mod formula;
mod parser;
mod position;
mod value;

pub use cell::{Cell, CellContent, ESCAPE_SIGN, FORMULA_SIGN, Grid};
pub use cycle::find_cycle;
pub use deps::{invalidate_dependents, prune_if_unused, update_dependents};
pub use formula::Formula;
pub use parser::{BinaryOp, Expr, ParseError, UnaryOp, parse};
pub use position::{Position, Size};
pub use value::{FormulaError, Value};

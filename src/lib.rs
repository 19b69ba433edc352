//! Tabula - spreadsheet core with dependency tracking and lazy recomputation.
//!
//! ```
//! use tabula::{Position, Sheet, Value};
//!
//! let a1 = Position::from_a1("A1").unwrap();
//! let b1 = Position::from_a1("B1").unwrap();
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(a1, "=2")?;
//! sheet.set_cell(b1, "=A1*21")?;
//! assert_eq!(sheet.get_cell(b1)?.unwrap().value(), &Value::Number(42.0));
//!
//! // Editing A1 invalidates B1; the next read recomputes it.
//! sheet.set_cell(a1, "=3")?;
//! assert_eq!(sheet.get_cell(b1)?.unwrap().value(), &Value::Number(63.0));
//! # Ok::<(), tabula::SheetError>(())
//! ```

pub use tabula_core::{CellView, CellViewMut, Result, Sheet, SheetConfig, SheetError};
pub use tabula_engine::engine::{
    CellContent, ESCAPE_SIGN, FORMULA_SIGN, Formula, FormulaError, ParseError, Position, Size,
    Value,
};

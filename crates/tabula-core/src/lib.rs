//! tabula-core - the sheet: cell ownership, edits, configuration and rendering.

pub mod config;
pub mod error;
pub mod sheet;

pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{CellView, CellViewMut, Sheet};

pub use tabula_engine::engine::{FormulaError, Position, Size, Value};

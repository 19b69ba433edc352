//! Error types for Tabula core.

use thiserror::Error;

use tabula_engine::engine::{ParseError, Position};

/// Errors that can occur while editing or configuring a sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error(transparent)]
    FormulaParse(#[from] ParseError),

    #[error("Circular dependency detected at {cell}: {}", format_chain(.path))]
    CircularDependency { cell: Position, path: Vec<Position> },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

fn format_chain(path: &[Position]) -> String {
    path.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;

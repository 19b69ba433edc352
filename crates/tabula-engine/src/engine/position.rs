//! Grid positions and their spreadsheet-style names.
//!
//! Provides bidirectional conversion between A1 notation (e.g. "A1", "B2",
//! "AA100") and zero-indexed row/column coordinates.
//!
//! # Examples
//!
//! ```
//! use tabula_engine::engine::Position;
//!
//! let pos = Position::from_a1("B3").unwrap();
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.col, 1); // 0-indexed
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A zero-based (row, column) coordinate of a cell.
///
/// Ordering is row-major, which is also the order referenced cells are
/// reported in.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const MAX_ROWS: usize = 16384;
    pub const MAX_COLS: usize = 16384;

    /// Sentinel for "no position".
    pub const NONE: Position = Position {
        row: usize::MAX,
        col: usize::MAX,
    };

    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row < Self::MAX_ROWS && self.col < Self::MAX_COLS
    }

    /// Parse a position from A1 notation (e.g. "A1", "b2", "AA10").
    /// Returns None if the input is malformed or out of bounds.
    pub fn from_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;

        let pos = Position::new(row, col);
        pos.is_valid().then_some(pos)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Convert column letters to a zero-based index, None on overflow.
pub(crate) fn letters_to_col(letters: &str) -> Option<usize> {
    let mut acc = 0usize;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("A1 position regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s).ok_or_else(|| format!("Invalid cell position: {}", s))
    }
}

/// A1 notation. Positions outside the grid, [`Position::NONE`] included,
/// render as an empty string.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Dimensions of a rectangle anchored at A1.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    pub const fn new(rows: usize, cols: usize) -> Size {
        Size { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

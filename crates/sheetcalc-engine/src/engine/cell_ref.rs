//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A0", "B2", "Z17") and zero-indexed column/row coordinates. Columns
//! are a single letter, rows are the digits as written: `A0` is the top-left
//! cell.
//!
//! # Examples
//!
//! ```
//! use sheetcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Highest column index a reference can name (`Z`).
pub const MAX_COLUMN: usize = 25;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A0", "c12").
    /// Returns None if the input is invalid or names more than one column letter.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a0(name)
    }

    fn parse_a0(name: &str) -> Option<CellRef> {
        let caps = cell_name_re().captures(name)?;
        let letter = caps["letter"].to_ascii_uppercase();
        let col = (letter.as_bytes()[0] - b'A') as usize;
        let row = caps["numbers"].parse::<usize>().ok()?;
        Some(CellRef::new(col, row))
    }

    /// Convert a column index to its letter (0 -> A, 25 -> Z).
    /// Returns None past `Z`.
    pub fn col_to_letter(col: usize) -> Option<char> {
        if col > MAX_COLUMN {
            return None;
        }
        Some((b'A' + col as u8) as char)
    }
}

fn cell_name_re() -> &'static Regex {
    static CELL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    CELL_NAME_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<numbers>[0-9]+)$")
            .expect("cell name regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a0(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CellRef::col_to_letter(self.col) {
            Some(letter) => write!(f, "{}{}", letter, self.row),
            None => write!(f, "#{}:{}", self.col, self.row),
        }
    }
}

//! Parser for sheet files.

use crate::error::{Result, SheetError};
use sheetcalc_engine::engine::{CellRef, Grid};
use std::fs;
use std::path::Path;

use super::csv::{Record, parse_records};

/// Refuse to read sheet files larger than this.
const MAX_SHEET_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

/// Largest number of cells a sheet may hold.
pub const MAX_SHEET_CELLS: usize = 1_000_000;

/// Parse a sheet file and return a Grid
pub fn parse_sheet(path: &Path) -> Result<Grid> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SHEET_FILE_BYTES {
        return Err(SheetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: sheet file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SHEET_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_sheet_content(&content)
}

/// Parse sheet content from a string
pub fn parse_sheet_content(content: &str) -> Result<Grid> {
    let mut records = parse_records(content)?.into_iter();

    let header = records.next().ok_or_else(|| SheetError::Parse {
        line: 1,
        message: "Missing '<width>,<height>' header".to_string(),
    })?;
    let (width, height) = parse_dimensions(&header)?;

    let mut rows: Vec<Record> = records.collect();
    while rows.len() > width && rows.last().is_some_and(is_blank) {
        rows.pop();
    }
    if rows.len() != width {
        return Err(SheetError::RowCountMismatch {
            expected: width,
            found: rows.len(),
        });
    }

    let mut grid = Grid::new(width, height);
    for (col, row) in rows.iter().enumerate() {
        if row.fields.len() > height {
            return Err(SheetError::Parse {
                line: row.line,
                message: format!(
                    "Expected at most {} fields, found {}",
                    height,
                    row.fields.len()
                ),
            });
        }
        // Short rows leave the remaining cells empty.
        for (r, field) in row.fields.iter().enumerate() {
            if !field.is_empty() {
                grid.set(&CellRef::new(col, r), field);
            }
        }
    }

    Ok(grid)
}

/// Validate and read the `<width>,<height>` header.
pub(crate) fn parse_dimensions(header: &Record) -> Result<(usize, usize)> {
    let parse_error = |message: String| SheetError::Parse {
        line: header.line,
        message,
    };

    let [width, height] = header.fields.as_slice() else {
        return Err(parse_error(format!(
            "Expected '<width>,<height>' header, found {} fields",
            header.fields.len()
        )));
    };
    let width: i64 = width
        .parse()
        .map_err(|_| parse_error(format!("Invalid width: {:?}", width)))?;
    let height: i64 = height
        .parse()
        .map_err(|_| parse_error(format!("Invalid height: {:?}", height)))?;

    check_dimensions(width, height)
}

/// Reject non-positive sizes and sheets over [`MAX_SHEET_CELLS`].
pub(crate) fn check_dimensions(width: i64, height: i64) -> Result<(usize, usize)> {
    if width <= 0 || height <= 0 {
        return Err(SheetError::InvalidDimensions { width, height });
    }
    let cells = (width as u64).checked_mul(height as u64);
    if cells.is_none_or(|n| n > MAX_SHEET_CELLS as u64) {
        return Err(SheetError::InvalidDimensions { width, height });
    }
    Ok((width as usize, height as usize))
}

fn is_blank(record: &Record) -> bool {
    record.fields.iter().all(|f| f.is_empty()) && record.fields.len() <= 1
}

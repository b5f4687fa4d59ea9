//! Writer for sheet files

use crate::error::Result;
use sheetcalc_engine::engine::{CellRef, Grid};
use std::fs;
use std::path::Path;

use super::csv::escape_csv_field;

/// Write a Grid to a sheet file
pub fn write_sheet(path: &Path, grid: &Grid) -> Result<()> {
    let content = write_sheet_content(grid);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Grid to a sheet format string: raw text, never evaluated values.
pub fn write_sheet_content(grid: &Grid) -> String {
    let mut lines = vec![format!("{},{}", grid.width(), grid.height())];

    for col in 0..grid.width() {
        let fields: Vec<String> = (0..grid.height())
            .map(|row| {
                grid.get(&CellRef::new(col, row))
                    .map(|cell| escape_csv_field(cell.raw()))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n") + "\n"
}

use crate::error::Result;
use crate::storage::check_dimensions;
use rhai::Engine;
use sheetcalc_engine::engine::{CellValue, Evaluator, Grid, create_engine};
use std::path::PathBuf;

/// UI-agnostic sheet: a fixed-size grid of cells and their evaluated values.
///
/// Every write re-evaluates the whole grid, so values are always current.
pub struct Sheet {
    /// Raw cells
    pub(crate) grid: Grid,
    /// Evaluated value per cell, same indexing as `grid`
    pub(crate) values: Vec<CellValue>,
    /// Rhai engine for formula arithmetic
    pub(crate) engine: Engine,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since it was loaded or saved
    pub modified: bool,
}

impl Sheet {
    /// Create an empty sheet of `width` columns and `height` rows.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let (width, height) = check_dimensions(
            i64::try_from(width).unwrap_or(i64::MAX),
            i64::try_from(height).unwrap_or(i64::MAX),
        )?;
        Ok(Self::from_grid(Grid::new(width, height)))
    }

    /// Wrap a grid and evaluate it.
    pub(crate) fn from_grid(grid: Grid) -> Self {
        let mut sheet = Sheet {
            grid,
            values: Vec::new(),
            engine: create_engine(),
            file_path: None,
            modified: false,
        };
        sheet.recalculate();
        sheet
    }

    /// Open `path` if it exists; otherwise start an empty sheet of
    /// `default_size` bound to that path.
    pub fn with_file(path: Option<PathBuf>, default_size: (usize, usize)) -> Result<Self> {
        let (width, height) = default_size;
        let mut sheet = Self::new(width, height)?;

        if let Some(ref p) = path {
            if p.exists() {
                sheet.load_file(p)?;
            } else {
                sheet.file_path = Some(p.clone());
                sheet.modified = false;
            }
        }
        Ok(sheet)
    }

    /// Re-evaluate every cell.
    pub fn recalculate(&mut self) {
        self.values = Evaluator::new(&self.grid, &self.engine).evaluate_all();
        log::debug!(
            "recalculated {}x{} sheet ({} cells)",
            self.grid.width(),
            self.grid.height(),
            self.values.len()
        );
    }
}

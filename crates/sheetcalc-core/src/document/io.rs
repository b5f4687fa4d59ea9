use super::Sheet;
use crate::error::{Result, SheetError};
use crate::storage::{parse_sheet, write_sheet};
use std::path::{Path, PathBuf};

impl Sheet {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(SheetError::NoFilePath);
        };

        write_sheet(path, &self.grid)?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<()> {
        write_sheet(path, &self.grid)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Load from file, replacing the whole sheet.
    ///
    /// The new grid is parsed completely before anything is replaced, so a
    /// failed load leaves the sheet untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let grid = match parse_sheet(path) {
            Ok(grid) => grid,
            Err(err) => {
                log::warn!("failed to load {}: {}", path.display(), err);
                return Err(err);
            }
        };

        self.grid = grid;
        self.recalculate();

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

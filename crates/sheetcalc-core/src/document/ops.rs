use super::Sheet;
use crate::error::{Result, SheetError};
use sheetcalc_engine::engine::{
    Cell, CellKind, CellRef, CellValue, DepthMap, depth_map, find_cycles, format_value,
};

impl Sheet {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn is_in(&self, x: usize, y: usize) -> bool {
        self.grid.contains(&CellRef::new(x, y))
    }

    /// Raw cell at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.grid.get(&CellRef::new(x, y))
    }

    /// Set the content of a cell and re-evaluate the sheet.
    pub fn set(&mut self, x: usize, y: usize, input: &str) -> Result<()> {
        self.set_ref(&CellRef::new(x, y), input)
    }

    /// Set the content of a cell by reference and re-evaluate the sheet.
    pub fn set_ref(&mut self, cell_ref: &CellRef, input: &str) -> Result<()> {
        if !self.grid.set(cell_ref, input) {
            return Err(SheetError::OutOfBounds(cell_ref.to_string()));
        }
        self.modified = true;
        self.recalculate();
        Ok(())
    }

    /// Evaluated value of a cell.
    pub fn cell_value(&self, x: usize, y: usize) -> Option<&CellValue> {
        self.value_at(&CellRef::new(x, y))
    }

    fn value_at(&self, cell_ref: &CellRef) -> Option<&CellValue> {
        self.grid.index_of(cell_ref).map(|idx| &self.values[idx])
    }

    /// Display string of a cell: the formatted number, the raw text, or an
    /// error token. Empty for coordinates outside the sheet.
    pub fn value(&self, x: usize, y: usize) -> String {
        self.value_ref(&CellRef::new(x, y))
    }

    pub fn value_ref(&self, cell_ref: &CellRef) -> String {
        self.value_at(cell_ref).map(format_value).unwrap_or_default()
    }

    /// Classification of a cell, including evaluation errors.
    pub fn kind(&self, x: usize, y: usize) -> Option<CellKind> {
        let cell_ref = CellRef::new(x, y);
        let cell = self.grid.get(&cell_ref)?;
        let value = self.value_at(&cell_ref)?;
        Some(CellKind::of(cell, value))
    }

    /// Longest reference chain starting at each cell.
    pub fn depth_map(&self) -> DepthMap {
        depth_map(&self.grid)
    }

    /// Groups of cells that reference each other in a loop.
    pub fn cycles(&self) -> Vec<Vec<CellRef>> {
        find_cycles(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcalc_engine::engine::{Depth, ERR_CYCLE, ERR_FORM, FormulaError};
    use pretty_assertions::assert_eq;

    fn sheet() -> Sheet {
        Sheet::new(10, 10).unwrap()
    }

    #[test]
    fn test_new_sheet_is_empty() {
        let sheet = sheet();
        assert_eq!(sheet.width(), 10);
        assert_eq!(sheet.height(), 10);
        assert_eq!(sheet.value(0, 0), "");
        assert_eq!(sheet.kind(0, 0), Some(CellKind::Text));
        assert!(!sheet.modified);
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Sheet::new(0, 3),
            Err(SheetError::InvalidDimensions { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_set_value_and_retrieve() {
        let mut sheet = sheet();
        sheet.set(0, 0, "5").unwrap();
        assert_eq!(sheet.value(0, 0), "5.0");
        assert_eq!(sheet.kind(0, 0), Some(CellKind::Number));

        sheet.set(1, 1, "Hello").unwrap();
        assert_eq!(sheet.value(1, 1), "Hello");

        sheet.set(2, 2, "=1+2").unwrap();
        assert_eq!(sheet.value(2, 2), "3.0");
        assert_eq!(sheet.kind(2, 2), Some(CellKind::Formula));
        assert!(sheet.modified);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut sheet = sheet();
        sheet.set(0, 0, "5").unwrap();
        sheet.set(0, 1, "10").unwrap();
        sheet.set(0, 2, "=A0+A1").unwrap();
        assert_eq!(sheet.value(0, 2), "15.0");

        sheet.set(1, 1, "Hello").unwrap();
        assert_eq!(sheet.value(1, 1), "Hello");

        sheet.set(0, 0, "=Z1").unwrap();
        assert_eq!(sheet.value(0, 0), ERR_FORM);
        assert_eq!(sheet.kind(0, 0), Some(CellKind::ErrorFormula));
    }

    #[test]
    fn test_dependents_see_fresh_values() {
        let mut sheet = sheet();
        sheet.set(0, 0, "5").unwrap();
        sheet.set(0, 1, "10").unwrap();
        sheet.set(0, 2, "=A0*A1").unwrap();
        assert_eq!(sheet.value(0, 2), "50.0");

        sheet.set(1, 0, "=A0+A1+A2").unwrap();
        assert_eq!(sheet.value(1, 0), "65.0");

        sheet.set(0, 0, "1").unwrap();
        assert_eq!(sheet.value(0, 2), "10.0");
        assert_eq!(sheet.value(1, 0), "21.0");
    }

    #[test]
    fn test_cycle_in_values_kinds_and_depths() {
        let mut sheet = sheet();
        sheet.set(0, 0, "=A1").unwrap();
        sheet.set(0, 1, "=A0").unwrap();
        assert_eq!(sheet.value(0, 0), ERR_CYCLE);
        assert_eq!(sheet.value(0, 1), ERR_CYCLE);
        assert_eq!(sheet.kind(0, 1), Some(CellKind::ErrorCycle));

        let depths = sheet.depth_map();
        assert_eq!(depths.get(&CellRef::new(0, 0)), Some(Depth::Cycle));
        assert_eq!(depths.get(&CellRef::new(0, 1)), Some(Depth::Cycle));
        assert_eq!(
            sheet.cycles(),
            vec![vec![CellRef::new(0, 0), CellRef::new(0, 1)]]
        );
    }

    #[test]
    fn test_breaking_a_cycle_recovers() {
        let mut sheet = sheet();
        sheet.set(0, 0, "=A1").unwrap();
        sheet.set(0, 1, "=A0").unwrap();
        sheet.set(0, 1, "4").unwrap();
        assert_eq!(sheet.value(0, 0), "4.0");
        assert!(sheet.cycles().is_empty());
    }

    #[test]
    fn test_error_is_stable_until_rewritten() {
        let mut sheet = sheet();
        sheet.set(0, 0, "=1/0").unwrap();
        assert_eq!(
            sheet.cell_value(0, 0),
            Some(&CellValue::Error(FormulaError::DivideByZero))
        );
        sheet.set(5, 5, "unrelated").unwrap();
        assert_eq!(
            sheet.cell_value(0, 0),
            Some(&CellValue::Error(FormulaError::DivideByZero))
        );
        sheet.set(0, 0, "=1/4").unwrap();
        assert_eq!(sheet.value(0, 0), "0.25");
    }

    #[test]
    fn test_invalid_formula_is_visible_error() {
        let mut sheet = sheet();
        sheet.set(0, 0, "=1+(2").unwrap();
        assert_eq!(sheet.value(0, 0), ERR_FORM);
        assert_eq!(sheet.kind(0, 0), Some(CellKind::ErrorFormula));
        assert_eq!(sheet.get(0, 0).map(Cell::raw), Some("=1+(2"));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut sheet = sheet();
        assert!(matches!(
            sheet.set(10, 0, "1"),
            Err(SheetError::OutOfBounds(_))
        ));
        assert_eq!(sheet.value(10, 10), "");
        assert_eq!(sheet.kind(0, 10), None);
        assert!(sheet.get(42, 0).is_none());
        assert!(!sheet.is_in(10, 0));
        assert!(sheet.is_in(9, 9));
    }

    #[test]
    fn test_set_ref_uses_zero_based_rows() {
        let mut sheet = sheet();
        sheet.set_ref(&CellRef::from_str("C0").unwrap(), "7").unwrap();
        assert_eq!(sheet.value(2, 0), "7.0");
        assert_eq!(sheet.value_ref(&CellRef::from_str("C0").unwrap()), "7.0");
    }

    #[test]
    fn test_depths() {
        let mut sheet = sheet();
        sheet.set(0, 0, "1").unwrap();
        sheet.set(0, 1, "2").unwrap();
        sheet.set(1, 0, "=A0+A1").unwrap();
        sheet.set(1, 1, "=B0").unwrap();
        sheet.set(1, 2, "=B1").unwrap();
        let depths = sheet.depth_map();
        assert_eq!(depths.get(&CellRef::new(0, 0)), Some(Depth::Level(0)));
        assert_eq!(depths.get(&CellRef::new(1, 0)), Some(Depth::Level(1)));
        assert_eq!(depths.get(&CellRef::new(1, 2)), Some(Depth::Level(3)));
    }
}

//! Plain-text rendering of a sheet for the terminal.

use sheetcalc_core::Sheet;
use sheetcalc_engine::engine::{CellRef, DepthMap};

fn column_header(width: usize) -> String {
    let mut header = String::new();
    for x in 0..width {
        header.push('\t');
        match CellRef::col_to_letter(x) {
            Some(letter) => header.push(letter),
            None => header.push_str(&format!("#{}", x)),
        }
    }
    header
}

/// Tab-separated table of display values: one line per row, one field per column.
pub fn render_values(sheet: &Sheet) -> String {
    let mut lines = vec![column_header(sheet.width())];
    for y in 0..sheet.height() {
        let mut line = y.to_string();
        for x in 0..sheet.width() {
            line.push('\t');
            line.push_str(&sheet.value(x, y));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Tab-separated table of depths, `*` marking cells on a cycle.
pub fn render_depths(depths: &DepthMap, width: usize, height: usize) -> String {
    let mut lines = vec![column_header(width)];
    for y in 0..height {
        let mut line = y.to_string();
        for x in 0..width {
            line.push('\t');
            if let Some(depth) = depths.get(&CellRef::new(x, y)) {
                line.push_str(&depth.to_string());
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_values() {
        let mut sheet = Sheet::new(2, 2).unwrap();
        sheet.set(0, 0, "1").unwrap();
        sheet.set(1, 1, "=A0*3").unwrap();
        assert_eq!(render_values(&sheet), "\tA\tB\n0\t1.0\t\n1\t\t3.0");
    }

    #[test]
    fn test_render_depths() {
        let mut sheet = Sheet::new(2, 1).unwrap();
        sheet.set(0, 0, "=B0").unwrap();
        sheet.set(1, 0, "=A0").unwrap();
        let depths = sheet.depth_map();
        assert_eq!(render_depths(&depths, 2, 1), "\tA\tB\n0\t*\t*");
    }
}

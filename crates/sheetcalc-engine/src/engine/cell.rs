//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellType`] - What the raw text of a cell was classified as
//! - [`Cell`] - Raw text plus its classification
//! - [`CellValue`] - The evaluated value of a cell
//! - [`CellKind`] - Classification combined with the evaluation outcome
//! - [`Grid`] - Dense, bounds-checked storage for a fixed-size sheet

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::error::FormulaError;
use super::formula::Formula;

/// The classified content of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellType {
    Text,
    Number(f64),
    Formula(Formula),
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    raw: String,
    contents: CellType,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            raw: String::new(),
            contents: CellType::Text,
        }
    }

    /// Classify raw user input.
    /// - Starts with '=' -> Formula (validity is checked at evaluation)
    /// - Finite decimal number -> Number
    /// - Otherwise, including empty -> Text
    pub fn from_input(input: &str) -> Cell {
        Cell {
            raw: input.to_string(),
            contents: classify(input),
        }
    }

    /// The text exactly as it was entered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn contents(&self) -> &CellType {
        &self.contents
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}

/// Map raw text to a cell type without side effects.
///
/// A formula needs `=` as the very first character; numbers may carry
/// surrounding whitespace.
pub fn classify(input: &str) -> CellType {
    if let Some(body) = input.strip_prefix('=') {
        return CellType::Formula(Formula::parse(body));
    }

    let trimmed = input.trim();
    if number_re().is_match(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellType::Number(n);
            }
        }
    }

    CellType::Text
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("number literal regex must compile")
    })
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

/// Classification of a cell after evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Number,
    Text,
    Formula,
    ErrorFormula,
    ErrorCycle,
}

impl CellKind {
    pub fn of(cell: &Cell, value: &CellValue) -> CellKind {
        match (cell.contents(), value) {
            (_, CellValue::Error(FormulaError::Cycle)) => CellKind::ErrorCycle,
            (_, CellValue::Error(_)) => CellKind::ErrorFormula,
            (CellType::Formula(_), _) => CellKind::Formula,
            (CellType::Number(_), _) => CellKind::Number,
            (CellType::Text, _) => CellKind::Text,
        }
    }
}

/// Dense storage for a `width x height` sheet.
///
/// Cells are stored column by column; every in-bounds coordinate has exactly
/// one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of empty cells. Dimensions are validated by the caller.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::new_empty(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.col < self.width && cell_ref.row < self.height
    }

    /// Storage index of a coordinate, or None when out of bounds.
    pub fn index_of(&self, cell_ref: &CellRef) -> Option<usize> {
        self.contains(cell_ref)
            .then(|| cell_ref.col * self.height + cell_ref.row)
    }

    /// Coordinate of a storage index.
    pub fn cell_ref_at(&self, index: usize) -> CellRef {
        CellRef::new(index / self.height, index % self.height)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.index_of(cell_ref).map(|idx| &self.cells[idx])
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// Replace the content of a cell, reclassifying it.
    /// Returns false when the coordinate is out of bounds.
    pub fn set(&mut self, cell_ref: &CellRef, input: &str) -> bool {
        match self.index_of(cell_ref) {
            Some(idx) => {
                self.cells[idx] = Cell::from_input(input);
                true
            }
            None => false,
        }
    }

    /// Storage indices of the in-bounds cells a cell's formula references.
    pub fn references(&self, index: usize) -> Vec<usize> {
        match self.cells[index].contents() {
            CellType::Formula(formula) => formula
                .references()
                .iter()
                .filter_map(|r| r.cell.as_ref())
                .filter_map(|cell_ref| self.index_of(cell_ref))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Iterate over all cells with their coordinates, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.cell_ref_at(idx), cell))
    }
}

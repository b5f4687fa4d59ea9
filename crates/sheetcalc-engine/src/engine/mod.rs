//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellType`], [`CellValue`], [`CellKind`], [`Grid`] - Data structures for cell storage
//! - [`classify`] - Raw text to cell type
//! - [`CellRef`] - Cell reference parsing (A0 notation ↔ column/row indices)
//! - [`Formula`] - Formula tokenizing and lowering to Rhai statements
//! - [`Evaluator`] - Formula evaluation over a grid
//! - [`depth_map`] - Longest reference chain per cell
//! - [`detect_cycle`], [`find_cycles`] - Circular dependency detection
//! - [`format_value`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod depth;
mod error;
mod eval;
mod format;
mod formula;

pub use cell::{Cell, CellKind, CellType, CellValue, Grid, classify};
pub use cell_ref::{CellRef, MAX_COLUMN};
pub use cycle::{Group, ReferenceWalk, detect_cycle, find_cycles, walk_grid};
pub use depth::{Depth, DepthMap, depth_map};
pub use error::FormulaError;
pub use eval::{Evaluator, create_engine, eval_formula};
pub use format::{ERR_CYCLE, ERR_FORM, format_number, format_value};
pub use formula::{Formula, Reference};

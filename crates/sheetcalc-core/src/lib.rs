//! sheetcalc-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::Sheet;
pub use error::{Result, SheetError};

pub use sheetcalc_engine::engine::{CellKind, CellRef, CellValue, Depth, DepthMap};

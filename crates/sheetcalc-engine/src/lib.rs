//! sheetcalc_engine - Spreadsheet engine: classification, formula evaluation
//! and the reference graph.

pub mod engine;

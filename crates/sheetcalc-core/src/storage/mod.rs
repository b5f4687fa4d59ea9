//! Sheet file format: a `<width>,<height>` header followed by one line of
//! comma separated raw cell text per column.

pub mod csv;
mod parser;
mod writer;

pub(crate) use parser::check_dimensions;
pub use parser::{MAX_SHEET_CELLS, parse_sheet, parse_sheet_content};
pub use writer::{write_sheet, write_sheet_content};

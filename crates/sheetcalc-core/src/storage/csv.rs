//! Field-level CSV reading and writing for sheet files.
//!
//! Unquoted fields are trimmed. Quoted fields are kept verbatim, may contain
//! commas, line breaks and `""`-escaped quotes, and may span several lines.
//! Anything but whitespace after a closing quote, a quote inside an unquoted
//! field, or an unterminated quote is a parse error.

use crate::error::{Result, SheetError};

/// One parsed record and the (1-based) line it starts on.
#[derive(Debug, PartialEq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV content into records, handling quoted fields.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
            }
            continue;
        }

        match c {
            '"' if field_was_quoted || !current.trim().is_empty() => {
                return Err(SheetError::Parse {
                    line,
                    message: "Unexpected quote inside a field".to_string(),
                });
            }
            '"' => {
                in_quotes = true;
                field_was_quoted = true;
                current.clear();
            }
            ',' => {
                fields.push(finish_field(&mut current, field_was_quoted));
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(finish_field(&mut current, field_was_quoted));
                field_was_quoted = false;
                records.push(Record {
                    line: record_line,
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                record_line = line;
            }
            _ if field_was_quoted => {
                if !c.is_whitespace() {
                    return Err(SheetError::Parse {
                        line,
                        message: format!("Unexpected '{}' after a closing quote", c),
                    });
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(SheetError::Parse {
            line: record_line,
            message: "Unterminated quoted field".to_string(),
        });
    }

    if !current.is_empty() || !fields.is_empty() || field_was_quoted {
        fields.push(finish_field(&mut current, field_was_quoted));
        records.push(Record {
            line: record_line,
            fields,
        });
    }
    Ok(records)
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted {
        field
    } else {
        field.trim().to_string()
    }
}

/// Escape a field for CSV output.
pub fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

use super::CellValue;

/// Display token for a formula that cannot be evaluated.
pub const ERR_FORM: &str = "ERR_FORM!";

/// Display token for a formula that is part of a reference cycle.
pub const ERR_CYCLE: &str = "ERR_CYCLE!";

/// Format an evaluated value for display.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Error(e) => e.token().to_string(),
    }
}

/// Format a number for display.
///
/// Integer-valued numbers keep their fractional part (`3.0`), including in
/// exponent form (`1.0e16`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "#NAN!".to_string();
    }
    if n.is_infinite() {
        return "#INF!".to_string();
    }
    let text = format!("{:?}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0e{}", mantissa, exponent)
        }
        _ => text,
    }
}

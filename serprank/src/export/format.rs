//! Text rendering of JSON values for prompts
//!
//! Training files have always printed numbers in shortest round-trip form
//! with a `.0` on integral floats and two-digit exponents outside
//! `[1e-4, 1e16)`. This covers numbers embedded in prompt text; JSON values
//! on each line are rendered by `serde_json`.

use serde_json::Value;

/// Render a float the way training prompts print it
///
/// ```
/// use serprank::export::format_float;
///
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(0.367879), "0.367879");
/// assert_eq!(format_float(4.5e-5), "4.5e-05");
/// assert_eq!(format_float(1e16), "1e+16");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let fixed = format!("{}", value);
    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

/// Render any JSON value as prompt text
///
/// Strings are inserted verbatim, integers plain, floats through
/// [`format_float`], booleans and null in their capitalized forms.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

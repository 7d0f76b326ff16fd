/// Format a number with thousands separators and a fixed number of decimal
/// places.
///
/// # Examples
///
/// ```
/// use fleet_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.0, 0), "1,234");
/// assert_eq!(format_number(61.54, 1), "61.5");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a few ULPs so binary midpoints such as 1.005 round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let formatted = format!("{:.prec$}", rounded, prec = decimals as usize);
    let (integer_part, frac_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };
    let grouped = group_thousands(integer_part);

    let result = match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

//! Parsing of free-text deposit tenures such as "12 months" or "5 Years".

/// Returns the first run of ASCII digits in `text` as an integer.
///
/// Signs and decimal points are not interpreted, so "-3" yields 3 and "1.5"
/// yields 1. `None` when the text has no digits or the run overflows.
pub fn leading_integer(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Converts a tenure string into a number of years.
///
/// "month" tenures are divided by 12, "year" tenures are taken as whole
/// years. Anything else, including an absent or empty tenure, counts as one
/// year. A recognised unit without a usable (non-zero) number also counts as
/// one year.
pub fn parse_tenure_years(tenure: Option<&str>) -> f64 {
    let tenure = match tenure {
        Some(t) if !t.trim().is_empty() => t.to_lowercase(),
        _ => return 1.0,
    };

    let (count, per_year) = if tenure.contains("month") {
        (leading_integer(&tenure), 12.0)
    } else if tenure.contains("year") {
        (leading_integer(&tenure), 1.0)
    } else {
        return 1.0;
    };

    match count {
        Some(n) if n > 0 => n as f64 / per_year,
        _ => 1.0,
    }
}

/// Format a dollar amount rounded to whole dollars with thousands
/// separators, e.g. `90000.4` → `$90,000`.
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(999.0), "$999");
        assert_eq!(format_usd(1000.0), "$1,000");
        assert_eq!(format_usd(90_000.4), "$90,000");
        assert_eq!(format_usd(1_234_567.5), "$1,234,568");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_usd(-2500.0), "-$2,500");
    }
}

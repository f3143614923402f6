//! Spanish number formatting for tables and cards: `1.234,50 €`

fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

/// Number with `.` thousands separator and `,` decimal separator
pub fn format_number(value: f64, decimals: usize) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", decimals, v);
    match formatted.split_once('.') {
        Some((int, frac)) => format!("{},{}", group_thousands(int), frac),
        None => group_thousands(&formatted),
    }
}

pub fn format_money(value: f64) -> String {
    format!("{} €", format_number(value, 2))
}

pub fn format_int(value: f64) -> String {
    format_number(value, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5), "1.234,50 €");
        assert_eq!(format_money(1234567.891), "1.234.567,89 €");
        assert_eq!(format_money(0.0), "0,00 €");
        assert_eq!(format_money(-999.0), "-999,00 €");
        assert_eq!(format_money(f64::NAN), "0,00 €");
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(100000.0), "100.000");
        assert_eq!(format_int(-1234.4), "-1.234");
    }
}

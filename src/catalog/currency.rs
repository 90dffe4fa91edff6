/// Format a whole-rupiah amount the way the shop prints prices: `Rp150.000`.
///
/// Digits are grouped in threes with `.`; there are never decimals.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-Rp{grouped}")
    } else {
        format!("Rp{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_thousands() {
        assert_eq!(format_rupiah(150_000), "Rp150.000");
        assert_eq!(format_rupiah(7_000), "Rp7.000");
        assert_eq!(format_rupiah(1_234_567), "Rp1.234.567");
    }

    #[test]
    fn test_small_amounts_have_no_separator() {
        assert_eq!(format_rupiah(0), "Rp0");
        assert_eq!(format_rupiah(999), "Rp999");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_rupiah(-25_000), "-Rp25.000");
        assert_eq!(format_rupiah(i64::MIN), "-Rp9.223.372.036.854.775.808");
    }
}

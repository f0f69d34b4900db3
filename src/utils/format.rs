//! Display formatting helpers for cell renderers

use chrono::{DateTime, NaiveDate, Utc};

/// Truncate to `max` characters, ending in an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// `$1,234,567` with cents dropped
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let whole = amount.abs().round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// `05 Feb 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// `05 Feb 2024 09:30`
pub fn format_datetime(when: DateTime<Utc>) -> String {
    when.format("%d %b %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("Kōwhai Street", 20), "Kōwhai Street");
        assert_eq!(truncate("Kōwhai Street", 4), "Kōw…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_250_000.0), "$1,250,000");
        assert_eq!(format_currency(-65_000.0), "-$65,000");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(format_date(d), "05 Feb 2024");
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(format_datetime(t), "01 Mar 2024 09:30");
    }
}

//! Date helper functions

use chrono::{DateTime, Datelike, Utc};

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Month abbreviations for a site language
pub fn month_abbreviations(language: &str) -> &'static [&'static str; 12] {
    match language.to_ascii_lowercase().as_str() {
        "pt-br" | "pt" => &MONTHS_PT_BR,
        _ => &MONTHS_EN,
    }
}

/// Format a publication date as `dd MMM yyyy` (e.g. "19 abr 2021").
///
/// A missing date renders as an empty string.
pub fn display_date(date: Option<&DateTime<Utc>>, language: &str) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let months = month_abbreviations(language);
    format!(
        "{:02} {} {}",
        date.day(),
        months[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_date_en() {
        let date = Utc.with_ymd_and_hms(2021, 4, 19, 20, 55, 29).unwrap();
        assert_eq!(display_date(Some(&date), "en"), "19 Apr 2021");
    }

    #[test]
    fn test_display_date_pt_br() {
        let date = Utc.with_ymd_and_hms(2021, 9, 3, 0, 0, 0).unwrap();
        assert_eq!(display_date(Some(&date), "pt-BR"), "03 set 2021");
    }

    #[test]
    fn test_display_date_missing() {
        assert_eq!(display_date(None, "en"), "");
    }
}

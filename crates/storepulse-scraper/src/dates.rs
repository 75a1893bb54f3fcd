//! Date parsing for review timestamps.
//!
//! Rendered pages show relative ages ("il y a 3 mois", "a week ago"), which
//! are resolved to approximate calendar days. API payloads carry absolute
//! timestamps in a handful of formats.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeDelta};

/// Ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum AgeUnit {
    SubDay,
    Day,
    Week,
    Month,
    Year,
}

fn age_unit(token: &str) -> Option<AgeUnit> {
    match token {
        "seconde" | "secondes" | "second" | "seconds" | "minute" | "minutes" | "heure"
        | "heures" | "hour" | "hours" => Some(AgeUnit::SubDay),
        "jour" | "jours" | "day" | "days" => Some(AgeUnit::Day),
        "semaine" | "semaines" | "week" | "weeks" => Some(AgeUnit::Week),
        "mois" | "month" | "months" => Some(AgeUnit::Month),
        "an" | "ans" | "année" | "années" | "year" | "years" => Some(AgeUnit::Year),
        _ => None,
    }
}

/// Resolve a relative age string against `today`.
///
/// Days and weeks subtract exactly. Months land on the 15th of the target
/// month and years on June 15th of the target year, since the page only
/// gives that much precision. A missing count means one; text with no
/// recognizable unit resolves to `today`.
#[must_use]
pub fn parse_relative_date(text: &str, today: NaiveDate) -> NaiveDate {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let count = tokens
        .iter()
        .find_map(|t| t.parse::<u32>().ok())
        .unwrap_or(1);

    // "an" is both the French year and the English article ("an hour ago"),
    // so the finest unit named in the text wins.
    let Some(unit) = tokens.iter().filter_map(|t| age_unit(t)).min() else {
        return today;
    };

    let resolved = match unit {
        AgeUnit::SubDay => Some(today),
        AgeUnit::Day => today.checked_sub_signed(TimeDelta::days(i64::from(count))),
        AgeUnit::Week => today.checked_sub_signed(TimeDelta::weeks(i64::from(count))),
        AgeUnit::Month => NaiveDate::from_ymd_opt(
            chrono::Datelike::year(&today),
            chrono::Datelike::month(&today),
            15,
        )
        .and_then(|mid| mid.checked_sub_months(Months::new(count))),
        AgeUnit::Year => i32::try_from(count)
            .ok()
            .and_then(|n| NaiveDate::from_ymd_opt(chrono::Datelike::year(&today) - n, 6, 15)),
    };

    resolved.unwrap_or(today)
}

const DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse an absolute timestamp from an API payload into a calendar day.
///
/// Returns `None` for anything unrecognized rather than guessing.
#[must_use]
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        })
}

/// Calendar day (UTC) of a Unix timestamp in seconds.
#[must_use]
pub fn date_from_unix(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn french_days_and_weeks() {
        let today = day(2024, 3, 20);
        assert_eq!(parse_relative_date("il y a 3 jours", today), day(2024, 3, 17));
        assert_eq!(parse_relative_date("il y a 2 semaines", today), day(2024, 3, 6));
        assert_eq!(parse_relative_date("il y a une semaine", today), day(2024, 3, 13));
    }

    #[test]
    fn months_land_on_the_fifteenth_and_wrap_years() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_relative_date("il y a 3 mois", today), day(2023, 11, 15));
        assert_eq!(parse_relative_date("a month ago", today), day(2024, 1, 15));
    }

    #[test]
    fn years_land_mid_june() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_relative_date("il y a 2 ans", today), day(2022, 6, 15));
        assert_eq!(parse_relative_date("il y a un an", today), day(2023, 6, 15));
        assert_eq!(parse_relative_date("5 years ago", today), day(2019, 6, 15));
    }

    #[test]
    fn hours_and_unknown_text_resolve_to_today() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_relative_date("an hour ago", today), today);
        assert_eq!(parse_relative_date("il y a 5 heures", today), today);
        assert_eq!(parse_relative_date("Modifié", today), today);
        assert_eq!(parse_relative_date("", today), today);
    }

    #[test]
    fn english_article_does_not_read_as_a_year() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_relative_date("an hour ago", today), today);
        assert_eq!(parse_relative_date("an minute ago", today), today);
        assert_eq!(parse_relative_date("a day ago", today), day(2024, 2, 27));
        assert_eq!(parse_relative_date("un an", today), day(2023, 6, 15));
    }

    #[test]
    fn api_dates_in_known_formats() {
        assert_eq!(parse_api_date("03/14/2024 12:34:56"), Some(day(2024, 3, 14)));
        assert_eq!(parse_api_date("2024-03-14 08:00:00"), Some(day(2024, 3, 14)));
        assert_eq!(parse_api_date("2024-03-14T23:10:00Z"), Some(day(2024, 3, 14)));
        assert_eq!(parse_api_date("2024-03-14"), Some(day(2024, 3, 14)));
    }

    #[test]
    fn api_dates_reject_garbage() {
        assert_eq!(parse_api_date(""), None);
        assert_eq!(parse_api_date("yesterday-ish"), None);
    }

    #[test]
    fn unix_timestamps() {
        assert_eq!(date_from_unix(1_710_374_400), Some(day(2024, 3, 14)));
    }
}

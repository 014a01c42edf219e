use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::str::FromStr;

use crate::error::IntakeError;

/// A date expressed relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDate {
    Today,
    Tomorrow,
    DayAfterTomorrow,
    InDays(u32),
    /// First such weekday strictly after today
    NextWeekday(Weekday),
    /// That weekday in the current week, rolling forward if already past
    ThisWeekday(Weekday),
    /// Day of the current month
    DayOfMonth(u32),
    /// Month and day; an earlier month than today's means next year
    MonthDay(u32, u32),
    Absolute(NaiveDate),
}

fn weekday(word: &str) -> Option<Weekday> {
    match word.trim_end_matches('.') {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// "19", "19th", "1st", "2nd", "3rd"
fn ordinal(word: &str) -> Option<u32> {
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))
        .unwrap_or(word);
    digits.parse().ok()
}

impl RelativeDate {
    /// Parse a date keyword. Returns `None` for anything unrecognised.
    pub fn parse(keyword: &str) -> Option<Self> {
        let normalized = keyword.trim().to_ascii_lowercase();
        let words: Vec<&str> = normalized.split_whitespace().collect();

        match words.as_slice() {
            ["today"] => Some(RelativeDate::Today),
            ["tomorrow"] => Some(RelativeDate::Tomorrow),
            ["day", "after", "tomorrow"] | ["the", "day", "after", "tomorrow"] => {
                Some(RelativeDate::DayAfterTomorrow)
            }
            ["in", n, "day" | "days"] | [n, "day" | "days", "later"] | [n, "days", "from", "now"] => {
                n.parse().ok().map(RelativeDate::InDays)
            }
            ["next", day] => weekday(day).map(RelativeDate::NextWeekday),
            ["this", day] => weekday(day).map(RelativeDate::ThisWeekday),
            ["day" | "the", n, "of", "this", "month"] | [n, "of", "this", "month"] | ["the", n] => {
                ordinal(n).map(RelativeDate::DayOfMonth)
            }
            [single] => Self::parse_numeric(single),
            _ => None,
        }
    }

    /// `YYYY-MM-DD` or `MM-DD` (also with `/`).
    fn parse_numeric(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(['-', '/']).collect();
        match parts.as_slice() {
            [y, m, d] if y.len() == 4 => {
                NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
                    .map(RelativeDate::Absolute)
            }
            [m, d] => Some(RelativeDate::MonthDay(m.parse().ok()?, d.parse().ok()?)),
            _ => None,
        }
    }

    /// The calendar date this keyword names, seen from `today`.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match *self {
            RelativeDate::Today => Some(today),
            RelativeDate::Tomorrow => today.succ_opt(),
            RelativeDate::DayAfterTomorrow => today.checked_add_signed(Duration::days(2)),
            RelativeDate::InDays(n) => today.checked_add_signed(Duration::days(i64::from(n))),
            RelativeDate::NextWeekday(target) => {
                let ahead = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
                let ahead = if ahead == 0 { 7 } else { ahead };
                today.checked_add_signed(Duration::days(i64::from(ahead)))
            }
            RelativeDate::ThisWeekday(target) => {
                let ahead = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
                today.checked_add_signed(Duration::days(i64::from(ahead)))
            }
            RelativeDate::DayOfMonth(day) => today.with_day(day),
            RelativeDate::MonthDay(month, day) => {
                let year = if month < today.month() { today.year() + 1 } else { today.year() };
                NaiveDate::from_ymd_opt(year, month, day)
            }
            RelativeDate::Absolute(date) => Some(date),
        }
    }
}

impl FromStr for RelativeDate {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| IntakeError::UnresolvedDate(s.to_string()))
    }
}

/// Parse and resolve in one step.
pub fn resolve_relative_date(keyword: &str, today: NaiveDate) -> Option<NaiveDate> {
    RelativeDate::parse(keyword)?.resolve(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    // A Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn simple_offsets() {
        assert_eq!(resolve_relative_date("Today", today()), Some(today()));
        assert_eq!(resolve_relative_date("tomorrow", today()), Some(date(10, 16)));
        assert_eq!(resolve_relative_date("day after tomorrow", today()), Some(date(10, 17)));
        assert_eq!(resolve_relative_date("in 3 days", today()), Some(date(10, 18)));
        assert_eq!(resolve_relative_date("10 days later", today()), Some(date(10, 25)));
    }

    #[test]
    fn next_weekday_is_strictly_after_today() {
        assert_eq!(resolve_relative_date("next friday", today()), Some(date(10, 17)));
        assert_eq!(resolve_relative_date("next wednesday", today()), Some(date(10, 22)));
        assert_eq!(resolve_relative_date("next monday", today()), Some(date(10, 20)));
    }

    #[test]
    fn this_weekday_rolls_forward_when_past() {
        assert_eq!(resolve_relative_date("this wednesday", today()), Some(today()));
        assert_eq!(resolve_relative_date("this friday", today()), Some(date(10, 17)));
        assert_eq!(resolve_relative_date("this monday", today()), Some(date(10, 20)));
    }

    #[test]
    fn month_days() {
        assert_eq!(resolve_relative_date("the 19th", today()), Some(date(10, 19)));
        assert_eq!(resolve_relative_date("day 3 of this month", today()), Some(date(10, 3)));
        assert_eq!(resolve_relative_date("10-19", today()), Some(date(10, 19)));
        assert_eq!(
            resolve_relative_date("01-05", today()),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(resolve_relative_date("2025-12-01", today()), Some(date(12, 1)));
        assert_eq!(resolve_relative_date("day 31 of this month", date(11, 1)), None);
    }

    #[test]
    fn unknown_keywords_do_not_parse() {
        assert_eq!(RelativeDate::parse("someday"), None);
        assert!("next blursday".parse::<RelativeDate>().is_err());
    }
}

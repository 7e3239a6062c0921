//! Calendar model for a planning month.
//!
//! Days carry their weekday, weekend flag and week number. Weekday names
//! follow the Dutch labels used on the duty sheets (`maandag` ... `zondag`);
//! English full names are accepted when parsing.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::WeekNumbering;

const DUTCH_NAMES: [&str; 7] = [
    "maandag",
    "dinsdag",
    "woensdag",
    "donderdag",
    "vrijdag",
    "zaterdag",
    "zondag",
];

const ENGLISH_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Dutch display name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    DUTCH_NAMES[weekday.num_days_from_monday() as usize]
}

/// Parses a Dutch or English weekday name (case-insensitive).
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let lower = name.trim().to_lowercase();
    DUTCH_NAMES
        .iter()
        .position(|n| *n == lower)
        .or_else(|| ENGLISH_NAMES.iter().position(|n| *n == lower))
        .and_then(|idx| Weekday::try_from(idx as u8).ok())
}

/// One calendar day of the planning month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Calendar date.
    pub date: NaiveDate,
    /// Weekday of `date`.
    pub weekday: Weekday,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// 1-based week number inside the month.
    pub week: u32,
}

impl Day {
    pub fn new(date: NaiveDate, numbering: WeekNumbering) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            weekday,
            is_weekend: is_weekend(weekday),
            week: week_of_month(date, numbering),
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// The following calendar day (may fall in the next month).
    pub fn next_date(&self) -> Option<NaiveDate> {
        self.date.succ_opt()
    }

    /// Date on which a sleep-in duty on this day is recuperated.
    ///
    /// Friday sleep-ins recuperate on Monday; all others the next day.
    pub fn recuperation_date(&self) -> Option<NaiveDate> {
        let offset = if self.weekday == Weekday::Fri { 3 } else { 1 };
        self.date.checked_add_days(Days::new(offset))
    }
}

#[inline]
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Week number of a date within its month.
pub fn week_of_month(date: NaiveDate, numbering: WeekNumbering) -> u32 {
    match numbering {
        WeekNumbering::MonthRelative => (date.day() - 1) / 7 + 1,
        WeekNumbering::Calendar => {
            let first = date.with_day(1).unwrap_or(date);
            let offset = first.weekday().num_days_from_monday();
            (date.day() - 1 + offset) / 7 + 1
        }
    }
}

/// Number of days in a month, or `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// All days of a month in chronological order.
///
/// Returns an empty vector for an invalid year/month.
pub fn month_days(year: i32, month: u32, numbering: WeekNumbering) -> Vec<Day> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|d| Day::new(d, numbering))
        .collect()
}

/// The month preceding `year`/`month`, wrapping January to December.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// `YYYY-MM` key for a month.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Wed), "woensdag");
        assert_eq!(parse_weekday("Woensdag"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("friday"), Some(Weekday::Fri));
        assert_eq!(parse_weekday("funday"), None);
    }

    #[test]
    fn test_march_2025() {
        let days = month_days(2025, 3, WeekNumbering::MonthRelative);
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].weekday, Weekday::Sat);
        assert!(days[0].is_weekend);
        assert_eq!(days.iter().filter(|d| d.is_weekend).count(), 10);
        assert_eq!(days[30].week, 5);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_month_relative_weeks() {
        assert_eq!(week_of_month(date(2025, 3, 1), WeekNumbering::MonthRelative), 1);
        assert_eq!(week_of_month(date(2025, 3, 7), WeekNumbering::MonthRelative), 1);
        assert_eq!(week_of_month(date(2025, 3, 8), WeekNumbering::MonthRelative), 2);
        assert_eq!(week_of_month(date(2025, 3, 29), WeekNumbering::MonthRelative), 5);
    }

    #[test]
    fn test_calendar_weeks() {
        // 2025-03-01 is a Saturday: week 1 is Sat+Sun, Monday the 3rd starts week 2.
        assert_eq!(week_of_month(date(2025, 3, 1), WeekNumbering::Calendar), 1);
        assert_eq!(week_of_month(date(2025, 3, 2), WeekNumbering::Calendar), 1);
        assert_eq!(week_of_month(date(2025, 3, 3), WeekNumbering::Calendar), 2);
        assert_eq!(week_of_month(date(2025, 3, 31), WeekNumbering::Calendar), 6);
    }

    #[test]
    fn test_recuperation_date() {
        let friday = Day::new(date(2025, 3, 7), WeekNumbering::MonthRelative);
        assert_eq!(friday.recuperation_date(), Some(date(2025, 3, 10)));
        let saturday = Day::new(date(2025, 3, 8), WeekNumbering::MonthRelative);
        assert_eq!(saturday.recuperation_date(), Some(date(2025, 3, 9)));
    }

    #[test]
    fn test_previous_month() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
        assert_eq!(month_key(2025, 3), "2025-03");
    }
}

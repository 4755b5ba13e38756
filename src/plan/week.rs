//! ISO-8601 week arithmetic for the weekly plan grid.
//!
//! Week 1 is the week containing January 4th. Weeks start on Monday and a
//! date belongs to the week of its Thursday.

use chrono::{Datelike, NaiveDate, TimeDelta};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn week_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-W(\d{2})$").expect("valid week pattern"))
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Weekday number with Monday = 1 and Sunday = 7
fn iso_weekday(date: NaiveDate) -> i64 {
    i64::from(date.weekday().number_from_monday())
}

/// A `YYYY-Www` week selector value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoWeek {
    year: i32,
    week: u32,
    monday: NaiveDate,
}

impl IsoWeek {
    /// Week `week` of ISO year `year`
    pub fn new(year: i32, week: u32) -> Option<Self> {
        if !(1..=9999).contains(&year) || !(1..=53).contains(&week) {
            return None;
        }

        let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
        let week_one_monday = shift(jan4, -(iso_weekday(jan4) - 1));
        let monday = shift(week_one_monday, 7 * (i64::from(week) - 1));

        // week 53 only exists in long years
        if Self::containing(monday).week != week {
            return None;
        }

        Some(Self { year, week, monday })
    }

    /// The week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let weekday = iso_weekday(date);
        let thursday = shift(date, 4 - weekday);

        Self {
            year: thursday.year(),
            week: thursday.ordinal0() / 7 + 1,
            monday: shift(date, -(weekday - 1)),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Monday through Sunday of this week
    pub fn dates(&self) -> WeekDates {
        WeekDates(std::array::from_fn(|i| shift(self.monday, i as i64)))
    }

    pub fn next(&self) -> Self {
        Self::containing(shift(self.monday, 7))
    }

    pub fn previous(&self) -> Self {
        Self::containing(shift(self.monday, -7))
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeek {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = week_pattern()
            .captures(s.trim())
            .ok_or_else(|| anyhow::anyhow!("Expected a week like 2024-W23, got '{}'", s))?;

        let year: i32 = captures[1].parse()?;
        let week: u32 = captures[2].parse()?;

        IsoWeek::new(year, week).ok_or_else(|| anyhow::anyhow!("Week out of range: {}", s))
    }
}

/// The seven dates of one week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDates([NaiveDate; 7]);

impl WeekDates {
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn first(&self) -> NaiveDate {
        self.0[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.0[6]
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.0
    }

    /// Dates paired with their weekday names
    pub fn named(&self) -> impl Iterator<Item = (NaiveDate, &'static str)> + '_ {
        self.iter().zip(WEEKDAY_NAMES)
    }
}

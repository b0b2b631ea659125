use chrono::{Datelike, Local, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::form;

/// Maps a Sunday-based weekday number (Sunday = 0 ... Saturday = 6) onto a
/// Monday-first week (Monday = 0 ... Sunday = 6).
///
/// Domain and codomain are both `0..=6`.
pub fn monday_first(days_from_sunday: u32) -> u32 {
    debug_assert!(days_from_sunday < 7, "weekday out of range");
    (days_from_sunday + 6) % 7
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1);
    let next_first = if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
    };

    match (first, next_first) {
        (Some(first), Some(next_first)) => {
            next_first.signed_duration_since(first).num_days() as u32
        }
        _ => panic!("{} {} is outside the supported date range", month.name(), year),
    }
}

/// A (year, month) pair identifying one rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    pub fn from_number(month: u32, year: i32) -> Result<Self> {
        Month::from_u32(month)
            .map(|index| MonthIndex::new(index, year))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{} is not a month number", month),
                )
            })
    }

    fn from_total(total: i32) -> Self {
        let month = (total.rem_euclid(12) + 1) as u32;
        MonthIndex {
            index: Month::from_u32(month).unwrap_or(Month::January),
            year: total.div_euclid(12),
        }
    }

    fn total(&self) -> i32 {
        self.year * 12 + self.index.number_from_month() as i32 - 1
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn name(&self) -> &'static str {
        self.index.name()
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.index, self.year)
    }

    pub fn first_day(&self) -> CalendarDate {
        CalendarDate::from_ymd(self.year, self.number(), 1)
            .unwrap_or_else(|e| panic!("first day of {} does not exist: {}", self, e))
    }

    /// Number of grid cells in front of the first day, Monday-first.
    pub fn leading_offset(&self) -> u32 {
        self.first_day().weekday0()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        date.month_index() == *self
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// First and last month that can be laid out as a grid. Their neighbours
    /// still lie within chrono's calendar.
    pub fn supported_range() -> (MonthIndex, MonthIndex) {
        (
            MonthIndex::from(NaiveDate::MIN).next(),
            MonthIndex::from(NaiveDate::MAX).prev(),
        )
    }

    /// `None` if the result leaves `supported_range`.
    pub fn checked_add(self, months: u32) -> Option<Self> {
        self.checked_offset(i64::from(months))
    }

    /// `None` if the result leaves `supported_range`.
    pub fn checked_sub(self, months: u32) -> Option<Self> {
        self.checked_offset(-i64::from(months))
    }

    fn checked_offset(self, months: i64) -> Option<Self> {
        let (first, last) = MonthIndex::supported_range();
        let total = i64::from(self.total()) + months;

        if total < i64::from(first.total()) || total > i64::from(last.total()) {
            None
        } else {
            Some(MonthIndex::from_total(total as i32))
        }
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::from(Local::now().date_naive())
    }
}

impl From<NaiveDate> for MonthIndex {
    fn from(date: NaiveDate) -> Self {
        MonthIndex::new(
            Month::from_u32(date.month()).unwrap_or(Month::January),
            date.year(),
        )
    }
}

impl From<CalendarDate> for MonthIndex {
    fn from(date: CalendarDate) -> Self {
        MonthIndex::from(date.0)
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total(self.total() + rhs as i32)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total(self.total() - rhs as i32)
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total().cmp(&other.total())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.name())
    }
}

/// A day of the calendar. Only existing dates can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{:04}-{:02}-{:02} is not a valid calendar date", year, month, day),
                )
            })
    }

    pub fn today() -> Self {
        CalendarDate(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Weekday with Monday = 0 ... Sunday = 6.
    pub fn weekday0(&self) -> u32 {
        monday_first(self.0.weekday().num_days_from_sunday())
    }

    pub fn month_index(&self) -> MonthIndex {
        MonthIndex::from(self.0)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        form::parse_exact_date(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monday_first_wraps_sunday() {
        assert_eq!(monday_first(0), 6);
        assert_eq!(monday_first(1), 0);
        assert_eq!(monday_first(6), 5);
        let mapped: Vec<u32> = (0..7).map(monday_first).collect();
        assert_eq!(mapped, vec![6, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn days_of_month_handles_leap_years() {
        assert_eq!(days_of_month(&Month::February, 2024), 29);
        assert_eq!(days_of_month(&Month::February, 2023), 28);
        assert_eq!(days_of_month(&Month::February, 1900), 28);
        assert_eq!(days_of_month(&Month::February, 2000), 29);
        assert_eq!(days_of_month(&Month::December, 2023), 31);
        assert_eq!(days_of_month(&Month::April, 2023), 30);
    }

    #[test]
    fn month_index_rolls_over_years() {
        let december = MonthIndex::new(Month::December, 2023);
        assert_eq!(december.next(), MonthIndex::new(Month::January, 2024));

        let january = MonthIndex::new(Month::January, 2024);
        assert_eq!(january.prev(), december);

        assert_eq!(january + 25, MonthIndex::new(Month::February, 2026));
        assert_eq!(january - 13, MonthIndex::new(Month::December, 2022));
        assert!(december < january);
    }

    #[test]
    fn checked_arithmetic_stays_in_range() {
        let january = MonthIndex::new(Month::January, 2024);
        assert_eq!(january.checked_add(25), Some(january + 25));
        assert_eq!(january.checked_sub(13), Some(january - 13));
        assert_eq!(january.checked_add(3_200_000), None);
        assert_eq!(january.checked_sub(u32::MAX), None);

        let (first, last) = MonthIndex::supported_range();
        assert_eq!(last.checked_add(1), None);
        assert_eq!(first.checked_sub(1), None);
        assert_eq!(first.checked_add(0), Some(first));

        // Both ends must still be drawable.
        assert!(last.num_days() > 0 && last.next().first_day() > last.first_day());
        assert!(first.prev().num_days() > 0);
    }

    #[test]
    fn leading_offset_is_monday_based() {
        // 2024-01-01 is a Monday, 2024-02-01 a Thursday, 2024-09-01 a Sunday
        assert_eq!(MonthIndex::new(Month::January, 2024).leading_offset(), 0);
        assert_eq!(MonthIndex::new(Month::February, 2024).leading_offset(), 3);
        assert_eq!(MonthIndex::new(Month::September, 2024).leading_offset(), 6);
    }

    #[test]
    fn calendar_date_rejects_nonexistent_days() {
        assert!(CalendarDate::from_ymd(2023, 2, 29).is_err());
        assert!(CalendarDate::from_ymd(2023, 13, 1).is_err());
        assert!(CalendarDate::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn calendar_date_display_and_parse() {
        let date: CalendarDate = "2024-03-07".parse().expect("valid date literal");
        assert_eq!(date.to_string(), "2024-03-07");
        assert_eq!(date.month_index().to_string(), "2024 March");
        assert!("2024-3-7".parse::<CalendarDate>().is_err());
    }
}

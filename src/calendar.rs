use chrono::{Datelike, Month, NaiveDate};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::cycle::{CycleParameters, Phase};
use crate::error::{Error, ErrorKind, Result};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    MonthIndex::new(*month, year)
        .days()
        .map_or(0, |days| days.len() as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Monday
    }
}

impl WeekStart {
    pub fn header(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        }
    }

    /// Number of empty cells before `first` in its week row.
    pub fn leading_blanks(&self, first: NaiveDate) -> usize {
        let weekday = first.weekday();
        match self {
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub phase: Phase,
    pub is_today: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    month: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(month: Month, year: i32) -> Self {
        MonthIndex { month, year }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// Shift by a signed number of months.
    pub fn shift(&self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() + months)
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1).ok_or_else(|| {
            Error::new(ErrorKind::DateOutOfRange, &format!("{} is not representable", self))
        })
    }

    pub fn days(&self) -> Result<Vec<NaiveDate>> {
        let first = self.first_day()?;
        Ok(first
            .iter_days()
            .take_while(|day| day.month() == first.month())
            .collect())
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        *self == MonthIndex::from(*date)
    }

    /// Phase of every day of this month, in order.
    pub fn classify(&self, params: &CycleParameters, today: NaiveDate) -> Result<Vec<DayEntry>> {
        let entries: Vec<DayEntry> = self
            .days()?
            .into_iter()
            .map(|date| DayEntry {
                date,
                phase: params.classify(date),
                is_today: date == today,
            })
            .collect();

        log::debug!("Classified {} days of {}", entries.len(), self);
        Ok(entries)
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month.number_from_month()) - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        MonthIndex {
            month: MONTHS[ordinal.rem_euclid(12) as usize],
            year: ordinal.div_euclid(12) as i32,
        }
    }
}

/// Splits a month into week rows, padding the first row with `None`.
pub fn weeks(entries: &[DayEntry], week_start: WeekStart) -> Vec<Vec<Option<DayEntry>>> {
    let blanks = entries
        .first()
        .map_or(0, |entry| week_start.leading_blanks(entry.date));

    let cells: Vec<Option<DayEntry>> = std::iter::repeat(None)
        .take(blanks)
        .chain(entries.iter().copied().map(Some))
        .collect();

    cells.chunks(7).map(|week| week.to_vec()).collect()
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(MONTHS[m.month0() as usize], m.year())
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        self.shift(i64::from(rhs))
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        self.shift(-i64::from(rhs))
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

impl FromStr for MonthIndex {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|e| Error::from(e).with_msg(&format!("'{}' is not a YYYY-MM month", s)))?;
        Ok(MonthIndex::from(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_of_month(&Month::February, 2024), 29);
        assert_eq!(days_of_month(&Month::February, 2023), 28);
        assert_eq!(days_of_month(&Month::December, 2023), 31);
        assert_eq!(days_of_month(&Month::April, 2024), 30);
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        let dec = MonthIndex::new(Month::December, 2023);
        let jan = MonthIndex::new(Month::January, 2024);

        assert_eq!(dec.next(), jan);
        assert_eq!(jan.prev(), dec);
        assert_eq!(dec + 13, MonthIndex::new(Month::January, 2025));
        assert_eq!(MonthIndex::new(Month::March, 2024) - 25, MonthIndex::new(Month::February, 2022));
        assert_eq!(jan.shift(-12), MonthIndex::new(Month::January, 2023));
        assert!(dec < jan);
        assert!(MonthIndex::new(Month::November, 2024) > jan);
    }

    #[test]
    fn parse_and_display() {
        let march: MonthIndex = "2024-03".parse().unwrap();
        assert_eq!(march, MonthIndex::new(Month::March, 2024));
        assert_eq!(march.to_string(), "March 2024");
        assert!(matches!(
            "2024-13".parse::<MonthIndex>().unwrap_err().kind,
            ErrorKind::DateParse
        ));
        assert!("march".parse::<MonthIndex>().is_err());
    }

    #[test]
    fn month_of_date() {
        let index = MonthIndex::from(date(2024, 2, 29));
        assert_eq!(index, MonthIndex::new(Month::February, 2024));
        assert!(index.contains(&date(2024, 2, 1)));
        assert!(!index.contains(&date(2023, 2, 1)));
    }

    #[test]
    fn week_rows_depend_on_week_start() {
        // March 1st 2024 is a Friday.
        let first = date(2024, 3, 1);
        assert_eq!(WeekStart::Monday.leading_blanks(first), 4);
        assert_eq!(WeekStart::Sunday.leading_blanks(first), 5);

        let params = CycleParameters::new(date(2024, 3, 1), 28, 5).unwrap();
        let entries = MonthIndex::new(Month::March, 2024)
            .classify(&params, date(2024, 3, 15))
            .unwrap();

        let monday_weeks = weeks(&entries, WeekStart::Monday);
        assert_eq!(monday_weeks.len(), 5);
        assert!(monday_weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(monday_weeks[0][4].map(|e| e.date), Some(first));

        let sunday_weeks = weeks(&entries, WeekStart::Sunday);
        assert_eq!(sunday_weeks.len(), 6);
        assert_eq!(sunday_weeks[5].len(), 1);
    }

    #[test]
    fn classify_marks_phases_and_today() {
        let params = CycleParameters::new(date(2024, 3, 1), 28, 5).unwrap();
        let entries = MonthIndex::new(Month::March, 2024)
            .classify(&params, date(2024, 3, 15))
            .unwrap();

        assert_eq!(entries.len(), 31);
        assert_eq!(entries[0].phase, Phase::Period);
        assert_eq!(entries[14].phase, Phase::Ovulation);
        assert!(entries[14].is_today);
        assert_eq!(entries.iter().filter(|e| e.is_today).count(), 1);
        assert_eq!(entries[30].phase, Phase::Period);
    }
}

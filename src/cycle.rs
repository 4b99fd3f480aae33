//! Classification of calendar days into cycle phases.
//!
//! All arithmetic happens on [`NaiveDate`]s: a day is a calendar date, there
//! is no notion of time-of-day or timezone. Both the classifier and the
//! derived dates share [`add_days`] and `signed_duration_since`, so they
//! always agree on where a day begins.

use chrono::{Duration, NaiveDate};
use derive_more::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Ovulation is placed this many days before the next period.
pub const LUTEAL_PHASE_DAYS: i64 = 14;
pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;
pub const FERTILE_DAYS_AFTER_OVULATION: i64 = 1;
pub const PREMENSTRUAL_DAYS: i64 = 5;

pub const SUGGESTED_CYCLE_LENGTH: RangeInclusive<u32> = 21..=35;
pub const SUGGESTED_PERIOD_LENGTH: RangeInclusive<u32> = 3..=7;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    #[display(fmt = "period")]
    Period,
    #[display(fmt = "fertile")]
    Fertile,
    #[display(fmt = "ovulation")]
    Ovulation,
    #[display(fmt = "premenstrual")]
    Premenstrual,
    #[display(fmt = "normal")]
    Normal,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Period,
        Phase::Fertile,
        Phase::Ovulation,
        Phase::Premenstrual,
        Phase::Normal,
    ];

    /// Marker drawn next to the day number, readable without colors.
    pub fn symbol(&self) -> char {
        match self {
            Phase::Period => '~',
            Phase::Fertile => '+',
            Phase::Ovulation => 'o',
            Phase::Premenstrual => '-',
            Phase::Normal => ' ',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Period => "Period",
            Phase::Fertile => "Fertile days",
            Phase::Ovulation => "Ovulation",
            Phase::Premenstrual => "Premenstrual",
            Phase::Normal => "Normal",
        }
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidParameter,
                    &format!("'{}' is not a cycle phase", s),
                )
            })
    }
}

/// Session-scoped description of a regular cycle.
///
/// Only constructible through [`CycleParameters::new`], which rejects
/// lengths the classifier cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleParameters {
    last_period_start: NaiveDate,
    cycle_length: u32,
    period_length: u32,
}

impl CycleParameters {
    pub fn new(last_period_start: NaiveDate, cycle_length: u32, period_length: u32) -> Result<Self> {
        if cycle_length == 0 {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                "cycle length must be at least one day",
            ));
        }

        if period_length == 0 {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                "period length must be at least one day",
            ));
        }

        if period_length >= cycle_length {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                &format!(
                    "period length ({}) must be shorter than the cycle length ({})",
                    period_length, cycle_length
                ),
            ));
        }

        Ok(CycleParameters {
            last_period_start,
            cycle_length,
            period_length,
        })
    }

    pub fn last_period_start(&self) -> NaiveDate {
        self.last_period_start
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    pub fn period_length(&self) -> u32 {
        self.period_length
    }

    pub fn within_suggested_ranges(&self) -> bool {
        SUGGESTED_CYCLE_LENGTH.contains(&self.cycle_length)
            && SUGGESTED_PERIOD_LENGTH.contains(&self.period_length)
    }

    /// Whole days from the last period start to `date`, negative for earlier dates.
    pub fn days_since_start(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.last_period_start).num_days()
    }

    /// Zero-based offset of `date` within its cycle, always in `[0, cycle_length)`.
    pub fn day_in_cycle(&self, date: NaiveDate) -> i64 {
        self.days_since_start(date)
            .rem_euclid(i64::from(self.cycle_length))
    }

    // Not clamped: cycles shorter than the luteal phase yield a negative
    // day that no day-in-cycle ever matches.
    pub fn ovulation_day(&self) -> i64 {
        i64::from(self.cycle_length) - LUTEAL_PHASE_DAYS
    }

    pub fn fertile_window(&self) -> RangeInclusive<i64> {
        let ovulation = self.ovulation_day();
        (ovulation - FERTILE_DAYS_BEFORE_OVULATION)..=(ovulation + FERTILE_DAYS_AFTER_OVULATION)
    }

    pub fn premenstrual_start(&self) -> i64 {
        i64::from(self.cycle_length) - PREMENSTRUAL_DAYS
    }

    pub fn classify(&self, date: NaiveDate) -> Phase {
        let day = self.day_in_cycle(date);

        if day < i64::from(self.period_length) {
            Phase::Period
        } else if day == self.ovulation_day() {
            Phase::Ovulation
        } else if self.fertile_window().contains(&day) {
            Phase::Fertile
        } else if day >= self.premenstrual_start() {
            Phase::Premenstrual
        } else {
            Phase::Normal
        }
    }

    pub fn next_period_date(&self) -> Result<NaiveDate> {
        add_days(self.last_period_start, i64::from(self.cycle_length))
    }

    pub fn next_ovulation_date(&self) -> Result<NaiveDate> {
        add_days(self.last_period_start, self.ovulation_day())
    }

    /// First day of the cycle `date` belongs to.
    pub fn cycle_start(&self, date: NaiveDate) -> Result<NaiveDate> {
        add_days(date, -self.day_in_cycle(date))
    }

    /// Start of the first period strictly after `today`.
    pub fn upcoming_period(&self, today: NaiveDate) -> Result<NaiveDate> {
        add_days(
            today,
            i64::from(self.cycle_length) - self.day_in_cycle(today),
        )
    }
}

pub fn classify_day(date: NaiveDate, params: &CycleParameters) -> Phase {
    params.classify(date)
}

pub fn next_period_date(params: &CycleParameters) -> Result<NaiveDate> {
    params.next_period_date()
}

pub fn next_ovulation_date(params: &CycleParameters) -> Result<NaiveDate> {
    params.next_ovulation_date()
}

pub(crate) fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days)).ok_or_else(|| {
        Error::new(
            ErrorKind::DateOutOfRange,
            &format!("{} shifted by {} days", date, days),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn regular() -> CycleParameters {
        CycleParameters::new(date(2024, 3, 1), 28, 5).unwrap()
    }

    fn phases_of_cycle(params: &CycleParameters) -> Vec<Phase> {
        let start = params.last_period_start();
        (0..i64::from(params.cycle_length()))
            .map(|offset| params.classify(start + Duration::days(offset)))
            .collect()
    }

    #[test]
    fn rejects_unusable_lengths() {
        let start = date(2024, 1, 1);

        assert!(CycleParameters::new(start, 0, 5).unwrap_err().is_invalid_parameter());
        assert!(CycleParameters::new(start, 28, 0).unwrap_err().is_invalid_parameter());
        assert!(CycleParameters::new(start, 28, 28).unwrap_err().is_invalid_parameter());
        assert!(CycleParameters::new(start, 5, 7).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn accepts_lengths_outside_suggested_ranges() {
        let params = CycleParameters::new(date(2024, 1, 1), 40, 9).unwrap();
        assert!(!params.within_suggested_ranges());
        assert!(regular().within_suggested_ranges());
    }

    #[test]
    fn regular_cycle_windows() {
        let params = regular();
        assert_eq!(params.ovulation_day(), 14);
        assert_eq!(params.fertile_window(), 9..=15);
        assert_eq!(params.premenstrual_start(), 23);

        let phases = phases_of_cycle(&params);
        let count = |phase| phases.iter().filter(|p| **p == phase).count();

        assert_eq!(count(Phase::Period), 5);
        assert_eq!(count(Phase::Fertile), 6);
        assert_eq!(count(Phase::Ovulation), 1);
        assert_eq!(count(Phase::Premenstrual), 5);
        assert_eq!(count(Phase::Normal), 11);
    }

    #[test]
    fn period_takes_priority() {
        // Ovulation on day 4 and a fertile window from day -1, both inside the period.
        let params = CycleParameters::new(date(2024, 1, 1), 18, 6).unwrap();
        let phases = phases_of_cycle(&params);

        assert!(phases[..6].iter().all(|p| *p == Phase::Period));
        assert!(!phases.contains(&Phase::Ovulation));
        assert!(!phases.contains(&Phase::Fertile));
    }

    #[test]
    fn ovulation_is_a_single_day() {
        let params = regular();
        let phases = phases_of_cycle(&params);

        let ovulation_days: Vec<usize> = phases
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == Phase::Ovulation)
            .map(|(day, _)| day)
            .collect();

        assert_eq!(ovulation_days, vec![14]);
    }

    #[test]
    fn short_cycle_keeps_literal_arithmetic() {
        // Ovulation day -4 and fertile window -9..=-3 never match.
        let params = CycleParameters::new(date(2024, 1, 1), 10, 3).unwrap();
        assert_eq!(params.ovulation_day(), -4);

        let expected = vec![
            Phase::Period,
            Phase::Period,
            Phase::Period,
            Phase::Normal,
            Phase::Normal,
            Phase::Premenstrual,
            Phase::Premenstrual,
            Phase::Premenstrual,
            Phase::Premenstrual,
            Phase::Premenstrual,
        ];
        assert_eq!(phases_of_cycle(&params), expected);
    }

    #[test]
    fn classification_is_periodic() {
        for &(cycle, period) in &[(28, 5), (21, 3), (35, 7), (12, 4), (45, 10)] {
            let params = CycleParameters::new(date(2023, 11, 17), cycle, period).unwrap();
            let shift = Duration::days(i64::from(cycle));

            for offset in -200..200 {
                let day = date(2024, 2, 10) + Duration::days(offset);
                assert_eq!(params.classify(day), params.classify(day + shift));
            }
        }
    }

    #[test]
    fn dates_before_start_map_to_previous_cycle() {
        let params = CycleParameters::new(date(2024, 1, 1), 28, 5).unwrap();

        assert_eq!(params.days_since_start(date(2023, 12, 30)), -2);
        assert_eq!(params.day_in_cycle(date(2023, 12, 30)), 26);
        assert_eq!(params.day_in_cycle(date(2024, 1, 27)), 26);
        assert_eq!(
            params.classify(date(2023, 12, 30)),
            params.classify(date(2024, 1, 26))
        );
        assert_eq!(params.classify(date(2023, 12, 30)), Phase::Premenstrual);
    }

    #[test]
    fn full_month_scenario() {
        let params = regular();

        let expect = |from: u32, to: u32, phase: Phase| {
            for day in from..=to {
                assert_eq!(params.classify(date(2024, 3, day)), phase, "2024-03-{}", day);
            }
        };

        expect(1, 5, Phase::Period);
        expect(6, 9, Phase::Normal);
        expect(10, 14, Phase::Fertile);
        expect(15, 15, Phase::Ovulation);
        expect(16, 16, Phase::Fertile);
        expect(17, 23, Phase::Normal);
        expect(24, 28, Phase::Premenstrual);
        expect(29, 31, Phase::Period);
    }

    #[test]
    fn derived_dates_agree_with_classifier() {
        let params = regular();

        let next_period = params.next_period_date().unwrap();
        assert_eq!(next_period, date(2024, 3, 29));
        assert_eq!(params.day_in_cycle(next_period), 0);
        assert_eq!(classify_day(next_period, &params), Phase::Period);

        let next_ovulation = params.next_ovulation_date().unwrap();
        assert_eq!(next_ovulation, date(2024, 3, 15));
        assert_eq!(classify_day(next_ovulation, &params), Phase::Ovulation);

        assert_eq!(next_period_date(&params).unwrap(), next_period);
        assert_eq!(next_ovulation_date(&params).unwrap(), next_ovulation);
    }

    #[test]
    fn upcoming_period_is_strictly_after_today() {
        let params = regular();

        assert_eq!(params.upcoming_period(date(2024, 3, 10)).unwrap(), date(2024, 3, 29));
        assert_eq!(params.upcoming_period(date(2024, 3, 29)).unwrap(), date(2024, 4, 26));
        assert_eq!(params.upcoming_period(date(2024, 2, 28)).unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn cycle_start_of_any_date() {
        let params = regular();

        assert_eq!(params.cycle_start(date(2024, 3, 20)).unwrap(), date(2024, 3, 1));
        assert_eq!(params.cycle_start(date(2024, 2, 28)).unwrap(), date(2024, 2, 2));
    }

    #[test]
    fn out_of_range_shift_is_an_error() {
        let params = CycleParameters::new(NaiveDate::MAX, 28, 5).unwrap();
        assert!(matches!(
            params.next_period_date().unwrap_err().kind,
            ErrorKind::DateOutOfRange
        ));
    }

    #[test]
    fn phase_parses_from_its_name() {
        for phase in Phase::ALL.iter() {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), *phase);
        }
        assert_eq!(" Ovulation ".parse::<Phase>().unwrap(), Phase::Ovulation);
        assert!("luteal".parse::<Phase>().is_err());
    }
}

use chrono::NaiveDate;
use std::convert::TryFrom;

use crate::config::CycleDefaults;
use crate::cycle::{CycleParameters, SUGGESTED_CYCLE_LENGTH, SUGGESTED_PERIOD_LENGTH};
use crate::error::{Error, ErrorKind, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LastPeriod,
    CycleLength,
    PeriodLength,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::LastPeriod, Field::CycleLength, Field::PeriodLength];

    pub fn label(&self) -> &'static str {
        match self {
            Field::LastPeriod => "Last period",
            Field::CycleLength => "Cycle length (days)",
            Field::PeriodLength => "Period length (days)",
        }
    }

    pub fn hint(&self) -> String {
        match self {
            Field::LastPeriod => "first day of the last period, YYYY-MM-DD".to_owned(),
            Field::CycleLength => format!(
                "typically {}-{} days (average 28)",
                SUGGESTED_CYCLE_LENGTH.start(),
                SUGGESTED_CYCLE_LENGTH.end()
            ),
            Field::PeriodLength => format!(
                "typically {}-{} days (average 5)",
                SUGGESTED_PERIOD_LENGTH.start(),
                SUGGESTED_PERIOD_LENGTH.end()
            ),
        }
    }

    pub fn next(&self) -> Option<Field> {
        match self {
            Field::LastPeriod => Some(Field::CycleLength),
            Field::CycleLength => Some(Field::PeriodLength),
            Field::PeriodLength => None,
        }
    }
}

/// Raw input collected before any [`CycleParameters`] exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleForm {
    last_period: Option<NaiveDate>,
    cycle_length: u32,
    period_length: u32,
}

impl Default for CycleForm {
    fn default() -> Self {
        CycleForm::new(&CycleDefaults::default())
    }
}

impl CycleForm {
    pub fn new(defaults: &CycleDefaults) -> Self {
        CycleForm {
            last_period: None,
            cycle_length: defaults.cycle_length,
            period_length: defaults.period_length,
        }
    }

    pub fn last_period(&self) -> Option<NaiveDate> {
        self.last_period
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    pub fn period_length(&self) -> u32 {
        self.period_length
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::LastPeriod => self
                .last_period
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Field::CycleLength => self.cycle_length.to_string(),
            Field::PeriodLength => self.period_length.to_string(),
        }
    }

    /// Parses `text` into `field`. Blank input keeps the current value.
    pub fn set(&mut self, field: Field, text: &str) -> Result<()> {
        let text = text.trim();

        match field {
            Field::LastPeriod if text.is_empty() => {
                if self.last_period.is_none() {
                    return Err(Error::new(
                        ErrorKind::MissingInput,
                        "the date of the last period is required",
                    ));
                }
            }
            Field::LastPeriod => {
                self.last_period = Some(parse_date(text)?);
            }
            _ if text.is_empty() => {}
            Field::CycleLength => self.cycle_length = parse_days(field, text)?,
            Field::PeriodLength => self.period_length = parse_days(field, text)?,
        }

        Ok(())
    }

    pub fn submit(&self) -> Result<CycleParameters> {
        let last_period = self.last_period.ok_or_else(|| {
            Error::new(
                ErrorKind::MissingInput,
                "the date of the last period is required",
            )
        })?;

        let params = CycleParameters::new(last_period, self.cycle_length, self.period_length)?;

        if !params.within_suggested_ranges() {
            log::warn!(
                "Cycle length {} / period length {} outside of the usual ranges",
                params.cycle_length(),
                params.period_length()
            );
        }

        Ok(params)
    }
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| Error::from(e).with_msg(&format!("'{}' is not a YYYY-MM-DD date", text)))
}

fn parse_days(field: Field, text: &str) -> Result<u32> {
    let value: i64 = text.parse()?;

    if value <= 0 {
        return Err(Error::new(
            ErrorKind::InvalidParameter,
            &format!("{} must be a positive number of days", field.label()),
        ));
    }

    u32::try_from(value).map_err(|_| {
        Error::new(
            ErrorKind::InvalidParameter,
            &format!("{} is too large", field.label()),
        )
    })
}

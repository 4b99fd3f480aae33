//! Text rendering of a month, used by `cy --show`.

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use termion::{color, style};

use crate::calendar::{self, DayEntry, MonthIndex, WeekStart};
use crate::config::{ColorSpec, ThemeConfig};
use crate::cycle::{CycleParameters, Phase};
use crate::error::Result;

pub const CELL_WIDTH: usize = 5;
pub const TODAY_SYMBOL: char = '*';

const SUMMARY_DATE_FORMAT: &str = "%d %B %Y";
const LAST_PERIOD_FORMAT: &str = "%d/%m/%Y";

/// Colors to use, or none at all for plain output.
#[derive(Debug, Clone, Copy)]
pub struct Palette<'a> {
    theme: Option<&'a ThemeConfig>,
}

impl<'a> Palette<'a> {
    pub fn plain() -> Self {
        Palette { theme: None }
    }

    pub fn colored(theme: &'a ThemeConfig) -> Self {
        Palette { theme: Some(theme) }
    }

    fn paint(&self, pick: impl Fn(&ThemeConfig) -> ColorSpec, text: &str) -> String {
        match self.theme.and_then(|theme| pick(theme).ansi_index()) {
            Some(index) => format!(
                "{}{}{}",
                color::Fg(color::AnsiValue(index)),
                text,
                color::Fg(color::Reset)
            ),
            None => text.to_owned(),
        }
    }

    fn paint_phase(&self, phase: Phase, text: &str) -> String {
        self.paint(|theme| theme.color_of(phase), text)
    }

    fn paint_today(&self, text: &str) -> String {
        match self.theme {
            Some(_) => format!(
                "{}{}{}",
                style::Bold,
                self.paint(|theme| theme.today, text),
                style::Reset
            ),
            None => text.to_owned(),
        }
    }
}

fn cell(entry: &DayEntry, palette: &Palette) -> String {
    let today = if entry.is_today {
        palette.paint_today(&TODAY_SYMBOL.to_string())
    } else {
        " ".to_owned()
    };

    let day = format!("{:>2}{} ", entry.date.day(), entry.phase.symbol());
    format!("{}{}", today, palette.paint_phase(entry.phase, &day))
}

pub fn month(
    index: &MonthIndex,
    params: &CycleParameters,
    today: NaiveDate,
    week_start: WeekStart,
    palette: &Palette,
) -> Result<String> {
    let entries = index.classify(params, today)?;
    let width = 7 * CELL_WIDTH;

    let mut lines = vec![
        format!("{:^width$}", index.to_string(), width = width),
        week_start
            .header()
            .iter()
            .map(|head| format!(" {:<width$}", head, width = CELL_WIDTH - 1))
            .join(""),
    ];

    for week in calendar::weeks(&entries, week_start) {
        lines.push(
            week.iter()
                .map(|entry| match entry {
                    Some(entry) => cell(entry, palette),
                    None => " ".repeat(CELL_WIDTH),
                })
                .join(""),
        );
    }

    Ok(lines.iter().map(|line| line.trim_end()).join("\n"))
}

pub fn legend(palette: &Palette) -> String {
    Phase::ALL
        .iter()
        .filter(|phase| **phase != Phase::Normal)
        .map(|phase| {
            palette.paint_phase(*phase, &format!("{} {}", phase.symbol(), phase.label()))
        })
        .chain(std::iter::once(format!("{} Today", TODAY_SYMBOL)))
        .join("  ")
}

/// Label/value pairs describing the tracked cycle as seen from `today`.
pub fn summary_lines(params: &CycleParameters, today: NaiveDate) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        (
            "Next period",
            params
                .upcoming_period(today)?
                .format(SUMMARY_DATE_FORMAT)
                .to_string(),
        ),
        (
            "Ovulation",
            params
                .next_ovulation_date()?
                .format(SUMMARY_DATE_FORMAT)
                .to_string(),
        ),
        ("Cycle length", format!("{} days", params.cycle_length())),
        ("Period length", format!("{} days", params.period_length())),
        (
            "Last period",
            params
                .last_period_start()
                .format(LAST_PERIOD_FORMAT)
                .to_string(),
        ),
    ])
}

pub fn summary(params: &CycleParameters, today: NaiveDate) -> Result<String> {
    let lines = summary_lines(params, today)?;
    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;

    Ok(lines
        .iter()
        .map(|(label, value)| {
            format!(
                "{:<width$} {}",
                format!("{}:", label),
                value,
                width = label_width
            )
        })
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn regular() -> CycleParameters {
        CycleParameters::new(date(2024, 3, 1), 28, 5).unwrap()
    }

    #[test]
    fn plain_month_layout() {
        let rendered = month(
            &MonthIndex::new(Month::March, 2024),
            &regular(),
            date(2024, 4, 20),
            WeekStart::Monday,
            &Palette::plain(),
        )
        .unwrap();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "            March 2024");
        assert_eq!(lines[1], " Mon  Tue  Wed  Thu  Fri  Sat  Sun");
        assert_eq!(lines[2], format!("{}  1~   2~   3~", " ".repeat(20)));
        assert_eq!(lines[3], "  4~   5~   6    7    8    9   10+");
        assert_eq!(lines[4], " 11+  12+  13+  14+  15o  16+  17");
        assert_eq!(lines[5], " 18   19   20   21   22   23   24-");
        assert_eq!(lines[6], " 25-  26-  27-  28-  29~  30~  31~");
    }

    #[test]
    fn today_is_marked() {
        let rendered = month(
            &MonthIndex::new(Month::March, 2024),
            &regular(),
            date(2024, 3, 6),
            WeekStart::Sunday,
            &Palette::plain(),
        )
        .unwrap();

        assert!(rendered.contains("* 6 "));
        assert_eq!(rendered.lines().nth(1), Some(" Sun  Mon  Tue  Wed  Thu  Fri  Sat"));
    }

    #[test]
    fn colored_month_contains_escape_codes() {
        let theme = ThemeConfig::default();
        let rendered = month(
            &MonthIndex::new(Month::March, 2024),
            &regular(),
            date(2024, 3, 6),
            WeekStart::Monday,
            &Palette::colored(&theme),
        )
        .unwrap();

        let red = color::Fg(color::AnsiValue(1)).to_string();
        assert!(rendered.contains(&format!(" {} 1~ {}", red, color::Fg(color::Reset))));
    }

    #[test]
    fn legend_lists_marked_phases() {
        assert_eq!(
            legend(&Palette::plain()),
            "~ Period  + Fertile days  o Ovulation  - Premenstrual  * Today"
        );
    }

    #[test]
    fn summary_from_today() {
        let expected = [
            "Next period:   29 March 2024",
            "Ovulation:     15 March 2024",
            "Cycle length:  28 days",
            "Period length: 5 days",
            "Last period:   01/03/2024",
        ]
        .join("\n");

        assert_eq!(summary(&regular(), date(2024, 3, 10)).unwrap(), expected);
    }
}

use chrono::Datelike;
use std::fmt::Display;
use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar::{self, DayEntry, MonthIndex};
use crate::render::CELL_WIDTH;

use super::{Context, Theme};

pub struct DayCell<'a> {
    entry: DayEntry,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    fn new(entry: DayEntry, theme: &'a Theme) -> Self {
        DayCell { entry, theme }
    }

    fn marker(&self) -> char {
        if self.entry.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        }
    }

    fn marker_style(&self) -> StyleModifier {
        if self.entry.is_today {
            self.theme.today_day_style
        } else {
            self.theme.day_style
        }
    }

    fn style(&self) -> StyleModifier {
        self.theme.phase_style(self.entry.phase)
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>2}{}", self.entry.date.day(), self.entry.phase.symbol())
    }
}

/// One month of the calendar, every day colored by its phase.
pub struct MonthPane<'a> {
    index: MonthIndex,
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const COLUMNS: usize = 7;
    const ROWS: usize = 6;
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        MonthPane {
            index: context.cursor(),
            context,
        }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(Self::COLUMNS * CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + Self::ROWS),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = self.context.theme();
        let week_start = self.context.week_start();

        let mut cursor = Cursor::new(&mut window).style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );

        cursor.writeln(&format!(
            "{:^width$}",
            self.index.to_string(),
            width = Self::COLUMNS * CELL_WIDTH
        ));
        for head in week_start.header().iter() {
            cursor.write(&format!(" {:<width$}", head, width = CELL_WIDTH - 1));
        }
        cursor.wrap_line();

        let params = match self.context.params() {
            Some(params) => params,
            None => return,
        };

        let entries = match self.index.classify(params, self.context.today()) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Cannot draw {}: {}", self.index, e);
                return;
            }
        };

        for week in calendar::weeks(&entries, week_start) {
            for entry in week {
                if let Some(entry) = entry {
                    let cell = DayCell::new(entry, theme);

                    cursor.set_style_modifier(cell.marker_style());
                    cursor.write(&cell.marker().to_string());
                    cursor.set_style_modifier(cell.style());
                    cursor.write(&cell.to_string());
                    cursor.set_style_modifier(theme.day_style);
                    cursor.write(" ");
                } else {
                    cursor.move_by(ColDiff::new(CELL_WIDTH as i32), RowDiff::new(0));
                }
            }
            cursor.wrap_line();
        }
    }
}

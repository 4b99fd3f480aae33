use unsegen::base::*;
use unsegen::widget::*;

use crate::cycle::Phase;
use crate::render::{self, TODAY_SYMBOL};

use super::Context;

/// Legend of the phase colors followed by a summary of the tracked cycle.
pub struct InfoWindow<'a> {
    context: &'a Context,
}

impl<'a> InfoWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        InfoWindow { context }
    }
}

impl Widget for InfoWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(30),
            height: RowDemand::at_least(12),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = self.context.theme();
        let mut cursor = Cursor::new(&mut window);

        for phase in Phase::ALL.iter().filter(|phase| **phase != Phase::Normal) {
            cursor.set_style_modifier(theme.phase_style(*phase));
            cursor.write(&format!(" {} ", phase.symbol()));
            cursor.set_style_modifier(theme.day_style);
            cursor.writeln(&format!(" {}", phase.label()));
        }
        cursor.set_style_modifier(theme.today_day_style);
        cursor.write(&format!(" {} ", TODAY_SYMBOL));
        cursor.set_style_modifier(theme.day_style);
        cursor.writeln(" Today");
        cursor.wrap_line();

        let params = match self.context.params() {
            Some(params) => params,
            None => return,
        };

        match render::summary_lines(params, self.context.today()) {
            Ok(lines) => {
                for (label, value) in lines {
                    cursor.set_style_modifier(theme.label_style);
                    cursor.write(&format!("{:<15}", format!("{}:", label)));
                    cursor.set_style_modifier(theme.day_style);
                    cursor.writeln(&value);
                }
            }
            Err(e) => {
                cursor.set_style_modifier(theme.error_style);
                cursor.writeln(&e.to_string());
            }
        }
    }
}

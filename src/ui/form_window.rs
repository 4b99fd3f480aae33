use unsegen::base::*;
use unsegen::input::*;
use unsegen::widget::*;

use crate::form::Field;

use super::context::{Context, Mode};

/// The one-time input form shown until cycle parameters exist.
pub struct FormWindow<'a> {
    context: &'a Context,
}

impl<'a> FormWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        FormWindow { context }
    }
}

impl Widget for FormWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(40),
            height: RowDemand::at_least(3 + 3 * Field::ALL.len()),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = self.context.theme();
        let form = self.context.form();
        let active = self.context.form_field();

        let mut cursor = Cursor::new(&mut window).style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );
        cursor.writeln("Cycle calendar");
        cursor.set_style_modifier(theme.day_style);
        cursor.writeln("Enter your information to start tracking your cycle.");
        cursor.wrap_line();

        for field in Field::ALL.iter() {
            let arrow = if *field == active { '>' } else { ' ' };

            cursor.set_style_modifier(theme.label_style);
            cursor.write(&format!("{} {:<22}", arrow, field.label()));
            cursor.set_style_modifier(theme.day_style);
            cursor.writeln(&form.value(*field));
            cursor.writeln(&format!("  {}", field.hint()));
            cursor.wrap_line();
        }
    }
}

/// Commits the prompt line to the active field on enter.
pub struct FormBehaviour<'a>(pub &'a mut Context);

impl Behavior for FormBehaviour<'_> {
    fn input(self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let line = self.0.input_sink_mut(Mode::Form).finish_line().to_owned();
            self.0.submit_form_field(&line);
            None
        } else {
            Some(input)
        }
    }
}

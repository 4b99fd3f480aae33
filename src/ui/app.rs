use chrono::Local;
use std::convert::TryFrom;

use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::{Context, FormBehaviour, FormWindow, InfoWindow, Mode, MonthPane};

use unsegen::base::{GraphemeCluster, Terminal};
use unsegen::input::{
    EditBehavior, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

use super::command::CommandParser;

pub struct App<'a> {
    config: &'a Config,
    context: Context,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, context: Context) -> App<'a> {
        App { config, context }
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        let mut prompt = HLayout::new()
            .separator(GraphemeCluster::try_from(' ').unwrap())
            .widget(spacer);
        if let mode @ (Mode::Form | Mode::Command) = self.context.mode {
            prompt = prompt.widget(self.context.input_sink(mode).as_widget());
        }

        let notice = self.context.notice().map(|n| n.text()).unwrap_or("");

        VLayout::new().widget(notice).widget(prompt)
    }

    fn calendar_layout<'w>(&'w self) -> impl Widget + 'w
    where
        'a: 'w,
    {
        VLayout::new()
            .widget(
                HLayout::new()
                    .separator(GraphemeCluster::try_from(' ').unwrap())
                    .widget(MonthPane::new(&self.context))
                    .widget(InfoWindow::new(&self.context)),
            )
            .widget(self.bottom_bar())
    }

    fn form_layout<'w>(&'w self) -> impl Widget + 'w
    where
        'a: 'w,
    {
        VLayout::new()
            .widget(FormWindow::new(&self.context))
            .widget(self.bottom_bar())
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        log::info!(
            "Starting in {:?} mode with a tick rate of {:?}",
            self.context.mode,
            self.config.tick_rate()
        );

        while !self.context.should_quit() {
            // Draw
            {
                let root = term.create_root_window();
                if self.context.mode == Mode::Form {
                    self.form_layout().draw(root, RenderingHints::new());
                } else {
                    self.calendar_layout().draw(root, RenderingHints::new());
                }
            }
            term.present();

            // Handle events
            let event = match dispatcher.next() {
                Ok(event) => event,
                Err(_) => break,
            };

            match event {
                Event::Tick => self.context.update(Local::now().date_naive()),
                Event::Input(input) => {
                    if input.matches(Key::Ctrl('c')) {
                        self.context.request_quit();
                    } else if self.context.mode == Mode::Command && input.matches(Key::Esc) {
                        self.context.mode = Mode::Normal;
                    } else {
                        match self.context.mode {
                            Mode::Normal => {
                                input
                                    .chain((Key::Char('q'), || self.context.request_quit()))
                                    .chain((Key::Char(':'), || {
                                        self.context.clear_notice();
                                        self.context.mode = Mode::Command
                                    }))
                                    .chain((Key::Char('t'), || self.context.goto_today()))
                                    .chain((Key::Char('r'), || self.context.reset()))
                                    .chain(
                                        NavigateBehavior::new(&mut CursorBehaviour(
                                            &mut self.context,
                                        ))
                                        .down_on(Key::Char('j'))
                                        .up_on(Key::Char('k'))
                                        .left_on(Key::Char('h'))
                                        .right_on(Key::Char('l')),
                                    )
                                    .finish();
                            }
                            mode @ Mode::Form => {
                                input
                                    .chain(
                                        EditBehavior::new(self.context.input_sink_mut(mode))
                                            .delete_forwards_on(Key::Delete)
                                            .delete_backwards_on(Key::Backspace)
                                            .left_on(Key::Left)
                                            .right_on(Key::Right),
                                    )
                                    .chain(FormBehaviour(&mut self.context))
                                    .finish();
                            }
                            mode @ Mode::Command => {
                                input
                                    .chain(
                                        EditBehavior::new(self.context.input_sink_mut(mode))
                                            .delete_forwards_on(Key::Delete)
                                            .delete_backwards_on(Key::Backspace)
                                            .left_on(Key::Left)
                                            .right_on(Key::Right),
                                    )
                                    .chain(
                                        ScrollBehavior::new(self.context.input_sink_mut(mode))
                                            .backwards_on(Key::Up)
                                            .forwards_on(Key::Down),
                                    )
                                    .chain(CommandParser::new(&mut self.context))
                                    .finish();
                            }
                        }
                    }
                }
            }
        }

        log::info!("Quitting");
        Ok(())
    }
}

/// Months move sideways, years vertically.
struct CursorBehaviour<'a>(&'a mut Context);

impl Navigatable for CursorBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.shift_months(12);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.shift_months(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.shift_months(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.shift_months(-12);
        Ok(())
    }
}

use unsegen::input::*;

use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use super::context::{Context, Mode};
use crate::error::{Error, ErrorKind, Result};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

/// `[count]name [argument]`
fn command_line(input: &str) -> IResult<&str, (Option<u32>, &str, Option<&str>)> {
    all_consuming(tuple((
        opt(map_res(digit1, |digits: &str| digits.parse::<u32>())),
        alpha1,
        opt(preceded(space1, rest)),
    )))(input)
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> ActionResult {
        let (_, (repeat, name, arg)) = command_line(cmd.trim()).map_err(|_| {
            Error::new(ErrorKind::CommandParse, &format!("'{}'", cmd.trim()))
        })?;

        let (_, action) = COMMANDS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .ok_or_else(|| Error::new(ErrorKind::CommandParse, &format!("'{}'", name)))?;

        log::debug!("Running command '{}'", cmd.trim());

        match (action, repeat, arg.map(str::trim)) {
            (Action::Repeatable(a), repeat, None) => a(self.context, repeat.unwrap_or(1)),
            (Action::NoArg(a), None, None) => a(self.context),
            (Action::Arg(a), None, Some(arg)) if !arg.is_empty() => a(self.context, arg),
            _ => Err(Error::new(
                ErrorKind::CommandParse,
                &format!("invalid use of '{}'", name),
            )),
        }
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let cmd = self
                .context
                .input_sink_mut(Mode::Command)
                .finish_line()
                .to_owned();

            match self.run_command(&cmd) {
                Err(e) => self.context.error(e),
                Ok(()) => {
                    if self.context.mode == Mode::Command {
                        self.context.mode = Mode::Normal;
                    }
                }
            }
            None
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "next",
        Action::Repeatable(|c, n| {
            c.shift_months(i64::from(n));
            Ok(())
        }),
    ),
    (
        "prev",
        Action::Repeatable(|c, n| {
            c.shift_months(-i64::from(n));
            Ok(())
        }),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.goto_today();
            Ok(())
        }),
    ),
    (
        "goto",
        Action::Arg(|c, month| {
            c.goto(month.parse()?);
            Ok(())
        }),
    ),
    (
        "reset",
        Action::NoArg(|c| {
            c.reset();
            Ok(())
        }),
    ),
    (
        "quit",
        Action::NoArg(|c| {
            c.request_quit();
            Ok(())
        }),
    ),
    (
        "q",
        Action::NoArg(|c| {
            c.request_quit();
            Ok(())
        }),
    ),
];

use chrono::NaiveDate;

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::calendar::{MonthIndex, WeekStart};
use crate::config::{ColorSpec, Config, CycleDefaults, ThemeConfig};
use crate::cycle::{CycleParameters, Phase};
use crate::error::{Error, ErrorKind};
use crate::form::{CycleForm, Field};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Form,
    Normal,
    Command,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

fn color_of(spec: ColorSpec) -> Option<Color> {
    match spec {
        ColorSpec::Default => None,
        ColorSpec::Black => Some(Color::Black),
        ColorSpec::Red => Some(Color::Red),
        ColorSpec::Green => Some(Color::Green),
        ColorSpec::Yellow => Some(Color::Yellow),
        ColorSpec::Blue => Some(Color::Blue),
        ColorSpec::Magenta => Some(Color::Magenta),
        ColorSpec::Cyan => Some(Color::Cyan),
        ColorSpec::White => Some(Color::White),
    }
}

// Phases are drawn as colored blocks with dark text, everything else keeps
// the terminal colors.
fn phase_style(spec: ColorSpec) -> StyleModifier {
    match color_of(spec) {
        Some(color) => StyleModifier::default()
            .bg_color(color)
            .fg_color(Color::Black),
        None => StyleModifier::default(),
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub period_style: StyleModifier,
    pub fertile_style: StyleModifier,
    pub ovulation_style: StyleModifier,
    pub premenstrual_style: StyleModifier,
    pub normal_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub today_day_char: Option<char>,
    pub month_header_style: StyleModifier,
    pub month_header_text_style: TextFormatModifier,
    pub label_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Theme {
    pub fn from_config(theme: &ThemeConfig) -> Self {
        let today_day_style = match color_of(theme.today) {
            Some(color) => StyleModifier::default().fg_color(color),
            None => StyleModifier::default().invert(true),
        };

        Theme {
            day_style: StyleModifier::default(),
            period_style: phase_style(theme.period),
            fertile_style: phase_style(theme.fertile),
            ovulation_style: phase_style(theme.ovulation),
            premenstrual_style: phase_style(theme.premenstrual),
            normal_style: phase_style(theme.normal),
            today_day_style,
            today_day_char: Some('*'),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            month_header_text_style: TextFormatModifier::default().italic(true),
            label_style: StyleModifier::default().fg_color(Color::Magenta),
            error_style: StyleModifier::default().fg_color(Color::Red),
        }
    }

    pub fn phase_style(&self, phase: Phase) -> StyleModifier {
        match phase {
            Phase::Period => self.period_style,
            Phase::Fertile => self.fertile_style,
            Phase::Ovulation => self.ovulation_style,
            Phase::Premenstrual => self.premenstrual_style,
            Phase::Normal => self.normal_style,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ThemeConfig::default())
    }
}

fn field_prompt(field: Field) -> PromptLine {
    PromptLine::with_prompt(format!("{}: ", field.label()))
}

pub struct Context {
    pub mode: Mode,
    theme: Theme,
    week_start: WeekStart,
    defaults: CycleDefaults,
    session: Session,
    form: CycleForm,
    form_field: Field,
    form_line: PromptLine,
    command_line: PromptLine,
    cursor: MonthIndex,
    today: NaiveDate,
    notice: Option<Notice>,
    quit: bool,
}

impl Context {
    pub fn new(config: &Config, session: Session, today: NaiveDate) -> Self {
        let mode = if session.is_configured() {
            Mode::Normal
        } else {
            Mode::Form
        };

        Context {
            mode,
            theme: Theme::from_config(&config.theme),
            week_start: config.week_start,
            defaults: config.defaults,
            session,
            form: CycleForm::new(&config.defaults),
            form_field: Field::LastPeriod,
            form_line: field_prompt(Field::LastPeriod),
            command_line: PromptLine::with_prompt(":".to_owned()),
            cursor: MonthIndex::from(today),
            today,
            notice: None,
            quit: false,
        }
    }

    pub fn with_cursor(mut self, cursor: MonthIndex) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn params(&self) -> Option<&CycleParameters> {
        self.session.params()
    }

    pub fn form(&self) -> &CycleForm {
        &self.form
    }

    pub fn form_field(&self) -> Field {
        self.form_field
    }

    pub fn cursor(&self) -> MonthIndex {
        self.cursor
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn input_sink(&self, mode: Mode) -> &PromptLine {
        match mode {
            Mode::Form => &self.form_line,
            Mode::Normal | Mode::Command => &self.command_line,
        }
    }

    pub fn input_sink_mut(&mut self, mode: Mode) -> &mut PromptLine {
        match mode {
            Mode::Form => &mut self.form_line,
            Mode::Normal | Mode::Command => &mut self.command_line,
        }
    }

    pub fn update(&mut self, today: NaiveDate) {
        if today != self.today {
            log::debug!("Day changed to {}", today);
            self.today = today;
        }
    }

    pub fn info(&mut self, text: String) {
        self.notice = Some(Notice::Info(text));
    }

    pub fn error(&mut self, error: Error) {
        log::warn!("{}", error);
        self.notice = Some(Notice::Error(error.to_string()));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn shift_months(&mut self, months: i64) {
        self.cursor = self.cursor.shift(months);
    }

    pub fn goto(&mut self, month: MonthIndex) {
        self.cursor = month;
    }

    pub fn goto_today(&mut self) {
        self.cursor = MonthIndex::from(self.today);
    }

    /// Discards the tracked cycle and starts over with an empty form.
    pub fn reset(&mut self) {
        self.session.reset();
        self.form = CycleForm::new(&self.defaults);
        self.select_field(Field::LastPeriod);
        self.mode = Mode::Form;
        self.notice = None;
    }

    fn select_field(&mut self, field: Field) {
        self.form_field = field;
        self.form_line = field_prompt(field);
    }

    /// Commits `text` to the active form field, advancing to the next field or
    /// starting the calendar once the form is complete.
    pub fn submit_form_field(&mut self, text: &str) {
        if let Err(e) = self.form.set(self.form_field, text) {
            self.error(e);
            self.select_field(self.form_field);
            return;
        }

        if let Some(next) = self.form_field.next() {
            self.clear_notice();
            self.select_field(next);
            return;
        }

        match self.form.submit() {
            Ok(params) => {
                if params.within_suggested_ranges() {
                    self.clear_notice();
                } else {
                    self.info("Lengths are outside the usual ranges".to_owned());
                }
                self.session.configure(params);
                self.cursor = MonthIndex::from(self.today);
                self.mode = Mode::Normal;
            }
            Err(e) => {
                let retry = match e.kind {
                    ErrorKind::MissingInput | ErrorKind::DateParse => Field::LastPeriod,
                    _ => Field::CycleLength,
                };
                self.error(e);
                self.select_field(retry);
            }
        }
    }
}

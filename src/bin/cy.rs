extern crate cycal as lib;

use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use lib::calendar::MonthIndex;
use lib::config::Config;
use lib::error::{Error, ErrorKind};
use lib::events::Dispatcher;
use lib::form::{CycleForm, Field};
use lib::render::{self, Palette};
use lib::session::Session;
use lib::ui::app::App;
use lib::ui::Context;
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cy",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Cycal - A terminal menstrual cycle calendar."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "print the month non-interactively",
        requires = "last-period"
    )]
    pub show: bool,

    #[structopt(long = "no-color", help = "do not color the printed month")]
    pub no_color: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(
        short = "p",
        long = "last-period",
        help = "first day of the last period (YYYY-MM-DD)"
    )]
    pub last_period: Option<String>,

    #[structopt(long = "cycle-length", help = "length of the whole cycle in days")]
    pub cycle_length: Option<String>,

    #[structopt(long = "period-length", help = "length of the period in days")]
    pub period_length: Option<String>,

    #[structopt(short = "m", long = "month", help = "month to display (YYYY-MM)")]
    pub month: Option<MonthIndex>,
}

impl Args {
    fn has_cycle_parameters(&self) -> bool {
        self.last_period.is_some() || self.cycle_length.is_some() || self.period_length.is_some()
    }
}

/// Fills the input form from the command line, starting from the configured
/// defaults.
fn session_from_args(args: &Args, config: &Config) -> lib::error::Result<Session> {
    if !args.has_cycle_parameters() {
        return Ok(Session::new());
    }

    let mut form = CycleForm::new(&config.defaults);
    let fields = [
        (Field::LastPeriod, &args.last_period),
        (Field::CycleLength, &args.cycle_length),
        (Field::PeriodLength, &args.period_length),
    ];
    for (field, value) in fields.iter() {
        if let Some(value) = value {
            form.set(*field, value)?;
        }
    }

    if form.last_period().is_none() {
        return Err(Error::new(
            ErrorKind::MissingInput,
            "--last-period is required together with the cycle lengths",
        ));
    }

    Ok(Session::with_params(form.submit()?))
}

fn show(args: &Args, config: &Config, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let params = session
        .params()
        .ok_or_else(|| Error::new(ErrorKind::MissingInput, "no cycle parameters given"))?;

    let today = Local::now().date_naive();
    let index = args.month.unwrap_or_else(|| MonthIndex::from(today));
    let palette = if args.no_color || !termion::is_tty(&stdout()) {
        Palette::plain()
    } else {
        Palette::colored(&config.theme)
    };

    println!(
        "{}",
        render::month(&index, params, today, config.week_start, &palette)?
    );
    println!();
    println!("{}", render::legend(&palette));
    println!();
    println!("{}", render::summary(params, today)?);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    } else if !args.show {
        // Anything written to stderr would garble the TUI.
        logger = logger.do_not_log();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let session = session_from_args(&args, &config)?;

    if args.show {
        return show(&args, &config, &session);
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("Cycal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let dispatcher = Dispatcher::from_config(&config)?;
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut context = Context::new(&config, session, Local::now().date_naive());
    if let Some(month) = args.month {
        context = context.with_cursor(month);
    }

    let mut app = App::new(&config, context);

    app.run(dispatcher, term)
}

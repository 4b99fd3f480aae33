use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use unsegen::input::Input;

use crate::config::Config;

pub enum Event {
    Input(Input),
    /// Periodic wakeup, used to roll "today" over at midnight.
    Tick,
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> io::Result<Dispatcher> {
        Dispatcher::with_tick_rate(config.tick_rate())
    }

    pub fn with_tick_rate(tick_rate: Duration) -> io::Result<Dispatcher> {
        let (tx, rx) = mpsc::channel();

        let input_handle = {
            let tx = tx.clone();
            thread::Builder::new()
                .name("cycal-input".to_owned())
                .spawn(move || {
                    let stdin = io::stdin();
                    let stdin = stdin.lock();
                    for evt in Input::read_all(stdin) {
                        match evt {
                            Ok(input) => {
                                if tx.send(Event::Input(input)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => log::warn!("Failed to read input: {}", e),
                        }
                    }
                })?
        };

        let tick_handle = {
            thread::Builder::new()
                .name("cycal-tick".to_owned())
                .spawn(move || loop {
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                    thread::sleep(tick_rate);
                })?
        };

        Ok(Dispatcher {
            rx,
            _input_handle: input_handle,
            _tick_handle: tick_handle,
        })
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

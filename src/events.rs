use nix::sys::signal::{SigSet, Signal};
use std::io;
use std::sync::mpsc;
use std::thread;

use unsegen::input::Input;

pub enum Event {
    Input(Input),
    Signal(Signal),
}

/// Funnels terminal input and signals into one queue so the application
/// handles exactly one event at a time.
pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _signal_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    /// `signals` must already be blocked in the calling thread so that
    /// all threads inherit the mask.
    pub fn new(signals: SigSet) -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
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
            })
        };
        let signal_handle = {
            thread::spawn(move || loop {
                match signals.wait() {
                    Ok(signal) => {
                        if tx.send(Event::Signal(signal)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        log::warn!("Waiting for signals failed: {}", e);
                        return;
                    }
                }
            })
        };
        Dispatcher {
            rx,
            _input_handle: input_handle,
            _signal_handle: signal_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

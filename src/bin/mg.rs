extern crate monthgrid as lib;

use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::ui::App;
use lib::{CalendarDate, Controller, Surface, View};
use nix::sys::{signal, termios};
use std::io::stdout;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mg",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Monthgrid - A month calendar for the terminal."
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
        short = "d",
        long = "date",
        help = "initial date as YYYY-MM-DD (default: today)"
    )]
    pub date: Option<CalendarDate>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let initial = args.date.unwrap_or_else(CalendarDate::today);
    let view = View::new(initial, Surface::calendar(), config.classes.clone())?;
    let controller = Controller::new(view);

    if args.show {
        print!("{}", controller.view());
        return Ok(());
    }

    // Raw mode is set on the output terminal, so restore its attributes.
    let stdout_fd = stdout().as_raw_fd();
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(stdout_fd)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(stdout_fd, termios::SetArg::TCSANOW, &attr);
        }

        println!("Monthgrid ran into a fatal error!");
        println!("Consider filing an issue with a log file and the backtrace below.");

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);
    signals_to_wait.thread_block()?;

    let dispatcher = Dispatcher::new(signals_to_wait);

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config, controller);

    app.run(dispatcher, term)
}

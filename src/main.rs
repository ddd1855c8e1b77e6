mod app;
mod command;
mod config;
mod consts;
mod game;
mod storage;
mod util;
mod warning;
use crate::app::App;
use crate::config::{Config, ConfigError};
use crate::game::Game;
use crate::storage::Storage;
use crate::warning::Warning;
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser};
use log::LevelFilter;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

static USAGE: &str = "\
Usage: snakegrid [<options>]

Play Snake on a 20×20 grid.  Steer with the arrow keys (or h/j/k/l, or
w/a/s/d) or by clicking the on-screen arrows; press Space to pause.

Options:
  -c, --config <path>   Read configuration from the given file
      --log-file <path> Write log messages to the given file
  -h, --help            Show this help and exit
  -V, --version         Show the program version and exit
";

/// What the command line asked for
#[derive(Clone, Debug, Eq, PartialEq)]
enum Action {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Action {
    fn from_parser(mut parser: Parser) -> Result<Action, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Action::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Action::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Action::Run { config, log_file })
    }
}

fn main() -> ExitCode {
    match Action::from_parser(Parser::from_env()) {
        Ok(Action::Run { config, log_file }) => exit(run(config, log_file)),
        Ok(Action::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Action::Version) => {
            println!("snakegrid {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakegrid: {e}");
            eprintln!("Run `snakegrid --help` for usage.");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<PathBuf>, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, config_error) = load_config(config_path);
    let log_file = log_file.or_else(|| config.logging.file.clone());
    init_logging(log_file.as_deref(), config.logging.level)?;
    log::info!("Starting snakegrid {}", env!("CARGO_PKG_VERSION"));
    let warning = config_error.map(|e| {
        log::warn!("Could not load configuration, using defaults: {e}");
        Warning::from(e)
    });
    let storage = config.storage();
    if let Storage::File(ref store) = storage {
        log::info!("Keeping high score in {}", store.path().display());
    }
    let game = Game::new(storage);
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
        .and_then(|()| App::new(game, warning).run(terminal));
    let _ = execute!(io::stdout(), DisableFocusChange, DisableMouseCapture);
    ratatui::restore();
    log::info!("Exiting");
    r.context("terminal I/O failed")
}

/// Load the configuration file, falling back to the defaults on failure.
/// Any error is returned alongside so that it can be shown once the
/// terminal is set up.
fn load_config(path: Option<PathBuf>) -> (Config, Option<ConfigError>) {
    let r = match path {
        Some(p) => Config::load(&p, false),
        None => Config::default_path().and_then(|p| Config::load(&p, true)),
    };
    match r {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

fn init_logging(path: Option<&Path>, level: LevelFilter) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("failed to open log file")?;
    simplelog::WriteLogger::init(level, simplelog::Config::default(), file)
        .context("failed to initialize logging")?;
    Ok(())
}

fn exit(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.chain()
                .filter_map(|src| src.downcast_ref::<io::Error>())
                .any(|ioe| ioe.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakegrid: {e:?}");
            ExitCode::from(2)
        }
    }
}

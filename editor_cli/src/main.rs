//! Kestrel - A small terminal text editor.
//!
//! Usage: kestrel [FILE]

use anyhow::Context;
use kestrel_core::{Editor, EditorConfig};
use kestrel_ui::{window_size, App, RawModeGuard, StdinSource, HELP_MESSAGE};
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "Usage: kestrel [OPTIONS] [FILE]

Options:
  -h, --help       Print this help and exit
  -V, --version    Print the version and exit

Environment:
  KESTREL_LOG         Append log records to this file
  KESTREL_TAB_STOP    Tab width (default 8)
  KESTREL_QUIT_TIMES  Ctrl-Q presses needed to discard changes (default 2)";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Version,
    Edit(Option<PathBuf>),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut file = None;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(format!("unknown option '{}'", s));
            }
            _ if file.is_some() => return Err("only one file can be opened".to_string()),
            _ => file = Some(PathBuf::from(&arg)),
        }
    }
    Ok(Command::Edit(file))
}

/// Logs go to the file named by `KESTREL_LOG`, never to the terminal.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match env::var_os("KESTREL_LOG") {
        Some(path) => match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("kestrel: cannot open log file: {}", e);
                builder.filter_level(log::LevelFilter::Off);
            }
        },
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn run(file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = EditorConfig::from_env();

    let guard = RawModeGuard::enable().context("failed to enable raw mode")?;
    let mut input =
        StdinSource::new(config.poll_timeout).context("failed to open terminal input")?;
    let mut output = io::stdout();
    let (rows, cols) =
        window_size(&mut input, &mut output).context("failed to get window size")?;
    log::info!("Window size: {}x{}", cols, rows);

    let mut app = App::new(Editor::new(config), input, output);
    app.set_window_size(rows, cols);
    app.editor.set_status(HELP_MESSAGE);
    if let Some(path) = file {
        app.open(&path);
    }

    let result = app.run().context("terminal I/O failed");
    drop(guard);
    result
}

fn main() {
    init_logging();

    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("kestrel: {}\n\n{}", msg, USAGE);
            process::exit(2);
        }
    };

    let file = match command {
        Command::Help => {
            println!("{}", USAGE);
            return;
        }
        Command::Version => {
            println!("kestrel {}", VERSION);
            return;
        }
        Command::Edit(file) => file,
    };

    log::info!("Starting Kestrel {}", VERSION);
    if let Err(e) = run(file) {
        log::error!("Fatal: {:#}", e);
        eprintln!("kestrel: {:#}", e);
        process::exit(1);
    }
    log::info!("Kestrel exited");
}

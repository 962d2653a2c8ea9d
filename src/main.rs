// selgrid: time-travel interpreter for a selection-based grid language

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use selgrid::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use selgrid::interpreter::engine::{ExecConfig, Interpreter};
use selgrid::loader::{load_file, LoadedProgram};
use selgrid::ui::App;

const MEGABYTE: usize = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "selgrid",
    version,
    about = "Run a selection-based grid program",
    after_help = "Example:\n  selgrid 1 8 demos/hello.bs"
)]
struct Cli {
    /// Number of grid rows
    height: Option<NonZeroUsize>,

    /// Number of grid columns
    width: Option<NonZeroUsize>,

    /// Program file: one `x y token` record per line
    file: Option<PathBuf>,

    /// Open the time-travel debugger instead of running to completion
    #[arg(long)]
    tui: bool,

    /// Stop with an error after this many steps
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Snapshot history memory limit for --tui, in megabytes
    #[arg(long, value_name = "MB", default_value_t = DEFAULT_SNAPSHOT_LIMIT / MEGABYTE)]
    snapshot_limit: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (Some(height), Some(width), Some(file)) = (cli.height, cli.width, cli.file.clone())
    else {
        // Not enough arguments to run anything: show usage and exit cleanly
        if let Err(e) = print_usage(&mut io::stdout()) {
            eprintln!("Error: failed to print usage: {}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    eprintln!("Loading {}...", file.display());
    let program = match load_file(&file, height.get(), width.get()) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for warning in &program.warnings {
        eprintln!("{}", warning);
    }
    eprintln!(
        "Loaded {} records into a {}x{} grid.",
        program.records, height, width
    );

    let result = if cli.tui {
        run_tui(program, &cli)
    } else {
        run_plain(program, &cli)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(out: &mut impl Write) -> io::Result<()> {
    Cli::command().write_help(out)?;
    out.flush()
}

/// Run to completion, streaming output to stdout
fn run_plain(program: LoadedProgram, cli: &Cli) -> io::Result<ExitCode> {
    let config = ExecConfig {
        max_steps: cli.max_steps,
        echo_diagnostics: true,
        ..ExecConfig::default()
    };
    let mut interpreter = Interpreter::new(program.grid, config).with_echo(io::stdout());

    match interpreter.run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Record the full history, then browse it in the TUI
fn run_tui(program: LoadedProgram, cli: &Cli) -> io::Result<ExitCode> {
    let mut config = ExecConfig::debugger();
    config.snapshot_limit = cli.snapshot_limit.saturating_mul(MEGABYTE);
    if cli.max_steps.is_some() {
        config.max_steps = cli.max_steps;
    }
    let mut interpreter = Interpreter::new(program.grid, config);

    eprintln!("Executing program...");
    match interpreter.run() {
        Ok(()) => {
            eprintln!("Execution completed successfully.");
            eprintln!("Total snapshots: {}", interpreter.total_snapshots());
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            eprintln!("Entering TUI with partial execution history...");
        }
    }

    if let Err(e) = interpreter.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_usage_write_failure_is_reported() {
        let err = print_usage(&mut ClosedPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_usage_lists_arguments() {
        let mut out = Vec::new();
        print_usage(&mut out).unwrap();
        let usage = String::from_utf8(out).unwrap();
        assert!(usage.contains("HEIGHT"));
        assert!(usage.contains("--max-steps"));
    }
}

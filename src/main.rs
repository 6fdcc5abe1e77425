mod cli;

use clap::Parser;
use slamscore::error::SlamError;
use slamscore::export::ExportFormat;
use slamscore::ledger::HistoryLedger;
use slamscore::panel::JudgePanel;
use slamscore::session::{self, Command, Session};
use slamscore::storage::FileStore;
use slamscore::{config, logging, prefs, scoring};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::{Duration, Instant};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const REJECTED: i32 = 1;
    pub const NOT_SAVED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, SlamError> {
    let cli = cli::Cli::parse();
    logging::init_tracing(logging::level_for(cli.verbose, cli.quiet));

    let cwd = std::env::current_dir()?;
    let cfg = config::load_config(&cwd)?;
    let store = FileStore::new(cli.store.clone().unwrap_or_else(|| cfg.store_dir()));
    tracing::debug!(store = %store.dir().display(), "using store");

    match cli.command {
        cli::Commands::Validate(cmd) => match scoring::validate(&cmd.text) {
            Ok(score) => {
                println!("{score}");
                Ok(exit_code::SUCCESS)
            }
            Err(error) => {
                eprintln!("invalid: {error}");
                Ok(exit_code::REJECTED)
            }
        },
        cli::Commands::Normalize(cmd) => {
            println!("{}", scoring::canonicalize(&cmd.text));
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Calc(cmd) => run_calc(cmd, store),
        cli::Commands::History(cmd) => run_history(cmd, store, cfg.delimiter()),
        cli::Commands::Prefs(cmd) => run_prefs(cmd, store),
        cli::Commands::Session => {
            let debounce = Duration::from_millis(cfg.debounce_ms());
            run_session(store, cfg.default_judges(), debounce)
        }
    }
}

fn run_calc(cmd: cli::CalcCommand, store: FileStore) -> Result<i32, SlamError> {
    let mut panel = match JudgePanel::from_raw(cmd.scores) {
        Ok(panel) => panel,
        Err(error) => {
            eprintln!("error: {error}");
            return Ok(exit_code::REJECTED);
        }
    };
    for slot in 0..panel.len() {
        panel.leave_field(slot);
    }

    let result = match panel.calculate(&cmd.name) {
        Ok(result) => result,
        Err(error @ SlamError::IncompleteOrInvalidPanel { .. }) => {
            eprintln!("error: {error}");
            for (slot, field) in panel.fields().iter().enumerate() {
                if let Err(reason) = field.preview() {
                    eprintln!("  judge {}: {:?} - {reason}", slot + 1, field.raw());
                }
            }
            return Ok(exit_code::REJECTED);
        }
        Err(error) => return Err(error),
    };

    match cmd.format {
        cli::ResultFormat::Text => println!("{}", session::render_result(&result)),
        cli::ResultFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if !cmd.commit {
        return Ok(exit_code::SUCCESS);
    }

    let mut ledger = HistoryLedger::open(store)?;
    match ledger.commit(result) {
        Ok(entry) => {
            println!("saved #{} at {}", entry.id, entry.timestamp);
            Ok(exit_code::SUCCESS)
        }
        Err(error) => not_saved(error),
    }
}

fn run_history(
    cmd: cli::HistoryCommand,
    store: FileStore,
    default_delimiter: char,
) -> Result<i32, SlamError> {
    let mut ledger = HistoryLedger::open(store)?;
    match cmd {
        cli::HistoryCommand::List => {
            println!("{}", session::render_history(ledger.entries()));
            Ok(exit_code::SUCCESS)
        }
        cli::HistoryCommand::Remove { id } => match ledger.remove(id) {
            Ok(true) => {
                println!("removed #{id}");
                Ok(exit_code::SUCCESS)
            }
            Ok(false) => {
                eprintln!("error: {}", SlamError::EntryNotFound(id));
                Ok(exit_code::REJECTED)
            }
            Err(error) => not_saved(error),
        },
        cli::HistoryCommand::Clear { yes } => {
            if ledger.is_empty() {
                println!("history: empty");
                return Ok(exit_code::SUCCESS);
            }
            if !yes && !confirm(&format!("Delete all {} saved result(s)?", ledger.len()))? {
                println!("clear cancelled");
                return Ok(exit_code::SUCCESS);
            }
            match ledger.clear() {
                Ok(()) => {
                    println!("history cleared");
                    Ok(exit_code::SUCCESS)
                }
                Err(error) => not_saved(error),
            }
        }
        cli::HistoryCommand::Export(export) => {
            let format = match export.format {
                cli::ExportFormatArg::Csv => ExportFormat::Delimited {
                    delimiter: export.delimiter.unwrap_or(default_delimiter),
                },
                cli::ExportFormatArg::Json => ExportFormat::Json,
            };
            let rendered = ledger.export(format, chrono::Utc::now())?;
            match export.output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!("exported {} entr(ies) to {}", ledger.len(), path.display());
                }
                None => print!("{rendered}"),
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn run_prefs(cmd: cli::PrefsCommand, mut store: FileStore) -> Result<i32, SlamError> {
    let saved = match cmd {
        cli::PrefsCommand::Theme { value: Some(theme) } => prefs::save_theme(&mut store, theme),
        cli::PrefsCommand::View { value: Some(mode) } => prefs::save_view_mode(&mut store, mode),
        cli::PrefsCommand::Theme { value: None } | cli::PrefsCommand::View { value: None } => Ok(()),
    };
    if let Err(error) = saved {
        return not_saved(error);
    }
    let theme = prefs::load_theme(&store)?;
    let view = prefs::load_view_mode(&store)?;
    println!("theme: {}\nview: {}", theme.as_str(), view.as_str());
    Ok(exit_code::SUCCESS)
}

fn run_session(store: FileStore, judges: usize, debounce: Duration) -> Result<i32, SlamError> {
    let ledger = HistoryLedger::open(store)?;
    let mut session = Session::new(ledger, judges, debounce)?;
    if session.restore()? {
        println!("restored unsaved draft");
    }

    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("{}", session::HELP);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        let now = Instant::now();
        match session.execute(command, now) {
            Ok(reply) if !reply.is_empty() => println!("{reply}"),
            Ok(_) => {}
            Err(error) if error.is_persistence() => eprintln!("warning: {error}"),
            Err(error) => return Err(error),
        }
        if let Err(error) = session.tick(now) {
            eprintln!("warning: draft not saved: {error}");
        }
    }

    if let Err(error) = session.flush() {
        eprintln!("warning: draft not saved: {error}");
    }
    Ok(exit_code::SUCCESS)
}

/// Storage failures are warnings: the command's work is done, only the
/// write is lost. Anything else stays a runtime failure.
fn not_saved(error: SlamError) -> Result<i32, SlamError> {
    if error.is_persistence() {
        eprintln!("warning: not saved: {error}");
        Ok(exit_code::NOT_SAVED)
    } else {
        Err(error)
    }
}

fn confirm(prompt: &str) -> Result<bool, SlamError> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let normalized = input.trim().to_ascii_lowercase();
    Ok(normalized == "y" || normalized == "yes")
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use dune_archive::{
    command::processor::{CommandProcessor, Outcome},
    config::ArchiveConfig,
    storage::storage_manager::StorageManager,
};
use env_logger::{Builder, Env};
use log::error;
use rustyline::{DefaultEditor, error::ReadlineError};

#[derive(Parser, Debug)]
#[command(name = "dune", version, about = "Paged record archive")]
struct Cli {
    /// File with one command per line. Starts an interactive prompt when omitted.
    input: Option<PathBuf>,

    /// Directory for the catalog, logs, results and data files (overrides DUNE_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn init_logger() {
    // RUST_LOG overrides, e.g. RUST_LOG=debug dune input.txt
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::TypeCreated { type_name } => println!("Created type {}", type_name),
        Outcome::RecordCreated(loc) => {
            println!("Created record at page {} slot {}", loc.page_id, loc.slot)
        }
        Outcome::Found(record) => {
            let values: Vec<String> = record.values.iter().map(|v| v.to_string()).collect();
            println!("{}", values.join(" "));
        }
        Outcome::Deleted(loc) => {
            println!("Deleted record at page {} slot {}", loc.page_id, loc.slot)
        }
    }
}

/// Returns false when the prompt should exit.
fn process_line(processor: &mut CommandProcessor, line: &str) -> bool {
    match line.trim().to_lowercase().as_str() {
        "exit" | "quit" | "q" => {
            println!("Goodbye!");
            return false;
        }
        "help" | "h" => {
            println!(
                r#"
Available commands:
  create type <name> <fieldCount> <pkOrder> <field> <int|str> ...
  create record <type> <value> ...
  search record <type> <key>
  delete record <type> <key>
  help, h          - Show this help message
  clear            - Clear the screen
  exit, quit, q    - Exit

Use Up/Down arrows to navigate command history.
"#
            );
        }
        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
            let _ = std::io::stdout().flush();
        }
        _ => match processor.execute(line) {
            Some(Ok(outcome)) => print_outcome(&outcome),
            Some(Err(e)) => println!("failure: {}", e),
            None => {}
        },
    }
    true
}

fn run_interactive(processor: &mut CommandProcessor) -> rustyline::Result<()> {
    let history = processor.storage().config().history_path();
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(&history);

    loop {
        match rl.readline("dune> ") {
            Ok(line) => {
                let command = line.trim();
                if command.is_empty() {
                    continue;
                }
                rl.add_history_entry(command)?;
                if !process_line(processor, command) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    if let Err(e) = rl.save_history(&history) {
        error!("could not save history: {}", e);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    let mut config = ArchiveConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let storage = match StorageManager::open(config) {
        Ok(storage) => storage,
        Err(e) => {
            error!("failed to open archive: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut processor = CommandProcessor::new(storage);

    let status = match cli.input {
        Some(input) => match processor.run_file(&input) {
            Ok(summary) => {
                println!(
                    "Processed {} commands ({} succeeded, {} failed)",
                    summary.processed, summary.succeeded, summary.failed
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("failed to run {}: {}", input.display(), e);
                ExitCode::FAILURE
            }
        },
        None => match run_interactive(&mut processor) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("prompt error: {:?}", e);
                ExitCode::FAILURE
            }
        },
    };

    processor.into_storage().close();
    status
}

use clap::Parser;
use log::LevelFilter;
use snafu::ErrorCompat;

mod args;
mod survey;

use crate::args::{Args, Command};
use crate::survey::store::{JsonFileStore, MemoryStore};

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = run(&args) {
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> survey::SurveyResult<()> {
    let settings = survey::resolve_settings(
        args.config.as_deref(),
        args.data.as_deref(),
        args.catalog.as_deref(),
    )?;

    match &args.command {
        Command::Run { dry_run } => {
            if *dry_run {
                // Practice mode: nothing leaves the process.
                let store = MemoryStore::new();
                survey::session::run_survey(&store, settings.catalog)
            } else {
                let store = JsonFileStore::new(settings.data_path);
                survey::session::run_survey(&store, settings.catalog)
            }
        }
        Command::List => {
            let store = JsonFileStore::new(settings.data_path);
            survey::list_responses(&store)
        }
        Command::Export { out } => {
            let store = JsonFileStore::new(settings.data_path);
            survey::export_responses(&store, out.clone())
        }
        Command::Clear { yes } => {
            let store = JsonFileStore::new(settings.data_path);
            survey::clear_responses(&store, *yes)
        }
    }
}

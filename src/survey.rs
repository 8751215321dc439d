use log::info;

use snafu::{prelude::*, Snafu};

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use dialoguer::Confirm;
use survey_wizard::{Catalog, CatalogError, SurveyResponse, WizardError};
use time::OffsetDateTime;

pub mod config_reader;
pub mod export;
pub mod recorder;
pub mod session;
pub mod store;

use crate::survey::store::ResponseStore;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SurveyError {
    #[snafu(display("Error opening config file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error opening catalog file {path}"))]
    OpeningCatalog {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing catalog file {path}"))]
    ParsingCatalog {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid catalog in {path}"))]
    InvalidCatalog {
        source: CatalogError,
        path: String,
    },
    #[snafu(display("Error reading response store {path}"))]
    StoreRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error decoding response store {path}"))]
    StoreDecode {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error encoding survey responses"))]
    StoreEncode { source: serde_json::Error },
    #[snafu(display("Error writing response store {path}"))]
    StoreWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error assembling the CSV export"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error writing CSV export to {path}"))]
    ExportWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error interacting with the terminal"))]
    Prompt { source: dialoguer::Error },
    #[snafu(display("The wizard rejected the transition"))]
    Wizard { source: WizardError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Name of the response store file when neither the command line nor the
/// configuration file specifies one.
pub const DEFAULT_DATA_FILE: &str = "survey-responses.json";

/// The effective configuration, resolved from the command line and the
/// optional configuration file at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: PathBuf,
    pub catalog: Catalog,
}

/// Merges the command-line overrides with the configuration file.
///
/// Precedence: command line, then configuration file, then defaults
/// (`survey-responses.json` next to the working directory and the built-in
/// catalog).
pub fn resolve_settings(
    config_path: Option<&str>,
    data_path: Option<&str>,
    catalog_path: Option<&str>,
) -> SurveyResult<Settings> {
    let file_config = match config_path {
        Some(path) => config_reader::read_config(path)?,
        None => config_reader::SurveyConfig::default(),
    };
    let data_path: PathBuf = data_path
        .map(String::from)
        .or(file_config.data_path)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
        .into();
    let catalog = match catalog_path.map(String::from).or(file_config.catalog_path) {
        Some(path) => config_reader::read_catalog(&path)?,
        None => Catalog::builtin(),
    };
    info!(
        "using response store {:?}, catalog with {} attributes",
        data_path,
        catalog.len()
    );
    Ok(Settings { data_path, catalog })
}

/// Prints every collected response to the standard output.
pub fn list_responses(store: &dyn ResponseStore) -> SurveyResult<()> {
    let records = store.list()?;
    print!("{}", render_responses(&records));
    Ok(())
}

// Text rendering of the admin view: one block per response, the main
// attribute first and the related scores indented under it.
fn render_responses(records: &[SurveyResponse]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Survey responses ({})", records.len());
    for record in records {
        let _ = writeln!(
            out,
            "{}  {} <{}>",
            export::format_timestamp(&record.timestamp),
            record.name,
            record.email
        );
        for selection in record.selected_attributes.iter() {
            let _ = writeln!(out, "    {} (main)", selection.main_attribute);
            if let Some(score) = selection.scores.get(&selection.main_attribute) {
                let _ = writeln!(out, "        {}: {}/5", selection.main_attribute, score);
            }
            for related in selection.related_names() {
                if let Some(score) = selection.scores.get(related) {
                    let _ = writeln!(out, "        {}: {}/5", related, score);
                }
            }
        }
    }
    out
}

/// Serializes every collected response to a CSV document.
///
/// `out` may name a file, be the literal `stdout`, or be absent, in which
/// case the document goes to `survey-responses-<date>.csv` in the working
/// directory.
pub fn export_responses(store: &dyn ResponseStore, out: Option<String>) -> SurveyResult<()> {
    let records = store.list()?;
    let bytes = export::export_csv(&records)?;
    match out.as_deref() {
        Some("stdout") => {
            std::io::stdout()
                .write_all(&bytes)
                .context(ExportWriteSnafu { path: "stdout" })?;
        }
        Some(path) => {
            fs::write(path, &bytes).context(ExportWriteSnafu { path })?;
            println!("Wrote {} responses to {}", records.len(), path);
        }
        None => {
            let path = export::default_export_name(OffsetDateTime::now_utc().date());
            fs::write(&path, &bytes).context(ExportWriteSnafu { path: path.clone() })?;
            println!("Wrote {} responses to {}", records.len(), path);
        }
    }
    Ok(())
}

/// Deletes every collected response, behind a confirmation gate.
///
/// The gate can be skipped with `assume_yes` for scripted use. Clearing an
/// empty store succeeds trivially.
pub fn clear_responses(store: &dyn ResponseStore, assume_yes: bool) -> SurveyResult<()> {
    if !assume_yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all survey responses? This action cannot be undone.")
            .default(false)
            .interact()
            .context(PromptSnafu {})?;
        if !confirmed {
            println!("Nothing deleted.");
            return Ok(());
        }
    }
    store.delete_all()?;
    println!("All survey responses deleted.");
    Ok(())
}

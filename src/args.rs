use clap::{Parser, Subcommand};

/// This is a multi-step attribute survey program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. For more information about the file
    /// format, read the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The file holding the collected survey responses. Setting this
    /// option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, optional) A JSON file with a custom attribute catalog. Setting this option
    /// overrides the path that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub catalog: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Runs the interactive survey wizard.
    Run {
        /// If passed as an argument, runs a practice session: the response is not persisted.
        #[clap(long, takes_value = false)]
        dry_run: bool,
    },
    /// Lists the collected survey responses.
    List,
    /// Exports the collected survey responses to a CSV document.
    Export {
        /// (file path, 'stdout' or empty) Where to write the CSV document. Defaults to
        /// survey-responses-<date>.csv in the current directory.
        #[clap(short, long, value_parser)]
        out: Option<String>,
    },
    /// Deletes every collected survey response.
    Clear {
        /// If passed as an argument, skips the confirmation prompt.
        #[clap(long, takes_value = false)]
        yes: bool,
    },
}

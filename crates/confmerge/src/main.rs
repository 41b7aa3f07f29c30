//! confmerge CLI - Main entry point

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, ArgGroup, Parser};
use confmerge_core::MergeError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod prompt;

use commands::Outcome;

/// Exit status for a run that was declined and changed nothing.
const NO_ACTION_EXIT_CODE: u8 = 3;

/// Exit status for failures that are not merge errors.
const GENERIC_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "confmerge")]
#[command(version)]
#[command(
    about = "Generate per-device configuration files from one template and a CSV of values",
    long_about = None
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["input_csv", "output_csv"])
))]
struct Cli {
    /// Configuration template containing <PLACEHOLDER> variables
    template: PathBuf,

    /// CSV file with one row of replacement values per device
    #[arg(short = 'i', long = "input-csv", value_name = "CSV")]
    input_csv: Option<PathBuf>,

    /// Write a CSV containing only a header row built from the template
    #[arg(short = 'o', long = "output-csv", value_name = "CSV")]
    output_csv: Option<PathBuf>,

    /// Render exactly one merged file from the first data row (no unique key)
    #[arg(short = 's', long, conflicts_with_all = ["key", "output_csv"])]
    single: bool,

    /// Unique key placeholder name, without angle brackets [default: HOSTNAME]
    #[arg(short = 'k', long, value_name = "NAME")]
    key: Option<String>,

    /// Directory for rendered files
    #[arg(short = 'd', long, value_name = "DIR", default_value = confmerge_core::render::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Extension for rendered files named after the unique key
    #[arg(short = 'e', long, value_name = "EXT", default_value = confmerge_core::render::DEFAULT_EXTENSION)]
    extension: String,

    /// Reject header placeholders containing whitespace
    #[arg(long)]
    strict: bool,

    /// Append N stub device rows after the generated header
    #[arg(long, value_name = "N", requires = "output_csv")]
    stub_rows: Option<usize>,

    /// List the template's placeholders and ask before generating a header
    #[arg(long, requires = "output_csv")]
    review: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// More diagnostic output (-v verbose, -vv very verbose)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Only report warnings and errors
    #[arg(short = 'q', long, conflicts_with = "verbosity")]
    quiet: bool,
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .init();

    match dispatch(cli) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Declined) => ExitCode::from(NO_ACTION_EXIT_CODE),
        Err(err) => {
            tracing::error!("{err}");
            let code = err
                .downcast_ref::<MergeError>()
                .map_or(GENERIC_EXIT_CODE, MergeError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<Outcome> {
    if let Some(destination) = cli.output_csv {
        let args = commands::header::HeaderArgs {
            template: cli.template,
            destination,
            key: cli.key,
            stub_rows: cli.stub_rows.unwrap_or(0),
            review: cli.review,
            assume_yes: cli.yes,
        };
        return commands::header::execute(args);
    }

    let Some(data) = cli.input_csv else {
        anyhow::bail!("either --input-csv or --output-csv is required");
    };
    let args = commands::merge::MergeArgs {
        template: cli.template,
        data,
        single: cli.single,
        key: cli.key,
        output_dir: cli.output_dir,
        extension: cli.extension,
        strict: cli.strict,
    };
    commands::merge::execute(args)
}

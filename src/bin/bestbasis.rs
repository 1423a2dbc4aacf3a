//! `bestbasis` command-line tool.

use bestbasis::cli::{
    CliError, ColorChoice, ExitCode, OutputFormat, errors, log_directive, parse_color_choice,
    parse_output_format,
};
use bestbasis::config::{ConfigError, ConfigLoader, SearchProfile};
use bestbasis::dataset::{DatasetError, convert_file, converted_path, load_histogram};
use bestbasis::search::{self, SearchMode, Termination};
use bestbasis::{BasisReport, Error};
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bestbasis",
    version,
    about = "Find the most biased basis of spin operators for a binary dataset"
)]
struct Cli {
    /// Data file: one record of '0'/'1' characters per line
    datafile: PathBuf,

    /// Number of variables (inferred from the first record when omitted)
    #[arg(short = 'n', long = "variables")]
    variables: Option<usize>,

    /// Search strategy: auto, exhaustive, fixed-k, var-k
    #[arg(long = "mode", value_parser = parse_mode)]
    mode: Option<SearchMode>,

    /// Highest operator order generated per representation
    #[arg(long = "k-max")]
    k_max: Option<usize>,

    /// Columns per elimination batch
    #[arg(long = "batch-size")]
    batch_size: Option<usize>,

    /// Iteration cap of the representation loop
    #[arg(long = "max-representations")]
    max_representations: Option<usize>,

    /// Base profile: quick, standard, thorough
    #[arg(long = "profile", value_parser = parse_profile)]
    profile: Option<SearchProfile>,

    /// Configuration file path
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Output format: human, json, json-pretty
    #[arg(short = 'f', long = "format", value_parser = parse_output_format, default_value = "human")]
    format: OutputFormat,

    /// Color output: auto, always, never
    #[arg(short = 'c', long = "color", value_parser = parse_color_choice, default_value = "auto")]
    color: ColorChoice,

    /// Also print the inverse basis
    #[arg(long = "invert", action = ArgAction::SetTrue)]
    invert: bool,

    /// Write the dataset re-expressed in the best basis
    /// (default: <stem>_in_best_basis.dat next to the input)
    #[arg(long = "write-converted", num_args = 0..=1)]
    write_converted: Option<Option<PathBuf>>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

fn parse_mode(s: &str) -> Result<SearchMode, String> {
    s.parse()
}

fn parse_profile(s: &str) -> Result<SearchProfile, String> {
    s.parse().map_err(|err: ConfigError| err.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.quiet);
    let format = cli.format;
    let color = cli.color;

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = write_cli_error(&err, format, color);
            std::process::exit(err.exit_code);
        }
    }
}

fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbosity, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, CliError> {
    let mut loader = ConfigLoader::new()
        .profile(cli.profile.clone().unwrap_or_default())
        .override_value("dataset.path", cli.datafile.display().to_string());
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    let flags = [
        ("dataset.variables", cli.variables.map(|v| v.to_string())),
        ("search.mode", cli.mode.map(|m| m.to_string())),
        ("search.k_max", cli.k_max.map(|v| v.to_string())),
        ("search.batch_size", cli.batch_size.map(|v| v.to_string())),
        (
            "search.max_representations",
            cli.max_representations.map(|v| v.to_string()),
        ),
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            loader = loader.override_value(key, value);
        }
    }
    let config = loader.load().map_err(|err| match err {
        ConfigError::Io(io_err) => {
            let path = cli.config.as_deref().unwrap_or_else(|| Path::new("config"));
            errors::io_error(path, &io_err)
        }
        other => errors::config_error(&other.to_string()),
    })?;

    let datafile = config.dataset.path.clone().unwrap_or(cli.datafile.clone());
    let histogram =
        load_histogram(&datafile, config.dataset.variables).map_err(|err| match err {
            DatasetError::Io(io_err) => errors::io_error(&datafile, &io_err),
            DatasetError::Empty => errors::empty_dataset(&datafile),
            other => CliError::from(Error::from(other)).context("path", datafile.display().to_string()),
        })?;

    let outcome = search::run(&histogram, &config.search);
    let mut report = BasisReport::from_outcome(&outcome, &histogram);
    if cli.invert {
        report = report.with_inverse(&outcome.basis);
    }
    write_report(&report, cli.format)?;

    if let Some(target) = cli.write_converted {
        let output = target.unwrap_or_else(|| converted_path(&datafile));
        let written = convert_file(
            &datafile,
            &output,
            histogram.variables(),
            &outcome.basis.masks(),
        )
        .map_err(|err| match err {
            DatasetError::Io(io_err) => errors::io_error(&output, &io_err),
            other => CliError::from(Error::from(other)),
        })?;
        info!(path = %output.display(), records = written, "wrote converted dataset");
    }

    match outcome.termination {
        Termination::IterationCap { representations } => {
            let err = errors::not_converged(representations);
            let _ = write_cli_error(&err, cli.format, cli.color);
            Ok(err.exit_code)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn write_report(report: &BasisReport, format: OutputFormat) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    let written = match format.render_json(report) {
        Ok(Some(json)) => writeln!(stdout, "{json}"),
        Ok(None) => write!(stdout, "{report}"),
        Err(err) => return Err(errors::internal(&err.to_string())),
    };
    written.map_err(output_cli_error)
}

fn output_cli_error(err: impl std::error::Error) -> CliError {
    CliError::new("output_error", "Failed to write output").detail(err.to_string())
}

fn write_cli_error(err: &CliError, format: OutputFormat, color: ColorChoice) -> io::Result<()> {
    let mut stderr = io::stderr();
    match format {
        OutputFormat::Human => {
            writeln!(stderr, "{}", err.human_format(color.should_colorize()))
        }
        OutputFormat::Json => writeln!(stderr, "{}", err.json_format()),
        OutputFormat::JsonPretty => writeln!(stderr, "{}", err.json_pretty_format()),
    }
}

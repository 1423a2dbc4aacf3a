//! Support code for the `bestbasis` binary: exit codes, structured errors,
//! output selection and argument parsing.

pub mod args;
pub mod error;
pub mod exit;
pub mod output;

pub use args::{log_directive, parse_color_choice, parse_output_format};
pub use error::{CliError, errors};
pub use exit::ExitCode;
pub use output::{ColorChoice, OutputFormat};

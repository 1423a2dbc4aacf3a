//! Text datasets: one record per line, one character per variable.
//!
//! The first `n` characters of a line are read as bits, `'1'` meaning 1 and
//! anything else 0. The leftmost character is the highest variable and the
//! last one is variable 1 (bit 0). A line shorter than `n` is right-aligned,
//! so its missing high-order bits are 0. Blank lines are skipped.

use super::{DatasetError, Histogram};
use crate::gf2::{Mask, change_coordinates};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the input file stem by [`converted_path`].
pub const CONVERTED_SUFFIX: &str = "_in_best_basis";

/// Parses one record into an `n`-bit state.
#[must_use]
pub fn parse_record(line: &str, variables: usize) -> Mask {
    let digits: Vec<char> = line.trim_end().chars().take(variables).collect();
    let width = digits.len();
    Mask::from_bits(
        variables,
        digits
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == '1')
            .map(|(pos, _)| width - 1 - pos),
    )
}

fn record_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<String>> {
    reader.lines().filter(|line| match line {
        Ok(text) => !text.trim().is_empty(),
        Err(_) => true,
    })
}

/// Reads a histogram from a line-oriented source.
///
/// When `variables` is `None`, `n` is the length of the first record.
///
/// # Errors
///
/// Fails on I/O errors, on a zero or undeterminable width and when no
/// record is found.
pub fn read_histogram<R: BufRead>(
    reader: R,
    variables: Option<usize>,
) -> Result<Histogram, DatasetError> {
    let lines: Vec<String> = record_lines(reader).collect::<Result<_, _>>()?;
    if lines.is_empty() {
        return Err(DatasetError::Empty);
    }
    let variables =
        variables.unwrap_or_else(|| lines.first().map_or(0, |l| l.trim_end().chars().count()));
    if variables == 0 {
        return Err(DatasetError::ZeroWidth);
    }

    let states: Vec<Mask> = lines
        .iter()
        .map(|line| parse_record(line, variables))
        .collect();
    debug!(records = states.len(), variables, "parsed dataset records");
    Histogram::from_states(variables, states)
}

/// Reads a histogram from a file.
///
/// # Errors
///
/// See [`read_histogram`].
pub fn load_histogram(path: &Path, variables: Option<usize>) -> Result<Histogram, DatasetError> {
    let file = File::open(path)?;
    let histogram = read_histogram(BufReader::new(file), variables)?;
    info!(
        path = %path.display(),
        variables = histogram.variables(),
        records = histogram.total(),
        distinct = histogram.distinct(),
        "loaded dataset"
    );
    Ok(histogram)
}

/// Writes every record of `reader` re-expressed in the coordinates `rows`.
///
/// Records keep their input order. Each output line has `rows.len()`
/// characters with the first row's value rightmost. Returns the number of
/// records written.
///
/// # Errors
///
/// Fails on I/O errors.
pub fn write_converted<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    variables: usize,
    rows: &[Mask],
) -> Result<u64, DatasetError> {
    let mut written = 0;
    for line in record_lines(reader) {
        let state = parse_record(&line?, variables);
        writeln!(writer, "{}", change_coordinates(rows, &state))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Converts the dataset at `input` into the coordinates `rows`, writing the
/// result to `output`.
///
/// # Errors
///
/// Fails on I/O errors.
pub fn convert_file(
    input: &Path,
    output: &Path,
    variables: usize,
    rows: &[Mask],
) -> Result<u64, DatasetError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let written = write_converted(reader, writer, variables, rows)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        records = written,
        "wrote dataset in new basis"
    );
    Ok(written)
}

/// Default output path for a converted dataset: `<stem>_in_best_basis.dat`
/// next to the input.
#[must_use]
pub fn converted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "dataset".into(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}{CONVERTED_SUFFIX}.dat"))
}

//! Flat value files: decimal numbers separated by whitespace or newlines.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    data::Dataset as _,
    fitter::{DistributionFitter, FitError},
    population::Population,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DataFileError {
    #[display("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("line {line}: invalid number {token:?}")]
    Parse { line: usize, token: String },
    #[display("{} contains no values", path.display())]
    Empty { path: PathBuf },
    #[display("failed to fit {}", path.display())]
    Fit { path: PathBuf, source: FitError },
}

/// Reads every whitespace-separated decimal in `reader`.
///
/// Errors from the reader itself are returned as [`io::Error`] inside
/// [`DataFileError::Io`] with an empty path; callers that know the path use
/// [`load_population`] instead.
pub fn read_values<R>(reader: R) -> Result<Vec<f64>, DataFileError>
where
    R: BufRead,
{
    let mut values = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DataFileError::Io {
            path: PathBuf::new(),
            source,
        })?;
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| DataFileError::Parse {
                line: i + 1,
                token: token.to_owned(),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Writes one value per line in their shortest round-trip form.
pub fn write_values<W>(mut writer: W, values: &[f64]) -> io::Result<()>
where
    W: Write,
{
    for value in values {
        writeln!(writer, "{value}")?;
    }
    writer.flush()
}

/// Loads a value file and fits `fitter` to its mean and population variance.
pub fn load_population<P>(
    path: P,
    fitter: &mut dyn DistributionFitter,
) -> Result<Population, DataFileError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataFileError::Io {
        path: path.to_owned(),
        source,
    })?;
    let values = read_values(BufReader::new(file)).map_err(|e| match e {
        DataFileError::Io { source, .. } => DataFileError::Io {
            path: path.to_owned(),
            source,
        },
        e => e,
    })?;
    if values.is_empty() {
        return Err(DataFileError::Empty {
            path: path.to_owned(),
        });
    }
    log::debug!("loaded {} values from {}", values.len(), path.display());
    Population::fit(values, fitter).map_err(|source| DataFileError::Fit {
        path: path.to_owned(),
        source,
    })
}

/// Saves the population's values, one per line, in ascending order.
pub fn save_population<P>(path: P, population: &Population) -> Result<(), DataFileError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let io_error = |source| DataFileError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_values(BufWriter::new(file), population.values()).map_err(io_error)?;
    log::debug!("saved {} values to {}", population.size(), path.display());
    Ok(())
}

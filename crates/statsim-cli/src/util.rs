use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::PathBuf,
};

use anyhow::Context;
use rand::Rng as _;
use statsim_core::{Distribution, DistributionFamily, Parameter, SimulationSeed};

/// Where a command writes its result: stdout, or the file named by `--output`.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl Output {
    pub fn create(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file =
            File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;
        Ok(Self::File {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Writes `report` as pretty-printed JSON followed by a newline.
    pub fn write_report<T>(path: Option<PathBuf>, report: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        let mut output = Self::create(path)?;
        serde_json::to_writer_pretty(&mut output, report)
            .with_context(|| format!("Failed to write report to {output}"))?;
        writeln!(output)
            .and_then(|()| output.flush())
            .with_context(|| format!("Failed to write report to {output}"))
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(_) => f.write_str("stdout"),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer().flush()
    }
}

/// Distribution family and parameters given on the command line.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DistributionArg {
    /// Distribution family (binomial or normal)
    #[arg(long, default_value = "normal")]
    family: DistributionFamily,
    /// Number of trials of a binomial distribution
    #[arg(long)]
    try_count: Option<f64>,
    /// Success probability of a binomial distribution
    #[arg(long)]
    probability: Option<f64>,
    /// Mean of the distribution
    #[arg(long, allow_negative_numbers = true)]
    mean: Option<f64>,
    /// Variance of the distribution
    #[arg(long)]
    variance: Option<f64>,
    /// Standard deviation of a normal distribution
    #[arg(long)]
    standard_deviation: Option<f64>,
}

impl DistributionArg {
    pub fn build(&self) -> anyhow::Result<Distribution> {
        let mut fitter = self.family.fitter();
        let parameters = [
            (Parameter::TryCount, self.try_count),
            (Parameter::Probability, self.probability),
            (Parameter::Mean, self.mean),
            (Parameter::Variance, self.variance),
            (Parameter::StandardDeviation, self.standard_deviation),
        ];
        for (parameter, value) in parameters {
            if let Some(value) = value {
                fitter
                    .set(parameter, value)
                    .with_context(|| format!("Invalid {parameter}: {value}"))?;
            }
        }
        fitter
            .fit()
            .with_context(|| format!("Failed to build {} distribution", self.family))
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SeedArg {
    /// 32-digit hex seed; random if omitted
    #[arg(long)]
    seed: Option<SimulationSeed>,
}

impl SeedArg {
    pub fn seed(&self) -> SimulationSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

impl From<SimulationSeed> for SeedArg {
    fn from(seed: SimulationSeed) -> Self {
        Self { seed: Some(seed) }
    }
}

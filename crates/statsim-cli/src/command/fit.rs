use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use statsim_core::{Dataset as _, DistributionFamily, DistributionModel as _, data_file};

use crate::{report::MomentComparison, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FitArg {
    /// File of whitespace-separated values
    input: PathBuf,
    /// Distribution family to fit (binomial or normal)
    #[arg(long, default_value = "normal")]
    family: DistributionFamily,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FitReport {
    input: PathBuf,
    family: String,
    distribution: String,
    size: usize,
    moments: MomentComparison,
}

pub(crate) fn run(arg: &FitArg) -> anyhow::Result<()> {
    let mut fitter = arg.family.fitter();
    let population = data_file::load_population(&arg.input, fitter.as_mut())
        .with_context(|| format!("Failed to fit {} distribution", arg.family))?;
    let distribution = population.distribution();
    log::info!("fitted {distribution} to {}", arg.input.display());

    let report = FitReport {
        input: arg.input.clone(),
        family: arg.family.to_string(),
        distribution: distribution.expression(),
        size: population.size(),
        moments: MomentComparison::theoretical(&population)?,
    };
    Output::write_report(arg.output.clone(), &report)
}

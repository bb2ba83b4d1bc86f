use std::path::PathBuf;

use anyhow::Context as _;
use statsim_core::{Dataset as _, Population, data_file};

use crate::util::{DistributionArg, Output, SeedArg};

const DEFAULT_SIZE: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    #[clap(flatten)]
    distribution: DistributionArg,
    /// Number of values to generate
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    #[clap(flatten)]
    seed: SeedArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let distribution = arg.distribution.build()?;
    let seed = arg.seed.seed();
    log::info!("generating {} values from {distribution} (seed {seed})", arg.size);

    let population = Population::generate(arg.size, distribution, &mut seed.rng());
    let output = Output::create(arg.output.clone())?;
    let target = output.to_string();
    data_file::write_values(output, population.values())
        .with_context(|| format!("Failed to write values to {target}"))?;
    log::info!("wrote {} values to {target}", population.size());
    Ok(())
}

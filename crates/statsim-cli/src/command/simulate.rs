use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use statsim_core::{
    Dataset as _, DistributionModel as _, Population, SamplingMethod, SimulationSeed,
};

use crate::{
    report::MomentComparison,
    util::{DistributionArg, Output, SeedArg},
};

const DEFAULT_POPULATION_SIZE: usize = 10_000;
const DEFAULT_SAMPLE_SIZE: usize = 30;
const DEFAULT_SAMPLE_COUNT: usize = 1000;
const DEFAULT_MULTIPLIER: f64 = 1.96;

const PROGRESS_STEPS: usize = 10;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    distribution: DistributionArg,
    /// Number of values in the population
    #[arg(long, default_value_t = DEFAULT_POPULATION_SIZE)]
    population_size: usize,
    /// Number of values in each sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,
    /// Number of samples to draw
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    samples: usize,
    /// Sample with replacement
    #[arg(long)]
    with_replacement: bool,
    /// Confidence interval half-width in standard errors
    #[arg(long, default_value_t = DEFAULT_MULTIPLIER)]
    multiplier: f64,
    #[clap(flatten)]
    seed: SeedArg,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: SimulationSeed,
    created_at: DateTime<Utc>,
    distribution: String,
    population_size: usize,
    sample_size: usize,
    sample_count: usize,
    method: String,
    population: MomentComparison,
    sample_means: SampleMeanReport,
    confidence: ConfidenceReport,
}

#[derive(Debug, Serialize)]
struct SampleMeanReport {
    distribution: String,
    moments: MomentComparison,
}

#[derive(Debug, Serialize)]
struct ConfidenceReport {
    multiplier: f64,
    level: f64,
    covered: usize,
    coverage: f64,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        arg.sample_size >= 2,
        "sample size must be at least 2 to estimate a confidence interval"
    );
    anyhow::ensure!(arg.samples >= 1, "at least one sample is required");

    let distribution = arg.distribution.build()?;
    let seed = arg.seed.seed();
    let mut rng = seed.rng();
    let method = if arg.with_replacement {
        SamplingMethod::WithReplacement
    } else {
        SamplingMethod::WithoutReplacement
    };
    log::info!(
        "simulating {distribution}: population {}, {} samples of {} ({method}), seed {seed}",
        arg.population_size,
        arg.samples,
        arg.sample_size
    );

    let mut population = Population::generate(arg.population_size, distribution, &mut rng);
    let true_mean = population.distribution().mean();

    let progress_interval = arg.samples.div_ceil(PROGRESS_STEPS);
    let mut covered = 0;
    let mut level = 0.0;
    for i in 0..arg.samples {
        let sample = population.draw_sample(arg.sample_size, method, &mut rng)?;
        let estimate = sample.confidence_level(arg.multiplier)?;
        level = estimate.level;
        if estimate.contains(true_mean) {
            covered += 1;
        }
        if (i + 1) % progress_interval == 0 {
            log::info!("drew {}/{} samples", i + 1, arg.samples);
        }
    }

    let sample_means = population.create_sample_mean_population(arg.sample_size)?;
    #[expect(clippy::cast_precision_loss)]
    let coverage = covered as f64 / arg.samples as f64;
    let report = SimulationReport {
        seed,
        created_at: Utc::now(),
        distribution: population.distribution().expression(),
        population_size: population.size(),
        sample_size: arg.sample_size,
        sample_count: population.sample_count(),
        method: method.to_string(),
        population: MomentComparison::theoretical(&population)?,
        sample_means: SampleMeanReport {
            distribution: sample_means.distribution().expression(),
            moments: MomentComparison::theoretical(&sample_means)?,
        },
        confidence: ConfidenceReport {
            multiplier: arg.multiplier,
            level,
            covered,
            coverage,
        },
    };
    log::info!(
        "{covered}/{} intervals contain the true mean {true_mean} (level {level})",
        arg.samples
    );
    Output::write_report(arg.output.clone(), &report)
}

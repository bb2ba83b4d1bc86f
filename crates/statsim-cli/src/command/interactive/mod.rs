use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use statsim_core::{
    Dataset, Distribution, DistributionFamily, DistributionModel as _, Population, SamplingMethod,
    data_file,
};

use self::{
    console::{Console, InputClosed},
    session::{Selection, Session},
};
use crate::{
    report::{Comparison, MomentComparison},
    util::SeedArg,
};

mod console;
mod session;

const SEPARATOR: &str = "----------";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InteractiveArg {
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &InteractiveArg) -> anyhow::Result<()> {
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut console = Console::new(stdin, stdout);
    match run_with(&mut console, arg) {
        Err(e) if e.is::<InputClosed>() => Ok(()),
        result => result,
    }
}

fn run_with<R, W>(console: &mut Console<R, W>, arg: &InteractiveArg) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let seed = arg.seed.seed();
    writeln!(console.out(), "Seed: {seed}")?;
    let mut rng = seed.rng();
    let population = loop {
        match create_population(console, &mut rng) {
            Ok(population) => break population,
            Err(e) => report_error(console, e)?,
        }
    };
    let mut session = Session::new(population, rng);

    loop {
        writeln!(console.out(), "{SEPARATOR}")?;
        writeln!(console.out(), "Target: {}", session.selected().name())?;
        let result = match session.selection() {
            Selection::Sample(_) => match console.choose(
                "Action",
                &[
                    "Print",
                    "Distribution",
                    "Compare with population",
                    "Confidence interval",
                    "Probability",
                    "Select population",
                    "Quit",
                ],
            )? {
                0 => print_values(console, session.selected()),
                1 => print_distribution(console, session.selected()),
                2 => compare_with_population(console, &session),
                3 => confidence_interval(console, &session),
                4 => probability(console, session.selected()),
                5 => {
                    session.select_population();
                    Ok(())
                }
                _ => return Ok(()),
            },
            Selection::Population => match console.choose(
                "Action",
                &[
                    "Print",
                    "Distribution",
                    "Census",
                    "Sample list",
                    "Draw samples",
                    "Select sample",
                    "Probability",
                    "Save",
                    "Load",
                    "Quit",
                ],
            )? {
                0 => print_values(console, session.selected()),
                1 => print_distribution(console, session.selected()),
                2 => census(console, session.population()),
                3 => list_samples(console, session.population()),
                4 => draw_samples(console, &mut session),
                5 => select_sample(console, &mut session),
                6 => probability(console, session.selected()),
                7 => save(console, session.population()),
                8 => load(console).map(|population| session.replace_population(population)),
                _ => return Ok(()),
            },
        };
        if let Err(e) = result {
            report_error(console, e)?;
        }
    }
}

/// Prints recoverable errors; passes end of input and I/O failures through.
fn report_error<R, W>(console: &mut Console<R, W>, error: anyhow::Error) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    if error.is::<InputClosed>() || error.is::<io::Error>() {
        return Err(error);
    }
    log::debug!("{error:?}");
    writeln!(console.out(), "Error: {error:#}")?;
    Ok(())
}

fn create_population<R, W, G>(console: &mut Console<R, W>, rng: &mut G) -> anyhow::Result<Population>
where
    R: BufRead,
    W: Write,
    G: rand::Rng,
{
    match console.choose(
        "Population",
        &["Binomial distribution", "Normal distribution", "Load from file"],
    )? {
        0 => {
            let size = console.ask::<usize>("Population size")?;
            let try_count = console.ask::<u64>("Number of trials")?;
            let probability = console.ask::<f64>("Probability of success")?;
            let distribution = Distribution::binomial(try_count, probability)?;
            Ok(Population::generate(size, distribution, rng))
        }
        1 => {
            let size = console.ask::<usize>("Population size")?;
            let mean = console.ask::<f64>("Mean")?;
            let standard_deviation = console.ask::<f64>("Standard deviation")?;
            let distribution = Distribution::normal(mean, standard_deviation)?;
            Ok(Population::generate(size, distribution, rng))
        }
        _ => load(console),
    }
}

fn print_values<R, W>(console: &mut Console<R, W>, data: &dyn Dataset) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let out = console.out();
    for value in data.values() {
        write!(out, "{value} ")?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_distribution<R, W>(console: &mut Console<R, W>, data: &dyn Dataset) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let distribution = data.distribution();
    let support = distribution.support();
    writeln!(console.out(), "{}: {distribution}", distribution.name())?;
    writeln!(
        console.out(),
        "{} random variable on {}",
        if support.is_discrete() {
            "Discrete"
        } else {
            "Continuous"
        },
        support.interval()
    )?;
    Ok(())
}

fn census<R, W>(console: &mut Console<R, W>, population: &Population) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    MomentComparison::theoretical(population)?.write_to(console.out())?;
    Ok(())
}

fn compare_with_population<R, W>(console: &mut Console<R, W>, session: &Session) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    MomentComparison::empirical(session.population(), session.selected())?
        .write_to(console.out())?;
    Ok(())
}

fn list_samples<R, W>(console: &mut Console<R, W>, population: &Population) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    if population.sample_count() == 0 {
        writeln!(console.out(), "No samples yet")?;
        return Ok(());
    }
    for (size, samples) in population.samples().iter() {
        writeln!(console.out(), "Samples of size {size}")?;
        for sample in samples {
            writeln!(console.out(), "- {}", sample.name())?;
        }
        match population.create_sample_mean_population(size) {
            Ok(means) => {
                writeln!(console.out(), "Sample means, predicted {}", means.distribution())?;
                MomentComparison::theoretical(&means)?.write_to(console.out())?;
            }
            Err(e) => report_error(console, anyhow::Error::from(e))?,
        }
    }
    Ok(())
}

fn draw_samples<R, W>(console: &mut Console<R, W>, session: &mut Session) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let size = console.ask::<usize>("Sample size")?;
    let method = match console.choose("Method", &["Without replacement", "With replacement"])? {
        0 => SamplingMethod::WithoutReplacement,
        _ => SamplingMethod::WithReplacement,
    };
    let count = console.ask::<usize>("Number of samples")?;
    if count == 0 {
        writeln!(console.out(), "Invalid number of samples: 0")?;
        return Ok(());
    }
    let range = session.draw_samples(size, method, count)?;
    if range.start() == range.end() {
        writeln!(console.out(), "Created Sample #{}", range.start())?;
    } else {
        writeln!(
            console.out(),
            "Created Sample #{} ~ Sample #{}",
            range.start(),
            range.end()
        )?;
    }
    Ok(())
}

fn select_sample<R, W>(console: &mut Console<R, W>, session: &mut Session) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let index = console.ask::<usize>("Sample number")?;
    if !session.select_sample(index) {
        writeln!(console.out(), "No such sample: #{index}")?;
    }
    Ok(())
}

fn confidence_interval<R, W>(console: &mut Console<R, W>, session: &Session) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let Some(sample) = session.selected_sample() else {
        return Ok(());
    };
    let multiplier = console.ask::<f64>("Multiplier (e.g. 1.96)")?;
    let estimate = sample.confidence_level(multiplier)?;
    let mean = session.population().distribution().mean();
    writeln!(console.out(), "Interval: {}", estimate.interval)?;
    writeln!(console.out(), "Confidence level: {}", estimate.level)?;
    writeln!(
        console.out(),
        "Population mean {mean} is {} the interval",
        if estimate.contains(mean) {
            "inside"
        } else {
            "outside"
        }
    )?;
    Ok(())
}

fn probability<R, W>(console: &mut Console<R, W>, data: &dyn Dataset) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let begin = console.ask::<f64>("From")?;
    let end = console.ask::<f64>("To")?;
    let comparison = Comparison::new(
        data.distribution().probability(begin, end),
        data.probability(begin, end)?,
    );
    writeln!(console.out(), "P({begin} <= X <= {end}): {comparison}")?;
    Ok(())
}

fn save<R, W>(console: &mut Console<R, W>, population: &Population) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let path = console.ask::<PathBuf>("File path")?;
    data_file::save_population(&path, population)?;
    writeln!(console.out(), "Saved {} values to {}", population.size(), path.display())?;
    Ok(())
}

fn load<R, W>(console: &mut Console<R, W>) -> anyhow::Result<Population>
where
    R: BufRead,
    W: Write,
{
    let path = console.ask::<PathBuf>("File path")?;
    let families = DistributionFamily::ALL.map(|family| family.to_string());
    let names = families.each_ref().map(String::as_str);
    let family = DistributionFamily::ALL[console.choose("Distribution", &names)?];
    let mut fitter = family.fitter();
    let population = data_file::load_population(&path, fitter.as_mut())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    writeln!(
        console.out(),
        "Loaded {} values, fitted {}",
        population.size(),
        population.distribution()
    )?;
    Ok(population)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use statsim_core::SimulationSeed;

    use super::*;

    fn run_script(script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes()), vec![]);
        let arg = InteractiveArg {
            seed: SeedArg::from(SimulationSeed::from(1)),
        };
        let result = run_with(&mut console, &arg);
        assert!(matches!(result, Err(ref e) if e.is::<InputClosed>()) || result.is_ok());
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_generate_and_census() {
        let output = run_script("1\n200\n10\n0.5\n3\n10\n");
        assert!(output.contains("Target: Population"));
        assert!(output.contains("mean:"));
        assert!(output.contains("expected 5,"));
    }

    #[test]
    fn test_draw_select_and_confidence() {
        // normal population, draw 3 samples of 10, select #2, confidence interval
        let output = run_script("2\n500\n0\n1\n5\n10\n1\n3\n6\n2\n4\n1.96\n7\n");
        assert!(output.contains("Created Sample #0 ~ Sample #2"));
        assert!(output.contains("Target: Sample #2"));
        assert!(output.contains("Confidence level: 0.95"));
    }

    #[test]
    fn test_recoverable_errors_are_reported() {
        // invalid probability first, then a valid binomial population; draw
        // a sample larger than the population without replacement
        let output = run_script("1\n10\n5\n1.5\n1\n10\n5\n0.5\n5\n11\n1\n1\n10\n");
        assert!(output.contains("Error: probability"));
        assert!(output.contains("Error: sample size 11 exceeds population size 10"));
    }

    #[test]
    fn test_sample_list_shows_clt_prediction() {
        let output = run_script("2\n100\n50\n10\n5\n4\n2\n2\n4\n10\n");
        assert!(output.contains("Samples of size 4"));
        assert!(output.contains("- Sample #0"));
        assert!(output.contains("- Sample #1"));
        assert!(output.contains("Sample means, predicted N(50, 5^2)"));
    }

    #[test]
    fn test_sample_list_of_population_without_spread() {
        // binomial with p = 1: every value and every sample mean is 10
        let output = run_script("1\n20\n10\n1\n5\n4\n1\n2\n4\n10\n");
        assert!(output.contains("- Sample #1"));
        assert!(output.contains("Sample means, predicted N(10, 0^2)"));
        assert!(output.contains("standard deviation: expected 0, observed 0 (error +0)"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_nested_errors_print_each_message_once() {
        let error = anyhow::Error::from(statsim_core::SampleError::from(
            statsim_core::DistributionError::NonFiniteMean { mean: f64::NAN },
        ));
        assert_eq!(
            format!("{error:#}"),
            "invalid sample-mean distribution: mean must be finite, got NaN"
        );
    }

    #[test]
    fn test_end_of_input_quits() {
        let output = run_script("2\n");
        assert!(output.contains("Population"));
    }
}

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use self::{
    fit::FitArg, generate::GenerateArg, interactive::InteractiveArg, pdf::PdfArg,
    simulate::SimulateArg,
};

mod fit;
mod generate;
mod interactive;
mod pdf;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Explore a population and its samples from a menu
    Interactive(#[clap(flatten)] InteractiveArg),
    /// Generate a population and write its values
    Generate(#[clap(flatten)] GenerateArg),
    /// Fit a distribution to a value file
    Fit(#[clap(flatten)] FitArg),
    /// Run a full sampling experiment and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Evaluate an external density program
    Pdf(#[clap(flatten)] PdfArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose)?;
    match args
        .mode
        .unwrap_or(Mode::Interactive(InteractiveArg::default()))
    {
        Mode::Interactive(arg) => interactive::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::Fit(arg) => fit::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Pdf(arg) => pdf::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

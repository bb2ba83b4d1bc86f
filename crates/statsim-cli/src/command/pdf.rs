use std::path::PathBuf;

use anyhow::Context as _;
use statsim_core::pdf_program::{PdfOperation, PdfProgram};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PdfArg {
    /// Density program to run
    program: PathBuf,
    /// Point to evaluate at
    #[arg(allow_negative_numbers = true)]
    x: f64,
    /// Operation to evaluate (pdf, cdf or icdf)
    #[arg(long, default_value = "pdf")]
    operation: PdfOperation,
    /// Argument placed before each command, e.g. a script path
    #[arg(long = "arg")]
    args: Vec<String>,
}

pub(crate) fn run(arg: &PdfArg) -> anyhow::Result<()> {
    let program = PdfProgram::load_with_args(&arg.program, &arg.args)
        .with_context(|| format!("Failed to load {}", arg.program.display()))?;
    let value = program.evaluate(arg.operation, arg.x)?;
    println!("{value}");
    Ok(())
}

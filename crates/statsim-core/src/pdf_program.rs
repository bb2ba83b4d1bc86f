//! User-supplied density programs.
//!
//! A PDF program is any executable that answers on standard output:
//!
//! - `<program> level`: the implementation level, an integer. Level 0
//!   provides `pdf` only, level 1 adds `cdf`, level 2 adds `icdf`.
//! - `<program> pdf <x>`, `<program> cdf <x>`, `<program> icdf <x>`: a
//!   single decimal number.

use std::{
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
    process::Command,
};

/// An operation a PDF program may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum PdfOperation {
    #[display("pdf")]
    Pdf,
    #[display("cdf")]
    Cdf,
    #[display("icdf")]
    Icdf,
}

impl PdfOperation {
    fn required_level(self) -> u32 {
        match self {
            Self::Pdf => 0,
            Self::Cdf => 1,
            Self::Icdf => 2,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PdfProgramError {
    #[display("failed to run {}", program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[display("{} {command} exited with {status}: {stderr}", program.display())]
    Failed {
        program: PathBuf,
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[display("{} {command} printed {output:?}, expected a number", program.display())]
    InvalidOutput {
        program: PathBuf,
        command: String,
        output: String,
    },
    #[display(
        "{} implements level {level}, {operation} needs level {}",
        program.display(),
        operation.required_level()
    )]
    Unsupported {
        program: PathBuf,
        level: u32,
        operation: PdfOperation,
    },
}

#[derive(Debug, Clone)]
pub struct PdfProgram {
    program: PathBuf,
    args: Vec<OsString>,
    level: u32,
}

impl PdfProgram {
    /// Queries `program` for its implementation level.
    pub fn load<P>(program: P) -> Result<Self, PdfProgramError>
    where
        P: AsRef<Path>,
    {
        Self::load_with_args(program, std::iter::empty::<&OsStr>())
    }

    /// Like [`Self::load`], with `args` placed before every command.
    ///
    /// Useful for interpreted programs, e.g. `python3 density.py`.
    pub fn load_with_args<P, I, S>(program: P, args: I) -> Result<Self, PdfProgramError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut this = Self {
            program: program.as_ref().to_owned(),
            args: args.into_iter().map(|a| a.as_ref().to_owned()).collect(),
            level: 0,
        };
        this.level = this.query("level", &[])?;
        log::debug!(
            "loaded PDF program {} (level {})",
            this.program.display(),
            this.level
        );
        Ok(this)
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn supports(&self, operation: PdfOperation) -> bool {
        self.level >= operation.required_level()
    }

    pub fn pdf(&self, x: f64) -> Result<f64, PdfProgramError> {
        self.evaluate(PdfOperation::Pdf, x)
    }

    pub fn cdf(&self, x: f64) -> Result<f64, PdfProgramError> {
        self.evaluate(PdfOperation::Cdf, x)
    }

    pub fn icdf(&self, x: f64) -> Result<f64, PdfProgramError> {
        self.evaluate(PdfOperation::Icdf, x)
    }

    pub fn evaluate(&self, operation: PdfOperation, x: f64) -> Result<f64, PdfProgramError> {
        if !self.supports(operation) {
            return Err(PdfProgramError::Unsupported {
                program: self.program.clone(),
                level: self.level,
                operation,
            });
        }
        self.query(&operation.to_string(), &[x.to_string()])
    }

    fn query<T>(&self, command: &str, extra: &[String]) -> Result<T, PdfProgramError>
    where
        T: std::str::FromStr,
    {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .args(extra)
            .output()
            .map_err(|source| PdfProgramError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let command = if extra.is_empty() {
            command.to_owned()
        } else {
            format!("{command} {}", extra.join(" "))
        };
        if !output.status.success() {
            return Err(PdfProgramError::Failed {
                program: self.program.clone(),
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = stdout.trim();
        log::trace!("{} {command} -> {text}", self.program.display());
        text.parse().map_err(|_| PdfProgramError::InvalidOutput {
            program: self.program.clone(),
            command,
            output: text.to_owned(),
        })
    }
}

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

/// Standard input reached end of file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("input closed")]
pub(crate) struct InputClosed;

/// Line-oriented prompts over a reader and a writer.
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{prompt} >>> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_owned())
    }

    /// Asks for a value until the answer parses.
    pub fn ask<T>(&mut self, prompt: &str) -> anyhow::Result<T>
    where
        T: FromStr,
    {
        loop {
            let line = self.read_line(prompt)?;
            if !line.is_empty()
                && let Ok(value) = line.parse()
            {
                return Ok(value);
            }
            writeln!(self.output, "Invalid input: {line:?}")?;
        }
    }

    /// Shows a numbered list and returns the 0-based index of the choice.
    pub fn choose(&mut self, title: &str, actions: &[&str]) -> anyhow::Result<usize> {
        writeln!(self.output, "{title}")?;
        for (i, action) in actions.iter().enumerate() {
            writeln!(self.output, "{}. {action}", i + 1)?;
        }
        loop {
            let choice = self.ask::<usize>("")?;
            if (1..=actions.len()).contains(&choice) {
                return Ok(choice - 1);
            }
            writeln!(self.output, "Unknown action: {choice}")?;
        }
    }
}

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Blocking user input for the command line.
///
/// The league itself never prompts; commands collect answers here and pass
/// plain values on.
pub trait InputSource {
    /// Entered text, or `None` when the user gave nothing
    fn prompt(&mut self, message: &str) -> Result<Option<String>>;

    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{message} [y/N]"))?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

/// Reads answers line by line from any reader, writing prompts to `output`
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

pub fn stdio() -> Console<std::io::StdinLock<'static>, std::io::Stderr> {
    Console::new(std::io::stdin().lock(), std::io::stderr())
}

impl<R: BufRead, W: Write> InputSource for Console<R, W> {
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message} ").context("Failed to write prompt")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

//! Blocking prompt-retry loop over a line-oriented input source.
//!
//! The loop is the only place the tool waits on the operator. It re-prompts
//! after every rejection, printing the validator's reason, until a value is
//! accepted. Retries are unbounded unless a maximum is configured; end of
//! input always ends the loop with [`PromptError::InputClosed`].
use crate::record::format_date;
use crate::validate::{self, Verdict};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed while waiting for the {label}")]
    InputClosed { label: String },
    #[error("gave up on the {label} after {attempts} rejected attempts")]
    TooManyAttempts { label: String, attempts: u32 },
}

/// What to ask for: the field label and the lines shown before each attempt.
#[derive(Debug, Clone)]
pub struct Request {
    pub label: String,
    pub instructions: Vec<String>,
}

impl Request {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            instructions: Vec::new(),
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.instructions.push(text.into());
        self
    }
}

/// How an accepted value is echoed back, in the form it will be stored.
pub trait Captured {
    fn echo(&self) -> String;
}

impl Captured for String {
    fn echo(&self) -> String {
        self.clone()
    }
}

impl Captured for u32 {
    fn echo(&self) -> String {
        self.to_string()
    }
}

impl Captured for NaiveDate {
    fn echo(&self) -> String {
        format_date(*self)
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: Option<u32>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Bound the number of rejected attempts per prompt (`None` = unbounded).
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print one line of operator-facing text.
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).context("write to terminal")?;
        Ok(())
    }

    /// Ask until `validate` accepts, echoing the captured value.
    pub fn ask<T: Captured>(
        &mut self,
        request: &Request,
        mut validate: impl FnMut(&str) -> Verdict<T>,
    ) -> Result<T> {
        self.ask_with(request, |raw| Ok(validate(raw)))
    }

    /// Like [`Prompter::ask`], for validators that need fallible context
    /// (such as a fresh store read) on every attempt.
    pub fn ask_with<T: Captured>(
        &mut self,
        request: &Request,
        validate: impl FnMut(&str) -> Result<Verdict<T>>,
    ) -> Result<T> {
        let value = self.retry(request, validate)?;
        self.say(format!("Valid {} captured: {}.\n", request.label, value.echo()))?;
        Ok(value)
    }

    /// Present a numbered list and return the zero-based index picked.
    pub fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        let mut request = Request::new("selection").line(message);
        for (idx, choice) in choices.iter().enumerate() {
            request = request.line(format!("  {}) {choice}", idx + 1));
        }
        let index = self.retry(&request, |raw| Ok(validate::choice(raw, choices)))?;
        self.say(format!("You have selected {}.\n", choices[index]))?;
        Ok(index)
    }

    /// Yes/No question; true on Yes.
    pub fn confirm(&mut self, message: &str) -> Result<bool> {
        let choices = ["Yes".to_string(), "No".to_string()];
        Ok(self.select(message, &choices)? == 0)
    }

    fn retry<T>(
        &mut self,
        request: &Request,
        mut validate: impl FnMut(&str) -> Result<Verdict<T>>,
    ) -> Result<T> {
        let mut attempts = 0u32;
        loop {
            for line in &request.instructions {
                self.say(line)?;
            }
            let raw = self.read_value(&request.label)?;
            match validate(&raw)? {
                Ok(value) => return Ok(value),
                Err(rejection) => {
                    attempts += 1;
                    tracing::debug!(
                        label = %request.label,
                        value = rejection.value(),
                        attempts,
                        "input rejected"
                    );
                    self.say(format!("{rejection}\n"))?;
                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(PromptError::TooManyAttempts {
                            label: request.label.clone(),
                            attempts,
                        }
                        .into());
                    }
                }
            }
        }
    }

    fn read_value(&mut self, label: &str) -> Result<String> {
        writeln!(self.output, "Enter the {label} here:").context("write to terminal")?;
        self.output.flush().context("flush terminal")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("read operator input")?;
        if read == 0 {
            return Err(PromptError::InputClosed {
                label: label.to_string(),
            }
            .into());
        }
        Ok(line.trim().to_string())
    }
}

/// True when `err` (at any context depth) is a closed input stream.
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PromptError>(),
        Some(PromptError::InputClosed { .. })
    )
}

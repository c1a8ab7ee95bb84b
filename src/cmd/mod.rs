pub mod ask;
pub mod calendar;
pub mod classify;
pub mod dates;
pub mod invoice;
pub mod pdf;
pub mod result;
pub mod schema;
pub mod session;

use crate::config::Config;
use crate::core::{parse_income, Assessment, TaxpayerAnswers};
use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Taxpayer answers given as flags or as a saved answers file.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// JSON file with answers (or "-" for stdin); see `pinoytax schema answers`
    #[arg(long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Registered with the BIR
    #[arg(long, conflicts_with = "answers")]
    bir: bool,

    /// Earns or sells online
    #[arg(long, conflicts_with = "answers")]
    online: bool,

    /// Operates a physical store
    #[arg(long, conflicts_with = "answers")]
    store: bool,

    /// Uses a POS or computerized accounting system
    #[arg(long)]
    pos: bool,

    /// Estimated gross annual income in PHP
    #[arg(long, value_name = "PHP", conflicts_with = "answers")]
    income: Option<String>,

    /// Elected the 8% income tax option (true/false)
    #[arg(long, value_name = "BOOL", conflicts_with = "answers")]
    eight_percent: Option<bool>,

    /// Date the 8% option was declared to the BIR
    #[arg(long, value_name = "YYYY-MM-DD")]
    declared_on: Option<NaiveDate>,

    /// Tax year (default: current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Evaluate compliance as of this date (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,

    /// Skip the reminder 7 days before each due date
    #[arg(long)]
    no_reminder_7: bool,

    /// Skip the reminder 3 days before each due date
    #[arg(long)]
    no_reminder_3: bool,

    /// Skip the reminder on the due date
    #[arg(long)]
    no_reminder_due: bool,
}

impl ProfileArgs {
    pub fn to_answers(&self, config: &Config) -> anyhow::Result<TaxpayerAnswers> {
        let answers = match &self.answers {
            Some(path) => {
                let mut answers = read_answers(path)?;
                self.apply_overrides(&mut answers);
                answers
            }
            None => self.answers_from_flags(config)?,
        };
        answers.validate()?;
        Ok(answers)
    }

    fn answers_from_flags(&self, config: &Config) -> anyhow::Result<TaxpayerAnswers> {
        let income = match &self.income {
            Some(input) => parse_income(input)?,
            None if self.bir => bail!("--income is required for BIR-registered taxpayers"),
            None => Decimal::ZERO,
        };

        let year = self.year.unwrap_or_else(|| Local::now().year());
        let mut answers = TaxpayerAnswers::new(year, config.default_reminders()).with_income(income);
        answers.has_bir = self.bir;
        answers.online = self.online;
        answers.has_store = self.store;
        answers.use_eight_percent = self.eight_percent;
        self.apply_overrides(&mut answers);
        Ok(answers)
    }

    /// Flags that refine answers from either source.
    fn apply_overrides(&self, answers: &mut TaxpayerAnswers) {
        if let Some(year) = self.year {
            answers.tax_year = year;
        }
        if self.pos {
            answers.uses_pos = true;
        }
        if self.declared_on.is_some() {
            answers.eight_percent_declared_on = self.declared_on;
        }
        let reminders = &mut answers.reminders;
        reminders.before7 &= !self.no_reminder_7;
        reminders.before3 &= !self.no_reminder_3;
        reminders.on_due &= !self.no_reminder_due;
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn assess(&self, config: &Config) -> anyhow::Result<Assessment> {
        let answers = self.to_answers(config)?;
        Ok(Assessment::new(answers, self.as_of()))
    }
}

/// Read answers JSON from a file (or stdin with "-").
pub fn read_answers(path: &Path) -> anyhow::Result<TaxpayerAnswers> {
    let answers: TaxpayerAnswers = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        if buffer.trim().is_empty() {
            bail!("No input received. Provide a file or pipe answers to stdin.");
        }
        serde_json::from_str(&buffer)?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Unable to open answers file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Answers file {} is not valid", path.display()))?
    };
    Ok(answers.normalized())
}

/// Open a written file with the system handler when asked to.
pub fn maybe_open(path: &Path, open: bool) -> anyhow::Result<()> {
    if open {
        opener::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    }
    Ok(())
}

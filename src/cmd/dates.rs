//! Dates command - filing deadlines for the tax year

use crate::cmd::ProfileArgs;
use crate::config::Config;
use crate::core::DueDateEntry;
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DatesCommand {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Output as CSV instead of a table
    #[arg(long)]
    csv: bool,
}

/// Row for the due-date table and CSV output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct DateRow {
    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Form")]
    form: String,

    #[tabled(rename = "Filing")]
    label: String,

    #[tabled(rename = "Note")]
    note: String,
}

impl DatesCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let assessment = self.profile.assess(config)?;
        let rows = build_rows(&assessment.due_dates);

        if self.csv {
            write_csv(&rows)
        } else {
            if rows.is_empty() {
                println!("Walang filing deadlines: {}", assessment.category.label);
                return Ok(());
            }
            println!("{} ({})", assessment.category.label, assessment.answers.tax_year);
            print_table(&rows);
            Ok(())
        }
    }
}

fn build_rows(entries: &[DueDateEntry]) -> Vec<DateRow> {
    entries
        .iter()
        .map(|e| DateRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            form: e.form.clone(),
            label: e.label.clone(),
            note: e.note.clone().unwrap_or_default(),
        })
        .collect()
}

fn print_table(rows: &[DateRow]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[DateRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

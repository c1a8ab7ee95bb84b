//! Classify command - non-interactive result screen

use crate::cmd::{result, ProfileArgs};
use crate::config::Config;
use crate::core::{Assessment, CategoryKey, ComplianceIssue, DueDateEntry, FilingChecklist};
use crate::session::SessionStore;
use chrono::Utc;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ClassifyCommand {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Also explain why this category was chosen
    #[arg(long)]
    why: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Do not overwrite the saved session
    #[arg(long)]
    no_save: bool,
}

/// Classification for JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput<'a> {
    tax: CategoryKey,
    label: &'static str,
    rate: Option<String>,
    requires_electronic_invoice: bool,
    checklist: &'a FilingChecklist,
    due_dates: &'a [DueDateEntry],
    issues: &'a [ComplianceIssue],
    explanation: Vec<String>,
}

impl ClassifyCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let assessment = self.profile.assess(config)?;

        if self.json {
            print_json(&assessment)?;
        } else {
            print!("{}", result::render(&assessment, self.why));
        }

        if !self.no_save {
            SessionStore::new(config.data_dir()).save(&assessment, Utc::now())?;
        }
        Ok(())
    }
}

/// Shared by `ask` so both commands persist and print the same way.
pub fn print_json(assessment: &Assessment) -> anyhow::Result<()> {
    let output = ClassifyOutput {
        tax: assessment.category.key,
        label: assessment.category.label,
        rate: assessment.category.rate.map(|r| format!("{:.2}", r)),
        requires_electronic_invoice: assessment.requires_einvoice,
        checklist: &assessment.checklist,
        due_dates: &assessment.due_dates,
        issues: &assessment.issues,
        explanation: crate::core::explain(&assessment.answers),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

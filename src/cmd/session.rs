//! Session commands - inspect or clear the saved result

use crate::config::Config;
use crate::core::category;
use crate::session::SessionStore;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    action: SessionAction,
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Print the saved result
    Show {
        /// Output the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },
    /// Delete the saved result
    Clear,
}

impl SessionCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let store = SessionStore::new(config.data_dir());
        match self.action {
            SessionAction::Show { json } => show(&store, json),
            SessionAction::Clear => clear(&store),
        }
    }
}

/// Reset command - forget the saved result so the next run starts fresh
#[derive(Args, Debug)]
pub struct ResetCommand {}

impl ResetCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        clear(&SessionStore::new(config.data_dir()))
    }
}

fn show(store: &SessionStore, json: bool) -> anyhow::Result<()> {
    let Some(session) = store.load()? else {
        println!("No saved result at {}", store.path().display());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!("Saved result ({})", store.path().display());
    println!("Generated:   {}", session.generated_at);
    println!("App version: {}", session.app_version);
    println!("Tax year:    {}", session.answers.tax_year);
    println!("Tax type:    {}", category(session.tax).label);
    println!("Due dates:   {}", session.due_dates.len());
    Ok(())
}

fn clear(store: &SessionStore) -> anyhow::Result<()> {
    if store.clear()? {
        println!("Saved result removed.");
    } else {
        println!("Nothing to clear.");
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod core;
mod export;
mod session;
mod wizard;

use crate::config::Config;

/// Classify a Philippine small taxpayer and build their filing calendar
#[derive(Parser, Debug)]
#[command(name = "pinoytax", version, about)]
struct Cli {
    /// Config file (default: <config dir>/pinoytax/config.json)
    #[arg(long, global = true, env = "PINOYTAX_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the saved result
    #[arg(long, global = true, env = "PINOYTAX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory exported files are written to
    #[arg(short, long, global = true, env = "PINOYTAX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer the questionnaire interactively
    Ask(cmd::ask::AskCommand),
    /// Classify from flags or an answers file
    Classify(cmd::classify::ClassifyCommand),
    /// List filing deadlines
    Dates(cmd::dates::DatesCommand),
    /// Export deadlines as an .ics calendar
    Calendar(cmd::calendar::CalendarCommand),
    /// Export a JSON invoice record
    Invoice(cmd::invoice::InvoiceCommand),
    /// Export a printable compliance summary or invoice
    Pdf(cmd::pdf::PdfCommand),
    /// Inspect or clear the saved result
    Session(cmd::session::SessionCommand),
    /// Start over by deleting the saved result
    Reset(cmd::session::ResetCommand),
    /// Print JSON Schemas for the answers, invoice and session formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() {
    pretty_env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?
        .with_data_dir(cli.data_dir)
        .with_output_dir(cli.output_dir);
    log::debug!("config: {:?}", config);

    match cli.command {
        Command::Ask(cmd) => cmd.exec(&config),
        Command::Classify(cmd) => cmd.exec(&config),
        Command::Dates(cmd) => cmd.exec(&config),
        Command::Calendar(cmd) => cmd.exec(&config),
        Command::Invoice(cmd) => cmd.exec(&config),
        Command::Pdf(cmd) => cmd.exec(&config),
        Command::Session(cmd) => cmd.exec(&config),
        Command::Reset(cmd) => cmd.exec(&config),
        Command::Schema(cmd) => cmd.exec(),
    }
}

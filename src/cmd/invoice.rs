//! Invoice command - export the classification as a JSON invoice record

use crate::cmd::ProfileArgs;
use crate::config::Config;
use crate::export::invoice::build_invoice;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct InvoiceCommand {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

impl InvoiceCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let assessment = self.profile.assess(config)?;
        let invoice = build_invoice(&assessment, Utc::now());

        if self.stdout {
            println!("{}", invoice.to_json()?);
        } else {
            let path = invoice.write(config.output_dir())?;
            println!("Invoice saved: {}", path.display());
        }
        Ok(())
    }
}

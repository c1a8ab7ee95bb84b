//! Schema command - print the JSON formats this tool reads and writes

use crate::core::TaxpayerAnswers;
use crate::export::invoice::InvoiceRecord;
use crate::session::PersistedSession;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which document to describe
    #[arg(value_enum, default_value = "answers")]
    kind: SchemaKind,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaKind {
    /// Answers file accepted by --answers
    Answers,
    /// JSON invoice written by `invoice`
    Invoice,
    /// Saved result written after every classification
    Session,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.kind {
            SchemaKind::Answers => schema_for!(TaxpayerAnswers),
            SchemaKind::Invoice => schema_for!(InvoiceRecord),
            SchemaKind::Session => schema_for!(PersistedSession),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

//! PDF command - printable compliance summary or invoice

use crate::cmd::{maybe_open, ProfileArgs};
use crate::config::Config;
use crate::export::invoice::build_invoice;
use crate::export::pdf::{
    compliance_document, export_html, export_pdf, invoice_document, CommandRenderer, Layout,
    PdfVariant,
};
use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PdfCommand {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Which document to produce
    #[arg(long, value_enum, default_value_t = VariantArg::Compliance)]
    variant: VariantArg,

    /// Write the printable HTML instead of running the PDF converter
    #[arg(long)]
    html: bool,

    /// Directory with compliance.html / invoice.html layouts
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Open the file after writing it
    #[arg(long)]
    open: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum VariantArg {
    #[default]
    Compliance,
    Invoice,
}

impl From<VariantArg> for PdfVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Compliance => PdfVariant::Compliance,
            VariantArg::Invoice => PdfVariant::Invoice,
        }
    }
}

impl PdfCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let assessment = self.profile.assess(config)?;
        let variant = PdfVariant::from(self.variant);

        let document = match variant {
            PdfVariant::Compliance => compliance_document(&assessment, Local::now()),
            PdfVariant::Invoice => {
                let invoice = build_invoice(&assessment, Utc::now());
                invoice_document(&invoice, &assessment)
            }
        };

        let templates = self.templates.as_deref().or(config.templates_dir());
        let layout = Layout::load(templates, document.variant)?;

        let path = if self.html {
            export_html(&document, &layout, config.output_dir())?
        } else {
            let renderer = CommandRenderer::from_command(config.pdf_command())?;
            export_pdf(&document, &layout, &renderer, config.output_dir())
                .context("PDF export failed; try --html and print from a browser")?
        };

        println!("Saved: {}", path.display());
        maybe_open(&path, self.open)
    }
}

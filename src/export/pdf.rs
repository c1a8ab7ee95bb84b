//! PDF export.
//!
//! A document is a list of titled text blocks. A layout template turns the
//! blocks into printable HTML, and a [`PdfRenderer`] turns that HTML into a
//! PDF. The HTML is staged in a temporary file that is removed whether or not
//! rendering succeeds.

use super::invoice::InvoiceRecord;
use super::{ExportError, APP_VERSION};
use crate::core::format::{format_php, format_rate, format_short_date, yes_no};
use crate::core::{Assessment, FilingChecklist, ROLLOUT_DISCLAIMER};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

const COMPLIANCE_TEMPLATE: &str = "compliance.html";
const INVOICE_TEMPLATE: &str = "invoice.html";
const SECTIONS_PLACEHOLDER: &str = "{{sections}}";
const TITLE_PLACEHOLDER: &str = "{{title}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfVariant {
    Compliance,
    Invoice,
}

impl PdfVariant {
    fn template_name(&self) -> &'static str {
        match self {
            PdfVariant::Compliance => COMPLIANCE_TEMPLATE,
            PdfVariant::Invoice => INVOICE_TEMPLATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSection {
    pub id: &'static str,
    pub title: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub variant: PdfVariant,
    pub title: String,
    pub filename: String,
    pub sections: Vec<PdfSection>,
}

#[cfg(test)]
impl PdfDocument {
    pub fn section(&self, id: &str) -> Option<&PdfSection> {
        self.sections.iter().find(|s| s.id == id)
    }
}

fn section(id: &'static str, title: &'static str, body: String) -> PdfSection {
    PdfSection { id, title, body }
}

fn checklist_text(checklist: &FilingChecklist) -> String {
    let list = |items: &[String]| {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join("\n- ")
        }
    };
    format!(
        "Monthly:\n- {}\n\nQuarterly:\n- {}\n\nAnnual:\n- {}",
        list(&checklist.monthly),
        list(&checklist.quarterly),
        list(&checklist.annual)
    )
}

fn warnings_text(issues: &[String]) -> String {
    if issues.is_empty() {
        "No compliance issues detected.".to_string()
    } else {
        issues
            .iter()
            .map(|i| format!("⚠️ {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compliance summary: classification, checklist and calendar.
pub fn compliance_document(assessment: &Assessment, generated_at: DateTime<Local>) -> PdfDocument {
    let answers = &assessment.answers;
    let tax = assessment.category;

    let dates = assessment
        .due_dates
        .iter()
        .map(|d| {
            let mut line = format!("{} – {}", d.label, format_short_date(d.date));
            if let Some(note) = &d.note {
                line.push('\n');
                line.push_str(note);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let issues: Vec<String> = assessment.issues.iter().map(|i| i.message()).collect();

    PdfDocument {
        variant: PdfVariant::Compliance,
        title: format!("Pinoy Tax Compliance Summary {}", answers.tax_year),
        filename: format!("pinoy-tax-compliance-{}.pdf", answers.tax_year),
        sections: vec![
            section(
                "pdfMeta",
                "Details",
                format!(
                    "Generated: {}\nTax Year: {}\nApp Version: {}",
                    generated_at.format("%-m/%-d/%Y, %-I:%M:%S %p"),
                    answers.tax_year,
                    APP_VERSION
                ),
            ),
            section(
                "pdfProfile",
                "Taxpayer Profile",
                format!(
                    "BIR Registered: {}\nOnline Seller: {}\nPhysical Store: {}\nDeclared Income: {}",
                    yes_no(answers.has_bir),
                    yes_no(answers.online),
                    yes_no(answers.has_store),
                    format_php(answers.income_amount())
                ),
            ),
            section(
                "pdfResult",
                "Classification",
                format!(
                    "{}\n{}\n\nElectronic Invoice Requirement:\n{}\n{}",
                    tax.label,
                    tax.notes.summary,
                    assessment.einvoice_text(),
                    ROLLOUT_DISCLAIMER
                ),
            ),
            section("pdfChecklist", "Filing Checklist", checklist_text(&assessment.checklist)),
            section("pdfDates", "Due Dates", dates),
            section("pdfWarnings", "Compliance Warnings", warnings_text(&issues)),
        ],
    }
}

/// Invoice document, populated from the same record as the JSON export.
pub fn invoice_document(invoice: &InvoiceRecord, assessment: &Assessment) -> PdfDocument {
    let invoice_type = if assessment.requires_einvoice {
        "Electronic Invoice (RR 11-2025)"
    } else {
        "Manual Invoice – Micro Taxpayer (Exempt)"
    };
    let gross = format_php(invoice.income.gross);
    let tax_due = format_php(invoice.income.tax_due);
    let rate = format_rate(invoice.tax.rate);
    let issued = DateTime::parse_from_rfc3339(&invoice.issued_at)
        .map(|dt| dt.with_timezone(&Local).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|_| invoice.issued_at.clone());
    let profile = &invoice.taxpayer_profile;

    PdfDocument {
        variant: PdfVariant::Invoice,
        title: format!("Invoice {}", invoice.invoice_id),
        filename: format!("invoice-{}.pdf", invoice.invoice_id),
        sections: vec![
            section(
                "invoicePdfMeta",
                "Invoice",
                format!(
                    "Invoice ID: {}\nIssued: {}\nTax Year: {}\nApp Version: {}",
                    invoice.invoice_id, issued, invoice.tax_year, invoice.app.version
                ),
            ),
            section(
                "invoicePdfProfile",
                "Taxpayer Profile",
                format!(
                    "BIR Registered: {}\nOnline Seller: {}\nPhysical Store: {}\nDeclared Income: {}",
                    yes_no(profile.bir_registered),
                    yes_no(profile.online_seller),
                    yes_no(profile.physical_store),
                    gross
                ),
            ),
            section(
                "invoicePdfResult",
                "Classification",
                format!(
                    "{}\nInvoice Type: {}\n{}\nRate: {}\nEstimated annual tax (reference): {}",
                    invoice.tax.label, invoice_type, ROLLOUT_DISCLAIMER, rate, tax_due
                ),
            ),
            section(
                "invoicePdfAmounts",
                "Amounts",
                format!(
                    "Gross Income: {}\nTax Rate: {}\nEstimated tax based on declared income (annual reference): {}",
                    gross, rate, tax_due
                ),
            ),
            section("invoicePdfChecklist", "Filing Checklist", checklist_text(&invoice.filing)),
            section(
                "invoicePdfDates",
                "Due Dates",
                invoice
                    .due_dates
                    .iter()
                    .map(|d| format!("{} – {}", d.label, d.date))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            section(
                "invoicePdfWarnings",
                "Compliance Warnings",
                warnings_text(&invoice.compliance.issues),
            ),
        ],
    }
}

/// HTML page layout with `{{title}}` and `{{sections}}` placeholders.
#[derive(Debug, Clone)]
pub struct Layout {
    template: String,
}

impl Layout {
    pub fn builtin() -> Self {
        Layout {
            template: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Load the variant's layout from `templates_dir`, or the built-in one if none is configured.
    pub fn load(templates_dir: Option<&Path>, variant: PdfVariant) -> Result<Self, ExportError> {
        let Some(dir) = templates_dir else {
            return Ok(Layout::builtin());
        };
        let path = dir.join(variant.template_name());
        if !path.is_file() {
            return Err(ExportError::LayoutNotFound(path));
        }
        let template = std::fs::read_to_string(&path)?;
        if !template.contains(SECTIONS_PLACEHOLDER) {
            return Err(ExportError::InvalidLayout(path));
        }
        log::debug!("using layout {}", path.display());
        Ok(Layout { template })
    }

    pub fn render(&self, document: &PdfDocument) -> String {
        let sections: String = document
            .sections
            .iter()
            .map(|s| {
                format!(
                    "<section id=\"{}\">\n<h2>{}</h2>\n<pre>{}</pre>\n</section>\n",
                    s.id,
                    escape_html(s.title),
                    escape_html(&s.body)
                )
            })
            .collect();
        self.template
            .replace(TITLE_PLACEHOLDER, &escape_html(&document.title))
            .replace(SECTIONS_PLACEHOLDER, &sections)
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Converts a staged HTML page into a PDF at `output`.
pub trait PdfRenderer {
    fn render(&self, html: &Path, output: &Path) -> Result<(), ExportError>;
}

/// Runs an external HTML-to-PDF converter as `<program> <args..> <html> <output>`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Build from a command line such as `["wkhtmltopdf", "--quiet"]`.
    pub fn from_command(command: &[String]) -> Result<Self, ExportError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ExportError::Render("no PDF converter configured".to_string()))?;
        Ok(CommandRenderer {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl PdfRenderer for CommandRenderer {
    fn render(&self, html: &Path, output: &Path) -> Result<(), ExportError> {
        log::debug!("running {} {:?} on {}", self.program, self.args, html.display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(html)
            .arg(output)
            .status()
            .map_err(|e| ExportError::Render(format!("could not run {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(ExportError::Render(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Render `document` to `dir/<document filename>`.
pub fn export_pdf(
    document: &PdfDocument,
    layout: &Layout,
    renderer: &dyn PdfRenderer,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let output = dir.join(&document.filename);

    // removed on drop, on every path out of this function
    let mut staged = tempfile::Builder::new()
        .prefix("pinoytax-render-")
        .suffix(".html")
        .tempfile()?;
    staged.write_all(layout.render(document).as_bytes())?;
    staged.flush()?;

    renderer.render(staged.path(), &output)?;
    log::info!("wrote {}", output.display());
    Ok(output)
}

/// Write the printable HTML itself, for printing to PDF from a browser.
pub fn export_html(document: &PdfDocument, layout: &Layout, dir: &Path) -> Result<PathBuf, ExportError> {
    let filename = Path::new(&document.filename).with_extension("html");
    super::write_artifact(dir, &filename.to_string_lossy(), layout.render(document).as_bytes())
}

const BUILTIN_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{title}}</title>
    <style>
        @page { size: A4 portrait; margin: 12mm; }
        body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #111; background: #fff; }
        h1 { font-size: 20px; border-bottom: 2px solid #0038a8; padding-bottom: 6px; }
        h2 { font-size: 14px; color: #0038a8; margin: 18px 0 6px; }
        section { page-break-inside: avoid; }
        pre { font-family: inherit; white-space: pre-wrap; margin: 0; line-height: 1.45; }
        footer { margin-top: 24px; font-size: 10px; color: #666; }
    </style>
</head>
<body>
    <h1>{{title}}</h1>
{{sections}}
    <footer>Pinoy Tax Assistant. Classification only; consult the BIR for official guidance.</footer>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxpayerAnswers;
    use crate::export::invoice::build_invoice;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    fn assessment() -> Assessment {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(1250000));
        answers.has_bir = true;
        answers.has_store = true;
        answers.tax_year = 2025;
        Assessment::new(answers, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    /// Records the staged path, then succeeds or fails as configured.
    struct RecordingRenderer {
        staged: RefCell<Option<PathBuf>>,
        fail: bool,
    }

    impl RecordingRenderer {
        fn new(fail: bool) -> Self {
            RecordingRenderer {
                staged: RefCell::new(None),
                fail,
            }
        }
    }

    impl PdfRenderer for RecordingRenderer {
        fn render(&self, html: &Path, output: &Path) -> Result<(), ExportError> {
            assert!(html.exists());
            *self.staged.borrow_mut() = Some(html.to_path_buf());
            if self.fail {
                return Err(ExportError::Render("boom".to_string()));
            }
            std::fs::copy(html, output)?;
            Ok(())
        }
    }

    #[test]
    fn compliance_document_sections() {
        let doc = compliance_document(&assessment(), generated_at());
        assert_eq!(doc.filename, "pinoy-tax-compliance-2025.pdf");

        let profile = &doc.section("pdfProfile").unwrap().body;
        assert!(profile.contains("Physical Store: Yes"));
        assert!(profile.contains("Declared Income: ₱1,250,000.00"));

        let result = &doc.section("pdfResult").unwrap().body;
        assert!(result.starts_with("Percentage tax (3%)"));
        assert!(result.contains("Manual resibo"));

        let dates = &doc.section("pdfDates").unwrap().body;
        assert!(dates.starts_with("Percentage Tax (2551Q) – April 25"));

        assert_eq!(
            doc.section("pdfWarnings").unwrap().body,
            "No compliance issues detected."
        );
    }

    #[test]
    fn invoice_document_uses_invoice_record() {
        let a = assessment();
        let invoice = build_invoice(&a, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        let doc = invoice_document(&invoice, &a);

        assert_eq!(doc.filename, format!("invoice-{}.pdf", invoice.invoice_id));
        let amounts = &doc.section("invoicePdfAmounts").unwrap().body;
        assert!(amounts.contains("Gross Income: ₱1,250,000.00"));
        assert!(amounts.contains("Tax Rate: 3%"));
        assert!(amounts.contains("₱37,500.00"));
        let dates = &doc.section("invoicePdfDates").unwrap().body;
        assert!(dates.contains("Percentage Tax (2551Q) – January 25, 2026"));
    }

    #[test]
    fn empty_checklist_prints_none() {
        let text = checklist_text(&FilingChecklist::default());
        assert_eq!(text, "Monthly:\n- None\n\nQuarterly:\n- None\n\nAnnual:\n- None");
    }

    #[test]
    fn layout_escapes_section_text() {
        let mut doc = compliance_document(&assessment(), generated_at());
        doc.sections[0].body = "<b>&</b>".to_string();
        let html = Layout::builtin().render(&doc);
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(html.contains("<section id=\"pdfDates\">"));
        assert!(!html.contains(SECTIONS_PLACEHOLDER));
    }

    #[test]
    fn missing_layout_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Layout::load(Some(dir.path()), PdfVariant::Invoice).unwrap_err();
        match err {
            ExportError::LayoutNotFound(path) => assert_eq!(path, dir.path().join("invoice.html")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn layout_without_placeholder_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("compliance.html"), "<html></html>").unwrap();
        assert!(matches!(
            Layout::load(Some(dir.path()), PdfVariant::Compliance),
            Err(ExportError::InvalidLayout(_))
        ));
    }

    #[test]
    fn staged_html_removed_after_success() {
        let dir = tempfile::TempDir::new().unwrap();
        let renderer = RecordingRenderer::new(false);
        let doc = compliance_document(&assessment(), generated_at());

        let output = export_pdf(&doc, &Layout::builtin(), &renderer, dir.path()).unwrap();
        assert!(output.exists());
        let staged = renderer.staged.borrow().clone().unwrap();
        assert!(!staged.exists());
    }

    #[test]
    fn staged_html_removed_after_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let renderer = RecordingRenderer::new(true);
        let doc = compliance_document(&assessment(), generated_at());

        let result = export_pdf(&doc, &Layout::builtin(), &renderer, dir.path());
        assert!(matches!(result, Err(ExportError::Render(_))));
        let staged = renderer.staged.borrow().clone().unwrap();
        assert!(!staged.exists());
        assert!(!dir.path().join(&doc.filename).exists());
    }

    #[test]
    fn empty_converter_command_is_an_error() {
        assert!(CommandRenderer::from_command(&[]).is_err());
    }

    #[test]
    fn html_export_swaps_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = compliance_document(&assessment(), generated_at());
        let path = export_html(&doc, &Layout::builtin(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("pinoy-tax-compliance-2025.html"));
    }
}

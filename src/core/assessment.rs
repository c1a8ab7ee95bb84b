use super::answers::TaxpayerAnswers;
use super::checklist::{build_checklist, FilingChecklist};
use super::compliance::{check_compliance, ComplianceIssue};
use super::due_dates::{generate_due_dates, DueDateEntry};
use super::einvoice::requires_electronic_invoice;
use super::format::round2;
use super::rules::{classify, TaxCategory};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Everything derived from one set of answers.
///
/// Built once and handed by reference to every exporter, so the JSON, PDF and
/// calendar outputs all see the same classification and e-invoice flag.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub answers: TaxpayerAnswers,
    pub category: &'static TaxCategory,
    pub checklist: FilingChecklist,
    pub due_dates: Vec<DueDateEntry>,
    pub issues: Vec<ComplianceIssue>,
    pub requires_einvoice: bool,
}

impl Assessment {
    pub fn new(answers: TaxpayerAnswers, as_of: NaiveDate) -> Self {
        let category = classify(&answers);
        let checklist = build_checklist(category);
        let due_dates = generate_due_dates(category, answers.tax_year);
        let issues = check_compliance(&answers, as_of);
        let requires_einvoice = requires_electronic_invoice(&answers);

        Assessment {
            answers,
            category,
            checklist,
            due_dates,
            issues,
            requires_einvoice,
        }
    }

    /// Reference estimate: gross income times the category rate.
    pub fn tax_due(&self) -> Decimal {
        self.category
            .rate
            .map(|rate| round2(self.answers.income_amount() * rate))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn einvoice_text(&self) -> &'static str {
        if self.requires_einvoice {
            "Kailangan mag-electronic invoice (RR 11-2025)"
        } else {
            "Manual resibo pa ang pinapayagan (Micro taxpayer)"
        }
    }
}

/// Appended to every e-invoice statement.
pub const ROLLOUT_DISCLAIMER: &str =
    "Classification only. Transmission requirements are subject to BIR rollout.";

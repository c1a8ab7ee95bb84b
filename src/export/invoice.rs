//! JSON invoice record.

use super::{write_artifact, ExportError, APP_NAME, APP_VERSION};
use crate::core::format::{format_long_date, round2};
use crate::core::{Assessment, CategoryKey, FilingChecklist};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of an assessment, written once and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_id: String,
    /// ISO-8601 issue time
    pub issued_at: String,
    pub tax_year: i32,
    pub taxpayer_profile: TaxpayerProfile,
    pub tax: InvoiceTax,
    pub income: InvoiceIncome,
    pub filing: FilingChecklist,
    pub due_dates: Vec<InvoiceDueDate>,
    pub compliance: InvoiceCompliance,
    pub app: AppInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxpayerProfile {
    pub bir_registered: bool,
    pub online_seller: bool,
    pub physical_store: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceTax {
    #[serde(rename = "type")]
    pub kind: CategoryKey,
    pub label: String,
    /// Zero when the category has no rate
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceIncome {
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub gross: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub tax_due: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceDueDate {
    pub label: String,
    /// Localized, e.g. "April 25, 2025"
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCompliance {
    pub issues: Vec<String>,
    pub eight_percent_declared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

pub fn invoice_id(tax_year: i32, issued_at: DateTime<Utc>) -> String {
    format!("INV-{}-{}", tax_year, issued_at.timestamp_millis())
}

pub fn build_invoice(assessment: &Assessment, issued_at: DateTime<Utc>) -> InvoiceRecord {
    let answers = &assessment.answers;
    let tax = assessment.category;

    InvoiceRecord {
        invoice_id: invoice_id(answers.tax_year, issued_at),
        issued_at: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        tax_year: answers.tax_year,
        taxpayer_profile: TaxpayerProfile {
            bir_registered: answers.has_bir,
            online_seller: answers.online,
            physical_store: answers.has_store,
        },
        tax: InvoiceTax {
            kind: tax.key,
            label: tax.label.to_string(),
            rate: tax.rate.unwrap_or(Decimal::ZERO),
        },
        income: InvoiceIncome {
            gross: round2(answers.income_amount()),
            tax_due: assessment.tax_due(),
        },
        filing: assessment.checklist.clone(),
        due_dates: assessment
            .due_dates
            .iter()
            .map(|d| InvoiceDueDate {
                label: d.label.clone(),
                date: format_long_date(d.date),
            })
            .collect(),
        compliance: InvoiceCompliance {
            issues: assessment.issues.iter().map(|i| i.message()).collect(),
            eight_percent_declared: tax.key == CategoryKey::EightPercent,
        },
        app: AppInfo {
            name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
        },
    }
}

impl InvoiceRecord {
    pub fn filename(&self) -> String {
        format!("invoice-{}.json", self.invoice_id)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        write_artifact(dir, &self.filename(), self.to_json()?.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checklist::build_checklist;
    use crate::core::due_dates::generate_due_dates;
    use crate::core::format::format_php;
    use crate::core::rules::classify;
    use crate::core::TaxpayerAnswers;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap()
    }

    fn assessment(answers: TaxpayerAnswers) -> Assessment {
        Assessment::new(answers, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    fn eight_percent_seller() -> TaxpayerAnswers {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(1000000));
        answers.has_bir = true;
        answers.online = true;
        answers.use_eight_percent = Some(true);
        answers.tax_year = 2025;
        answers
    }

    #[test]
    fn invoice_fields_follow_the_assessment() {
        let invoice = build_invoice(&assessment(eight_percent_seller()), issued_at());

        assert_eq!(invoice.invoice_id, "INV-2025-1740817800000");
        assert_eq!(invoice.issued_at, "2025-03-01T08:30:00.000Z");
        assert_eq!(invoice.tax.kind, CategoryKey::EightPercent);
        assert_eq!(invoice.tax.rate, dec!(0.08));
        assert_eq!(invoice.income.tax_due, dec!(80000.00));
        assert!(invoice.compliance.eight_percent_declared);
        assert_eq!(invoice.due_dates[0].date, "May 15, 2025");
        assert_eq!(invoice.filename(), "invoice-INV-2025-1740817800000.json");
    }

    #[test]
    fn invoice_agrees_with_direct_calls() {
        let answers = eight_percent_seller();
        let json = build_invoice(&assessment(answers.clone()), issued_at())
            .to_json()
            .unwrap();
        let parsed: InvoiceRecord = serde_json::from_str(&json).unwrap();

        let tax = classify(&answers);
        assert_eq!(Some(parsed.tax.rate), tax.rate);
        assert_eq!(parsed.filing, build_checklist(tax));
        assert_eq!(
            parsed.due_dates.len(),
            generate_due_dates(tax, answers.tax_year).len()
        );
    }

    #[test]
    fn json_uses_wire_names() {
        let json = build_invoice(&assessment(eight_percent_seller()), issued_at())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tax"]["type"], "eightPercent");
        assert_eq!(value["taxpayerProfile"]["onlineSeller"], true);
        assert_eq!(value["income"]["gross"], 1000000.0);
        assert_eq!(value["income"]["taxDue"], 80000.0);
        assert_eq!(value["app"]["name"], APP_NAME);
        assert!(value["compliance"]["issues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn gross_matches_printed_amount() {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(123456.789));
        answers.has_bir = true;
        answers.has_store = true;
        answers.tax_year = 2025;
        let a = assessment(answers);
        let invoice = build_invoice(&a, issued_at());

        let value: serde_json::Value = serde_json::from_str(&invoice.to_json().unwrap()).unwrap();
        assert_eq!(value["income"]["gross"], 123456.79);
        assert_eq!(invoice.income.gross, dec!(123456.79));

        let doc = crate::export::pdf::compliance_document(&a, chrono::Local::now());
        let printed = format!("Declared Income: {}", format_php(invoice.income.gross));
        assert!(doc.section("pdfProfile").unwrap().body.contains(&printed));
        assert_eq!(printed, "Declared Income: ₱123,456.79");
    }

    #[test]
    fn unregistered_invoice_has_zero_rate() {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(50000));
        answers.tax_year = 2025;
        let invoice = build_invoice(&assessment(answers), issued_at());
        assert_eq!(invoice.tax.rate, Decimal::ZERO);
        assert_eq!(invoice.income.tax_due, Decimal::ZERO);
        assert!(invoice.due_dates.is_empty());
    }

    #[test]
    fn write_creates_named_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let invoice = build_invoice(&assessment(eight_percent_seller()), issued_at());
        let path = invoice.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(invoice.filename()));
        let written: InvoiceRecord =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, invoice);
    }
}

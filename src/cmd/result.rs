//! The result screen shown after classification.

use crate::core::format::{format_php, format_short_date};
use crate::core::{explain, Assessment, ROLLOUT_DISCLAIMER};

pub fn render(assessment: &Assessment, with_explanation: bool) -> String {
    let answers = &assessment.answers;
    let tax = assessment.category;
    let checklist = &assessment.checklist;
    let mut lines: Vec<String> = Vec::new();

    lines.push("Resulta".to_string());
    lines.push(String::new());
    lines.push(format!("Kita mo: {}", format_php(answers.income_amount())));
    lines.push(String::new());
    lines.push("🧾 Electronic Invoice Requirement".to_string());
    if assessment.requires_einvoice {
        lines.push("✅ Kailangan mag-electronic invoice".to_string());
        lines.push("Batay sa sagot mo, sakop ka ng RR 11-2025.".to_string());
    } else {
        lines.push("❌ Pwede pa sa manual resibo".to_string());
        lines.push("Micro taxpayer ka at hindi pa mandatory ang electronic invoice.".to_string());
    }
    lines.push(format!("ℹ️ {}", ROLLOUT_DISCLAIMER));
    lines.push(String::new());

    lines.push(format!("Tax type: {}", tax.label));
    lines.push(tax.notes.summary.to_string());
    lines.push(String::new());

    if !tax.notes.warnings.is_empty() {
        lines.push("⚠️ Paalala:".to_string());
        for warning in tax.notes.warnings {
            lines.push(format!("• {}", warning));
        }
        if let Some(switching) = tax.notes.switching {
            lines.push(String::new());
            lines.push("🔁 Switching Rules:".to_string());
            lines.push(switching.to_string());
        }
        lines.push(String::new());
    }

    if !assessment.issues.is_empty() {
        lines.push("🚨 Compliance Check:".to_string());
        for issue in &assessment.issues {
            lines.push(format!("• {}", issue));
        }
        lines.push(String::new());
    }

    lines.push("📅 Filing Checklist".to_string());
    for (title, items) in [
        ("Monthly", &checklist.monthly),
        ("Quarterly", &checklist.quarterly),
        ("Annual", &checklist.annual),
    ] {
        lines.push(String::new());
        lines.push(format!("{}:", title));
        if items.is_empty() {
            lines.push("- None".to_string());
        }
        for item in items.iter() {
            lines.push(format!("- {}", item));
        }
    }

    if !assessment.due_dates.is_empty() {
        lines.push(String::new());
        lines.push(format!("🗓️ Calendar ({})", answers.tax_year));
        for entry in &assessment.due_dates {
            lines.push(format!("- {} – {}", entry.label, format_short_date(entry.date)));
            if let Some(note) = &entry.note {
                lines.push(format!("  {}", note));
            }
        }
    }

    if with_explanation {
        lines.push(String::new());
        lines.push("Bakit ganito ang classification ko?".to_string());
        for line in explain(answers) {
            lines.push(format!("• {}", line));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxpayerAnswers;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn assessment(eight: bool) -> Assessment {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(1000000));
        answers.has_bir = true;
        answers.online = true;
        answers.use_eight_percent = Some(eight);
        answers.tax_year = 2025;
        Assessment::new(answers, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[test]
    fn eight_percent_result_shows_warnings_and_issue() {
        let text = render(&assessment(true), false);
        assert!(text.contains("Kita mo: ₱1,000,000.00"));
        assert!(text.contains("Tax type: 8% income tax option"));
        assert!(text.contains("⚠️ Paalala:"));
        assert!(text.contains("🔁 Switching Rules:"));
        // no declaration date on record and the checkpoint has passed
        assert!(text.contains("🚨 Compliance Check:"));
        assert!(text.contains("Income Tax (1701Q) – May 15"));
        assert!(!text.contains("Bakit"));
    }

    #[test]
    fn percentage_tax_result_has_no_warnings() {
        let text = render(&assessment(false), true);
        assert!(text.contains("Tax type: Percentage tax (3%)"));
        assert!(!text.contains("Paalala"));
        assert!(text.contains("- Record daily sales"));
        assert!(text.contains("Bakit ganito ang classification ko?"));
        assert!(text.contains("✅ Kailangan mag-electronic invoice"));
    }
}

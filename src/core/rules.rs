//! The rule table and the classifier that walks it.
//!
//! Rules are data, evaluated in table order. The first rule whose predicate
//! holds is the taxpayer's category, so the order of [`TAX_RULES`] is part of
//! the contract: the predicates overlap and precedence resolves them.

use super::answers::TaxpayerAnswers;
use super::einvoice::requires_electronic_invoice;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKey {
    EightPercent,
    PercentageTax,
    Vat,
    Unregistered,
}

impl CategoryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::EightPercent => "eightPercent",
            CategoryKey::PercentageTax => "percentageTax",
            CategoryKey::Vat => "vat",
            CategoryKey::Unregistered => "unregistered",
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub struct FormSet {
    pub quarterly: &'static [&'static str],
    pub annual: &'static [&'static str],
}

#[derive(Debug)]
pub struct CategoryNotes {
    pub summary: &'static str,
    pub warnings: &'static [&'static str],
    pub switching: Option<&'static str>,
}

/// A tax category and the predicate that selects it.
#[derive(Debug)]
pub struct TaxCategory {
    pub key: CategoryKey,
    pub label: &'static str,
    pub rate: Option<Decimal>,
    pub requires_declaration: bool,
    /// Forms this category replaces
    pub excludes: &'static [&'static str],
    pub eligible: fn(&TaxpayerAnswers) -> bool,
    pub forms: FormSet,
    pub notes: CategoryNotes,
}

impl TaxCategory {
    pub fn is_registered(&self) -> bool {
        self.key != CategoryKey::Unregistered
    }
}

/// Categories in priority order.
pub static TAX_RULES: [TaxCategory; 4] = [
    TaxCategory {
        key: CategoryKey::EightPercent,
        label: "8% income tax option",
        rate: Some(dec!(0.08)),
        requires_declaration: true,
        excludes: &["2551Q"],
        eligible: |a| a.has_bir && !a.over_3m() && a.elects_eight_percent(),
        forms: FormSet {
            quarterly: &["1701Q"],
            annual: &["1701"],
        },
        notes: CategoryNotes {
            summary: "Kapalit ng percentage tax at graduated rates.",
            warnings: &[
                "Dapat piliin sa BIR registration o ideklara sa unang 1701Q ng taon.",
                "Kapag hindi nadeclare sa oras, automatic na babalik sa graduated rates + 3% percentage tax.",
            ],
            switching: Some(
                "Kapag nakapili na ng tax option para sa taon, hindi na ito pwedeng palitan hanggang matapos ang taxable year.",
            ),
        },
    },
    TaxCategory {
        key: CategoryKey::PercentageTax,
        label: "Percentage tax (3%)",
        rate: Some(dec!(0.03)),
        requires_declaration: false,
        excludes: &[],
        eligible: |a| a.has_bir && !a.over_3m() && !a.elects_eight_percent(),
        forms: FormSet {
            quarterly: &["2551Q", "1701Q"],
            annual: &["1701"],
        },
        notes: CategoryNotes {
            summary: "Hindi pinili ang 8% option.",
            warnings: &[],
            switching: None,
        },
    },
    TaxCategory {
        key: CategoryKey::Vat,
        label: "VAT taxpayer",
        rate: Some(dec!(0.12)),
        requires_declaration: false,
        excludes: &["2551Q"],
        eligible: |a| a.has_bir && a.over_3m(),
        forms: FormSet {
            quarterly: &["2550Q", "1701Q"],
            annual: &["1701", "AFS"],
        },
        notes: CategoryNotes {
            summary: "Lampas ₱3,000,000 ang kita.",
            warnings: &[],
            switching: None,
        },
    },
    TaxCategory {
        key: CategoryKey::Unregistered,
        label: "Hindi pa rehistrado",
        rate: None,
        requires_declaration: false,
        excludes: &[],
        eligible: |a| !a.has_bir,
        forms: FormSet {
            quarterly: &[],
            annual: &[],
        },
        notes: CategoryNotes {
            summary: "Kailangan mo munang mag-register sa BIR bago mag-file.",
            warnings: &[],
            switching: None,
        },
    },
];

/// Look up a category by key.
pub fn category(key: CategoryKey) -> &'static TaxCategory {
    match key {
        CategoryKey::EightPercent => &TAX_RULES[0],
        CategoryKey::PercentageTax => &TAX_RULES[1],
        CategoryKey::Vat => &TAX_RULES[2],
        CategoryKey::Unregistered => &TAX_RULES[3],
    }
}

/// Select the taxpayer's category: the first rule in priority order that matches.
pub fn classify(answers: &TaxpayerAnswers) -> &'static TaxCategory {
    let selected = TAX_RULES
        .iter()
        .find(|rule| (rule.eligible)(answers))
        .unwrap_or_else(|| category(CategoryKey::Unregistered));
    log::debug!(
        "classified as {} (bir: {}, over3M: {}, online: {}, store: {}, 8%: {:?})",
        selected.key,
        answers.has_bir,
        answers.over_3m(),
        answers.online,
        answers.has_store,
        answers.use_eight_percent
    );
    selected
}

/// Bullet lines explaining why the taxpayer landed in their category.
pub fn explain(answers: &TaxpayerAnswers) -> Vec<String> {
    let mut lines = Vec::new();

    if !answers.has_bir {
        lines.push("Hindi ka pa rehistrado sa BIR.".to_string());
        lines.push("Kailangan muna ang BIR registration bago mag-apply ang tax rules.".to_string());
        return lines;
    }

    if answers.over_3m() {
        lines.push("Lampas ₱3,000,000 ang declared income mo.".to_string());
        lines.push("Ayon sa batas, automatic kang classified bilang VAT taxpayer.".to_string());
    } else if answers.elects_eight_percent() {
        lines.push("BIR registered ka at hindi lampas ₱3,000,000 ang kita.".to_string());
        lines.push("Pinili mo ang 8% income tax option.".to_string());
    } else {
        lines.push("BIR registered ka at hindi lampas ₱3,000,000 ang kita.".to_string());
        lines.push(
            "Hindi mo pinili ang 8% option, kaya percentage tax (3%) ang applicable.".to_string(),
        );
    }

    if requires_electronic_invoice(answers) {
        if answers.over_3m() {
            lines.push(
                "VAT taxpayers ay sakop ng electronic invoicing sa ilalim ng RR 11-2025.".to_string(),
            );
        }
        if answers.online {
            lines.push("Online sellers ay sakop ng electronic invoicing.".to_string());
        }
        if answers.uses_pos {
            lines.push("Gumagamit ka ng POS/CAS na sakop ng electronic invoicing.".to_string());
        }
    } else {
        lines.push(
            "Micro taxpayer ka at hindi ka pa sakop ng mandatory electronic invoicing.".to_string(),
        );
    }

    lines.push("Classification lamang ito. Ang transmission ay subject sa BIR rollout.".to_string());
    lines
}

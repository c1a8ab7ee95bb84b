use super::rules::{CategoryKey, TaxCategory};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Recurring obligations grouped by cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilingChecklist {
    pub monthly: Vec<String>,
    pub quarterly: Vec<String>,
    pub annual: Vec<String>,
}

pub fn build_checklist(category: &TaxCategory) -> FilingChecklist {
    let monthly = match category.key {
        CategoryKey::EightPercent => vec!["Record income".to_string()],
        CategoryKey::Vat => vec!["Record sales & purchases".to_string()],
        CategoryKey::PercentageTax => vec!["Record daily sales".to_string()],
        CategoryKey::Unregistered => Vec::new(),
    };

    // a category never lists a form it replaces
    let forms = |codes: &[&'static str]| -> Vec<String> {
        codes
            .iter()
            .filter(|code| !category.excludes.iter().any(|excluded| excluded == *code))
            .map(|code| code.to_string())
            .collect()
    };

    FilingChecklist {
        monthly,
        quarterly: forms(category.forms.quarterly),
        annual: forms(category.forms.annual),
    }
}

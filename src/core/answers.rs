use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Gross annual income above which a taxpayer is VAT-registered.
pub const VAT_THRESHOLD: Decimal = dec!(3000000);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Pakilagay ang tamang halaga. ('{0}' is not a number)")]
    NotANumber(String),
    #[error("Pakilagay ang tamang halaga. (income must be greater than zero)")]
    NotPositive,
}

/// Which calendar reminders to attach to exported due dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    /// Remind 7 days before the due date
    pub before7: bool,
    /// Remind 3 days before the due date
    pub before3: bool,
    /// Remind on the due date itself
    pub on_due: bool,
}

impl Default for Reminders {
    fn default() -> Self {
        Reminders {
            before7: true,
            before3: true,
            on_due: true,
        }
    }
}

/// Everything the taxpayer told us. Drives classification and every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxpayerAnswers {
    /// Registered with the BIR
    #[serde(rename = "hasBIR")]
    pub has_bir: bool,
    /// Earns or sells online
    pub online: bool,
    /// Operates a physical store
    pub has_store: bool,
    /// Uses a POS or computerized accounting system
    #[serde(rename = "usesPOS")]
    pub uses_pos: bool,
    /// Estimated gross annual income in PHP
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    income_amount: Decimal,
    /// Derived: income is above the VAT threshold
    #[serde(rename = "over3M")]
    over_3m: bool,
    /// Elected the 8% income tax option (unset until asked)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_eight_percent: Option<bool>,
    /// Date the 8% option was declared to the BIR, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eight_percent_declared_on: Option<NaiveDate>,
    pub tax_year: i32,
    pub reminders: Reminders,
}

impl Default for TaxpayerAnswers {
    fn default() -> Self {
        TaxpayerAnswers {
            has_bir: false,
            online: false,
            has_store: false,
            uses_pos: false,
            income_amount: Decimal::ZERO,
            over_3m: false,
            use_eight_percent: None,
            eight_percent_declared_on: None,
            tax_year: Local::now().year(),
            reminders: Reminders::default(),
        }
    }
}

impl TaxpayerAnswers {
    /// Fresh answers for `tax_year`: unregistered, no income, 8% not yet asked.
    pub fn new(tax_year: i32, reminders: Reminders) -> Self {
        TaxpayerAnswers {
            tax_year,
            reminders,
            ..Default::default()
        }
    }

    pub fn with_income(mut self, amount: Decimal) -> Self {
        self.set_income(amount);
        self
    }

    pub fn income_amount(&self) -> Decimal {
        self.income_amount
    }

    pub fn over_3m(&self) -> bool {
        self.over_3m
    }

    /// Set the declared income, keeping the VAT threshold flag in sync.
    pub fn set_income(&mut self, amount: Decimal) {
        self.income_amount = amount;
        self.over_3m = amount > VAT_THRESHOLD;
    }

    /// Whether the 8% option question applies to this taxpayer at all.
    pub fn eight_percent_applicable(&self) -> bool {
        self.has_bir && !self.over_3m && (self.online || self.has_store)
    }

    /// The 8% election, read only where it is meaningful.
    pub fn elects_eight_percent(&self) -> bool {
        self.eight_percent_applicable() && self.use_eight_percent == Some(true)
    }

    /// Re-derive `over3M` after deserializing, since files may carry a stale flag.
    pub fn normalized(mut self) -> Self {
        self.set_income(self.income_amount);
        self
    }

    /// Registered taxpayers must have a positive income on record.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.has_bir && self.income_amount <= Decimal::ZERO {
            return Err(InputError::NotPositive);
        }
        Ok(())
    }
}

/// Parse the income typed into the wizard. Rejects non-numeric and non-positive input.
pub fn parse_income(input: &str) -> Result<Decimal, InputError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₱')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let value = Decimal::from_str(cleaned.trim())
        .map_err(|_| InputError::NotANumber(input.trim().to_string()))?;
    if value <= Decimal::ZERO {
        return Err(InputError::NotPositive);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_income_derives_threshold_flag() {
        let mut answers = TaxpayerAnswers::default();
        answers.set_income(dec!(3500000));
        assert!(answers.over_3m());

        answers.set_income(dec!(1000000));
        assert!(!answers.over_3m());
    }

    #[test]
    fn new_answers_start_unregistered_for_the_year() {
        let reminders = Reminders {
            before7: false,
            ..Reminders::default()
        };
        let answers = TaxpayerAnswers::new(2024, reminders);
        assert_eq!(answers.tax_year, 2024);
        assert_eq!(answers.reminders, reminders);
        assert!(!answers.has_bir);
        assert_eq!(answers.income_amount(), Decimal::ZERO);
        assert!(!answers.over_3m());

        let answers = answers.with_income(dec!(3500000));
        assert!(answers.over_3m());
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut answers = TaxpayerAnswers::default();
        answers.set_income(dec!(3000000));
        assert!(!answers.over_3m());
        answers.set_income(dec!(3000000.01));
        assert!(answers.over_3m());
    }

    #[test]
    fn eight_percent_only_meaningful_with_a_channel() {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(500000));
        answers.has_bir = true;
        answers.use_eight_percent = Some(true);
        assert!(!answers.elects_eight_percent());

        answers.has_store = true;
        assert!(answers.elects_eight_percent());
    }

    #[test]
    fn parse_income_accepts_grouped_amounts() {
        assert_eq!(parse_income("1,250,000"), Ok(dec!(1250000)));
        assert_eq!(parse_income(" ₱ 750000.50 "), Ok(dec!(750000.50)));
    }

    #[test]
    fn parse_income_rejects_bad_input() {
        assert_eq!(
            parse_income("abc"),
            Err(InputError::NotANumber("abc".to_string()))
        );
        assert_eq!(parse_income("0"), Err(InputError::NotPositive));
        assert_eq!(parse_income("-5"), Err(InputError::NotPositive));
        assert!(matches!(parse_income(""), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn registered_income_must_be_positive() {
        let mut answers = TaxpayerAnswers::new(2025, Reminders::default());
        assert_eq!(answers.validate(), Ok(()));

        answers.has_bir = true;
        assert_eq!(answers.validate(), Err(InputError::NotPositive));
        answers.set_income(dec!(-500000));
        assert_eq!(answers.validate(), Err(InputError::NotPositive));
        answers.set_income(dec!(500000));
        assert_eq!(answers.validate(), Ok(()));
    }

    #[test]
    fn deserialize_recomputes_threshold() {
        let json = r#"{
            "hasBIR": true,
            "online": false,
            "hasStore": true,
            "incomeAmount": 4000000,
            "over3M": false,
            "taxYear": 2025
        }"#;
        let answers: TaxpayerAnswers = serde_json::from_str(json).unwrap();
        let answers = answers.normalized();
        assert!(answers.over_3m());
        assert_eq!(answers.reminders, Reminders::default());
        assert!(!answers.uses_pos);
    }
}

pub mod answers;
pub mod assessment;
pub mod checklist;
pub mod compliance;
pub mod due_dates;
pub mod einvoice;
pub mod format;
pub mod rules;

// Flat public surface for domain types and functions.
pub use answers::{parse_income, InputError, Reminders, TaxpayerAnswers};
pub use assessment::{Assessment, ROLLOUT_DISCLAIMER};
pub use checklist::FilingChecklist;
pub use compliance::ComplianceIssue;
pub use due_dates::DueDateEntry;
pub use rules::{category, explain, CategoryKey};

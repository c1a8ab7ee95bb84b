use super::answers::TaxpayerAnswers;
use super::due_dates::declaration_checkpoint;
use super::rules::classify;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Compliance problems found in a classified taxpayer's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum ComplianceIssue {
    /// The checkpoint passed with no recorded 8% declaration.
    EightPercentNotDeclared { checkpoint: NaiveDate },
    /// The 8% option was declared after the checkpoint.
    EightPercentDeclaredLate {
        checkpoint: NaiveDate,
        declared_on: NaiveDate,
    },
}

impl ComplianceIssue {
    pub fn message(&self) -> String {
        match self {
            ComplianceIssue::EightPercentNotDeclared { checkpoint } => format!(
                "Hindi nadeclare ang 8% option sa tamang oras (deadline {}).",
                checkpoint.format("%Y-%m-%d")
            ),
            ComplianceIssue::EightPercentDeclaredLate {
                checkpoint,
                declared_on,
            } => format!(
                "Hindi nadeclare ang 8% option sa tamang oras: {} ay lampas sa {}.",
                declared_on.format("%Y-%m-%d"),
                checkpoint.format("%Y-%m-%d")
            ),
        }
    }
}

impl std::fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Check the classified answers against filing deadlines as of `as_of`.
///
/// Categories that require a declaration must have it on record by the first
/// quarterly income tax return of the tax year.
pub fn check_compliance(answers: &TaxpayerAnswers, as_of: NaiveDate) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();
    let tax = classify(answers);

    if !tax.requires_declaration {
        return issues;
    }
    let Some(checkpoint) = declaration_checkpoint(answers.tax_year) else {
        return issues;
    };

    match answers.eight_percent_declared_on {
        Some(declared_on) if declared_on > checkpoint => {
            issues.push(ComplianceIssue::EightPercentDeclaredLate {
                checkpoint,
                declared_on,
            });
        }
        Some(_) => {}
        None if as_of > checkpoint => {
            issues.push(ComplianceIssue::EightPercentNotDeclared { checkpoint });
        }
        None => {}
    }

    issues
}

//! The five-step questionnaire as an explicit state machine.
//!
//! The wizard owns the answer record; callers read it through `answers()` and
//! drive it with `answer`, `save_income`, `back` and `reset`.

use crate::core::{parse_income, InputError, Reminders, TaxpayerAnswers};

pub const TOTAL_STEPS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Registered,
    Online,
    Store,
    Income,
    EightPercent,
    Done,
}

impl Step {
    pub fn number(&self) -> Option<u8> {
        match self {
            Step::Registered => Some(1),
            Step::Online => Some(2),
            Step::Store => Some(3),
            Step::Income => Some(4),
            Step::EightPercent => Some(5),
            Step::Done => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    YesNo,
    Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub progress: String,
    pub question: &'static str,
    pub kind: PromptKind,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("step {0:?} does not take this kind of answer")]
    WrongStep(Step),
}

#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    answers: TaxpayerAnswers,
    tax_year: i32,
    reminders: Reminders,
}

impl Wizard {
    pub fn new(tax_year: i32, reminders: Reminders) -> Self {
        Wizard {
            step: Step::Registered,
            answers: TaxpayerAnswers::new(tax_year, reminders),
            tax_year,
            reminders,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &TaxpayerAnswers {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut TaxpayerAnswers {
        &mut self.answers
    }

    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        self.step == Step::Done
    }

    pub fn prompt(&self) -> Option<Prompt> {
        let (question, kind) = match self.step {
            Step::Registered => ("May BIR registration ka na ba?", PromptKind::YesNo),
            Step::Online => ("Online ka ba kumikita o nagbebenta?", PromptKind::YesNo),
            Step::Store => ("May physical store ka ba?", PromptKind::YesNo),
            Step::Income => (
                "Magkano ang tinatayang kita mo sa isang taon? (₱)",
                PromptKind::Amount,
            ),
            Step::EightPercent => ("Pinili mo ba ang 8% income tax option?", PromptKind::YesNo),
            Step::Done => return None,
        };
        let number = self.step.number()?;
        Some(Prompt {
            progress: format!("Step {} of {}", number, TOTAL_STEPS),
            question,
            kind,
        })
    }

    /// Record a yes/no answer for the current step and advance.
    pub fn answer(&mut self, value: bool) -> Result<Step, WizardError> {
        self.step = match self.step {
            Step::Registered => {
                self.answers.has_bir = value;
                Step::Online
            }
            Step::Online => {
                self.answers.online = value;
                Step::Store
            }
            Step::Store => {
                self.answers.has_store = value;
                Step::Income
            }
            Step::EightPercent => {
                self.answers.use_eight_percent = Some(value);
                Step::Done
            }
            step @ (Step::Income | Step::Done) => return Err(WizardError::WrongStep(step)),
        };
        Ok(self.step)
    }

    /// Record the income typed by the user. Invalid input leaves the wizard untouched.
    pub fn save_income(&mut self, input: &str) -> Result<Step, WizardError> {
        if self.step != Step::Income {
            return Err(WizardError::WrongStep(self.step));
        }
        let amount = parse_income(input)?;
        self.answers.set_income(amount);

        self.step = if self.answers.eight_percent_applicable() {
            Step::EightPercent
        } else {
            self.answers.use_eight_percent = None;
            Step::Done
        };
        Ok(self.step)
    }

    /// Go back one question. Answers already given are kept.
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::Registered | Step::Online => Step::Registered,
            Step::Store => Step::Online,
            Step::Income => Step::Store,
            Step::EightPercent => Step::Income,
            Step::Done if self.answers.eight_percent_applicable() => Step::EightPercent,
            Step::Done => Step::Income,
        };
        self.step
    }

    /// Start over with a fresh answer record.
    pub fn reset(&mut self) {
        self.step = Step::Registered;
        self.answers = TaxpayerAnswers::new(self.tax_year, self.reminders);
    }
}

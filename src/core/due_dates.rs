use super::rules::{CategoryKey, TaxCategory};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Note attached to the declaration checkpoint for 8% filers.
pub const DECLARATION_CHECKPOINT_NOTE: &str =
    "⚠️ Declaration point for 8% option. Missing this causes fallback to graduated rates + percentage tax.";

/// Filing schedule for one form: which months, which day.
#[derive(Debug, Clone, Copy)]
pub struct FilingSchedule {
    pub form: &'static str,
    pub months: &'static [u32],
    pub day: u32,
}

pub const VAT_SCHEDULE: FilingSchedule = FilingSchedule {
    form: "2550Q",
    months: &[4, 7, 10, 1],
    day: 25,
};

pub const PERCENTAGE_SCHEDULE: FilingSchedule = FilingSchedule {
    form: "2551Q",
    months: &[4, 7, 10, 1],
    day: 25,
};

pub const QUARTERLY_INCOME_SCHEDULE: FilingSchedule = FilingSchedule {
    form: "1701Q",
    months: &[5, 8, 11],
    day: 15,
};

pub const ANNUAL_INCOME_SCHEDULE: FilingSchedule = FilingSchedule {
    form: "1701",
    months: &[4],
    day: 15,
};

/// First quarterly income tax return; the 8% option must be declared by then.
const CHECKPOINT_MONTH: u32 = 5;

/// A single labeled filing deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DueDateEntry {
    pub label: String,
    pub form: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Date of the declaration checkpoint (first 1701Q) for a tax year.
pub fn declaration_checkpoint(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, CHECKPOINT_MONTH, QUARTERLY_INCOME_SCHEDULE.day)
}

/// Expand a category into its filing deadlines for `year`.
///
/// Business-tax returns come first, then quarterly income tax, then the
/// annual return. The January business-tax return covers the fourth quarter
/// and is dated in `year + 1`.
pub fn generate_due_dates(category: &TaxCategory, year: i32) -> Vec<DueDateEntry> {
    let mut dates = Vec::new();

    let business = match category.key {
        CategoryKey::Unregistered => return dates,
        CategoryKey::Vat => Some(("VAT", VAT_SCHEDULE)),
        CategoryKey::PercentageTax => Some(("Percentage Tax", PERCENTAGE_SCHEDULE)),
        CategoryKey::EightPercent => None,
    };

    if let Some((name, schedule)) = business {
        for &month in schedule.months {
            // January filing covers Q4 of the tax year
            let filing_year = if month == 1 { year.checked_add(1) } else { Some(year) };
            match filing_year {
                Some(filing_year) => push_entry(&mut dates, name, &schedule, filing_year, month, None),
                None => log::warn!("skipping January {} filing after year {}", schedule.form, year),
            }
        }
    }

    for &month in QUARTERLY_INCOME_SCHEDULE.months {
        let note = (category.key == CategoryKey::EightPercent && month == CHECKPOINT_MONTH)
            .then(|| DECLARATION_CHECKPOINT_NOTE.to_string());
        push_entry(
            &mut dates,
            "Income Tax",
            &QUARTERLY_INCOME_SCHEDULE,
            year,
            month,
            note,
        );
    }

    for &month in ANNUAL_INCOME_SCHEDULE.months {
        push_entry(
            &mut dates,
            "Annual Income Tax",
            &ANNUAL_INCOME_SCHEDULE,
            year,
            month,
            None,
        );
    }

    log::debug!("generated {} due dates for {} {}", dates.len(), category.key, year);
    dates
}

fn push_entry(
    dates: &mut Vec<DueDateEntry>,
    name: &str,
    schedule: &FilingSchedule,
    year: i32,
    month: u32,
    note: Option<String>,
) {
    match NaiveDate::from_ymd_opt(year, month, schedule.day) {
        Some(date) => dates.push(DueDateEntry {
            label: format!("{} ({})", name, schedule.form),
            form: schedule.form.to_string(),
            date,
            note,
        }),
        None => log::warn!("skipping out-of-range due date {}-{}-{}", year, month, schedule.day),
    }
}

//! iCalendar export of the due-date schedule.

use super::{write_artifact, ExportError, APP_NAME};
use crate::core::{Assessment, DueDateEntry, Reminders};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const MAX_LINE_OCTETS: usize = 75;

pub fn calendar_filename(tax_year: i32) -> String {
    format!("pinoy-tax-calendar-{}.ics", tax_year)
}

/// Render one all-day event per due date.
///
/// Refuses unregistered taxpayers and empty schedules so no calendar file is
/// ever produced for them.
pub fn render_calendar(assessment: &Assessment, stamp: DateTime<Utc>) -> Result<String, ExportError> {
    if !assessment.answers.has_bir || !assessment.category.is_registered() {
        return Err(ExportError::Unregistered);
    }
    if assessment.due_dates.is_empty() {
        return Err(ExportError::NoDueDates);
    }

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:-//{}//EN", APP_NAME),
        "CALSCALE:GREGORIAN".to_string(),
    ];
    for entry in &assessment.due_dates {
        push_event(&mut lines, entry, &assessment.answers.reminders, stamp);
    }
    lines.push("END:VCALENDAR".to_string());

    let mut ics = String::new();
    for line in lines {
        ics.push_str(&fold(&line));
        ics.push_str("\r\n");
    }
    Ok(ics)
}

pub fn write_calendar(assessment: &Assessment, stamp: DateTime<Utc>, dir: &Path) -> Result<PathBuf, ExportError> {
    let ics = render_calendar(assessment, stamp)?;
    write_artifact(dir, &calendar_filename(assessment.answers.tax_year), ics.as_bytes())
}

fn push_event(lines: &mut Vec<String>, entry: &DueDateEntry, reminders: &Reminders, stamp: DateTime<Utc>) {
    let date = entry.date.format("%Y%m%d").to_string();

    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}@pinoytax", event_uid(entry)));
    lines.push(format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")));
    lines.push(format!("SUMMARY:{}", escape_text(&entry.label)));
    lines.push(format!("DTSTART;VALUE=DATE:{}", date));
    lines.push(format!("DTEND;VALUE=DATE:{}", date));
    if let Some(note) = &entry.note {
        lines.push(format!("DESCRIPTION:{}", escape_text(note)));
    }

    let triggers = [
        (reminders.before7, "-P7D"),
        (reminders.before3, "-P3D"),
        (reminders.on_due, "PT0S"),
    ];
    for (_, trigger) in triggers.iter().filter(|(enabled, _)| *enabled) {
        lines.push("BEGIN:VALARM".to_string());
        lines.push("ACTION:DISPLAY".to_string());
        lines.push(format!("DESCRIPTION:{}", escape_text(&entry.label)));
        lines.push(format!("TRIGGER:{}", trigger));
        lines.push("END:VALARM".to_string());
    }

    lines.push("END:VEVENT".to_string());
}

/// Stable per-deadline identifier so re-imports update instead of duplicating.
fn event_uid(entry: &DueDateEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.label.as_bytes());
    hasher.update(entry.date.format("%Y-%m-%d").to_string().as_bytes());
    hex::encode(&hasher.finalize()[..12])
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence.
fn fold(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        // continuation lines start with a space, which counts toward the limit
        if width + ch.len_utf8() > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            width = 1;
        }
        folded.push(ch);
        width += ch.len_utf8();
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxpayerAnswers;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn assessment(answers: TaxpayerAnswers) -> Assessment {
        Assessment::new(answers, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    fn registered(online: bool, eight: bool, income: rust_decimal::Decimal) -> TaxpayerAnswers {
        let mut answers = TaxpayerAnswers::default().with_income(income);
        answers.has_bir = true;
        answers.online = online;
        answers.use_eight_percent = Some(eight);
        answers.tax_year = 2025;
        answers
    }

    #[test]
    fn unregistered_is_rejected() {
        let err = render_calendar(&assessment(TaxpayerAnswers::default()), stamp()).unwrap_err();
        assert!(matches!(err, ExportError::Unregistered));
        assert!(err.to_string().contains("mag-register sa BIR"));
    }

    #[test]
    fn no_file_for_unregistered() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = write_calendar(&assessment(TaxpayerAnswers::default()), stamp(), dir.path());
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let mut a = assessment(registered(false, false, dec!(500000)));
        a.due_dates.clear();
        assert!(matches!(render_calendar(&a, stamp()), Err(ExportError::NoDueDates)));
    }

    #[test]
    fn one_all_day_event_per_due_date() {
        let a = assessment(registered(false, false, dec!(4000000)));
        let ics = render_calendar(&a, stamp()).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Pinoy Tax Assistant//EN\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), a.due_dates.len());
        assert!(ics.contains("SUMMARY:VAT (2550Q)\r\nDTSTART;VALUE=DATE:20250425\r\nDTEND;VALUE=DATE:20250425"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20260125"));
    }

    #[test]
    fn alarms_follow_reminder_settings() {
        let mut answers = registered(true, true, dec!(800000));
        answers.reminders = Reminders {
            before7: true,
            before3: false,
            on_due: false,
        };
        let a = assessment(answers);
        let ics = render_calendar(&a, stamp()).unwrap();
        assert_eq!(ics.matches("TRIGGER:-P7D").count(), a.due_dates.len());
        assert!(!ics.contains("TRIGGER:-P3D"));
        assert!(!ics.contains("TRIGGER:PT0S"));
    }

    #[test]
    fn parses_back_with_checkpoint_description() {
        let a = assessment(registered(true, true, dec!(800000)));
        let ics = render_calendar(&a, stamp()).unwrap();

        let mut reader = ical::IcalParser::new(ics.as_bytes());
        let calendar = reader.next().unwrap().unwrap();
        assert_eq!(calendar.events.len(), 4);

        let first = &calendar.events[0];
        let prop = |name: &str| {
            first
                .properties
                .iter()
                .find(|p| p.name == name)
                .and_then(|p| p.value.clone())
        };
        assert_eq!(prop("SUMMARY").as_deref(), Some("Income Tax (1701Q)"));
        assert_eq!(prop("DTSTART").as_deref(), Some("20250515"));
        assert!(prop("DESCRIPTION").unwrap().contains("Declaration point for 8% option"));
        assert_eq!(first.alarms.len(), 3);
    }

    #[test]
    fn uids_are_unique_and_stable() {
        let a = assessment(registered(false, false, dec!(4000000)));
        let uids: std::collections::HashSet<_> = a.due_dates.iter().map(event_uid).collect();
        assert_eq!(uids.len(), a.due_dates.len());
        assert_eq!(event_uid(&a.due_dates[0]), event_uid(&a.due_dates[0].clone()));
    }

    #[test]
    fn long_lines_are_folded() {
        let line = format!("DESCRIPTION:{}", "⚠️ x".repeat(40));
        let folded = fold(&line);
        for part in folded.split("\r\n") {
            assert!(part.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn calendar_filename_uses_tax_year() {
        assert_eq!(calendar_filename(2025), "pinoy-tax-calendar-2025.ics");
    }
}

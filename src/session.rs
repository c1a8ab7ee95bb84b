//! The persisted `taxAppResult` snapshot.
//!
//! Written whenever a result is computed and deleted on reset. The live flow
//! never reads it back; `load` exists for inspection only.

use crate::core::{Assessment, CategoryKey, DueDateEntry, FilingChecklist, TaxpayerAnswers};
use crate::export::APP_VERSION;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SESSION_KEY: &str = "taxAppResult";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub answers: TaxpayerAnswers,
    pub tax: CategoryKey,
    pub checklist: FilingChecklist,
    pub due_dates: Vec<DueDateEntry>,
    /// ISO-8601 generation time
    pub generated_at: String,
    pub app_version: String,
}

impl PersistedSession {
    pub fn from_assessment(assessment: &Assessment, generated_at: DateTime<Utc>) -> Self {
        PersistedSession {
            answers: assessment.answers.clone(),
            tax: assessment.category.key,
            checklist: assessment.checklist.clone(),
            due_dates: assessment.due_dates.clone(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            app_version: APP_VERSION.to_string(),
        }
    }
}

/// A single named slot on disk: `<dir>/taxAppResult.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: &Path) -> Self {
        SessionStore {
            path: dir.join(format!("{}.json", SESSION_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with the latest result.
    pub fn save(&self, assessment: &Assessment, generated_at: DateTime<Utc>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create session directory {}", parent.display())
            })?;
        }
        let session = PersistedSession::from_assessment(assessment, generated_at);
        let json = serde_json::to_string_pretty(&session)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Unable to write session {}", self.path.display()))?;
        log::debug!("saved session to {}", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> anyhow::Result<Option<PersistedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read session {}", self.path.display()))?;
        let session = serde_json::from_str(&json)
            .with_context(|| format!("Session file {} is not valid", self.path.display()))?;
        Ok(Some(session))
    }

    /// Delete the slot. Succeeds when there is nothing to delete.
    pub fn clear(&self) -> anyhow::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("removed session {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Unable to remove session {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn assessment() -> Assessment {
        let mut answers = TaxpayerAnswers::default().with_income(dec!(900000));
        answers.has_bir = true;
        answers.online = true;
        answers.use_eight_percent = Some(true);
        answers.tax_year = 2025;
        Assessment::new(answers, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
    }

    #[test]
    fn save_then_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let stamp = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();

        store.save(&assessment(), stamp).unwrap();
        let session = store.load().unwrap().unwrap();
        assert_eq!(session.tax, CategoryKey::EightPercent);
        assert_eq!(session.generated_at, "2025-02-01T12:00:00.000Z");
        assert_eq!(session.app_version, APP_VERSION);
        assert_eq!(session.due_dates.len(), 4);

        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn session_document_keys() {
        let stamp = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        let session = PersistedSession::from_assessment(&assessment(), stamp);
        let value = serde_json::to_value(&session).unwrap();
        for key in ["answers", "tax", "checklist", "dueDates", "generatedAt", "appVersion"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["tax"], "eightPercent");
        assert_eq!(value["answers"]["hasBIR"], true);
    }

    #[test]
    fn save_overwrites_previous_result() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let stamp = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        store.save(&assessment(), stamp).unwrap();

        let unregistered = Assessment::new(
            TaxpayerAnswers::default(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        store.save(&unregistered, stamp).unwrap();
        assert_eq!(store.load().unwrap().unwrap().tax, CategoryKey::Unregistered);
    }
}

//! Recompute-and-upsert persistence for engine output.
//!
//! Rows are keyed by (assessment id, control id). Re-running an unchanged assessment
//! leaves every row, timestamp included, as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::controls::ResolvedControl;
use super::domain::{Designation, RiskDriver, RiskResult, RiskTier};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentKey {
    pub assessment_id: String,
    pub control_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredControl {
    pub control_id: String,
    pub name: String,
    pub designation: Designation,
    pub reasoning: Vec<String>,
    pub catalogued: bool,
    pub ai_generated: bool,
    pub recorded_at: DateTime<Utc>,
}

impl StoredControl {
    fn from_resolved(control: &ResolvedControl, recorded_at: DateTime<Utc>) -> Self {
        Self {
            control_id: control.control_id.clone(),
            name: control.name.clone(),
            designation: control.designation,
            reasoning: control.reasoning.clone(),
            catalogued: control.catalogued,
            ai_generated: control.ai_generated,
            recorded_at,
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        self.control_id == other.control_id
            && self.name == other.name
            && self.designation == other.designation
            && self.reasoning == other.reasoning
            && self.catalogued == other.catalogued
            && self.ai_generated == other.ai_generated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRisk {
    pub score: u8,
    pub tier: RiskTier,
    pub drivers: Vec<RiskDriver>,
    pub recorded_at: DateTime<Utc>,
}

impl StoredRisk {
    fn same_content(&self, result: &RiskResult) -> bool {
        self.score == result.score && self.tier == result.tier && self.drivers == result.drivers
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait AssessmentStore: Send + Sync {
    fn controls(&self, assessment_id: &str) -> Result<Vec<StoredControl>, StoreError>;
    fn upsert_control(&self, assessment_id: &str, control: StoredControl) -> Result<(), StoreError>;
    fn remove_control(&self, key: &AssessmentKey) -> Result<(), StoreError>;
    fn risk(&self, assessment_id: &str) -> Result<Option<StoredRisk>, StoreError>;
    fn put_risk(&self, assessment_id: &str, risk: StoredRisk) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("assessment store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct AssessmentRows {
    risk: Option<StoredRisk>,
    controls: Vec<StoredControl>,
}

/// In-process store used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryAssessmentStore {
    rows: Mutex<HashMap<String, AssessmentRows>>,
}

impl MemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rows<T>(
        &self,
        apply: impl FnOnce(&mut HashMap<String, AssessmentRows>) -> T,
    ) -> Result<T, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(apply(&mut rows))
    }
}

impl AssessmentStore for MemoryAssessmentStore {
    fn controls(&self, assessment_id: &str) -> Result<Vec<StoredControl>, StoreError> {
        self.with_rows(|rows| {
            rows.get(assessment_id)
                .map(|entry| entry.controls.clone())
                .unwrap_or_default()
        })
    }

    fn upsert_control(&self, assessment_id: &str, control: StoredControl) -> Result<(), StoreError> {
        self.with_rows(|rows| {
            let controls = &mut rows.entry(assessment_id.to_string()).or_default().controls;
            match controls
                .iter_mut()
                .find(|existing| existing.control_id == control.control_id)
            {
                Some(existing) => *existing = control,
                None => controls.push(control),
            }
        })
    }

    fn remove_control(&self, key: &AssessmentKey) -> Result<(), StoreError> {
        self.with_rows(|rows| {
            if let Some(entry) = rows.get_mut(&key.assessment_id) {
                entry
                    .controls
                    .retain(|control| control.control_id != key.control_id);
            }
        })
    }

    fn risk(&self, assessment_id: &str) -> Result<Option<StoredRisk>, StoreError> {
        self.with_rows(|rows| rows.get(assessment_id).and_then(|entry| entry.risk.clone()))
    }

    fn put_risk(&self, assessment_id: &str, risk: StoredRisk) -> Result<(), StoreError> {
        self.with_rows(|rows| {
            rows.entry(assessment_id.to_string()).or_default().risk = Some(risk);
        })
    }
}

/// What a persist pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub risk_changed: bool,
}

impl PersistSummary {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.removed == 0 && !self.risk_changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Writes engine output through an [`AssessmentStore`] with upsert-by-key semantics.
pub struct AssessmentService<S> {
    store: Arc<S>,
}

impl<S> AssessmentService<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn persist(
        &self,
        assessment_id: &str,
        risk: &RiskResult,
        controls: &[ResolvedControl],
    ) -> Result<PersistSummary, StoreError> {
        self.persist_at(assessment_id, risk, controls, Utc::now())
    }

    /// Persist with an explicit timestamp for changed rows.
    pub fn persist_at(
        &self,
        assessment_id: &str,
        risk: &RiskResult,
        controls: &[ResolvedControl],
        now: DateTime<Utc>,
    ) -> Result<PersistSummary, StoreError> {
        let mut summary = PersistSummary::default();
        let existing = self.store.controls(assessment_id)?;

        for control in controls {
            let incoming = StoredControl::from_resolved(control, now);
            let previous = existing
                .iter()
                .find(|stored| stored.control_id == incoming.control_id);

            let outcome = match previous {
                Some(stored) if stored.same_content(&incoming) => UpsertOutcome::Unchanged,
                Some(_) => UpsertOutcome::Updated,
                None => UpsertOutcome::Inserted,
            };
            match outcome {
                UpsertOutcome::Unchanged => summary.unchanged += 1,
                UpsertOutcome::Updated => summary.updated += 1,
                UpsertOutcome::Inserted => summary.inserted += 1,
            }
            if outcome != UpsertOutcome::Unchanged {
                self.store.upsert_control(assessment_id, incoming)?;
            }
        }

        for stale in existing.iter().filter(|stored| {
            !controls
                .iter()
                .any(|control| control.control_id == stored.control_id)
        }) {
            self.store.remove_control(&AssessmentKey {
                assessment_id: assessment_id.to_string(),
                control_id: stale.control_id.clone(),
            })?;
            summary.removed += 1;
        }

        let risk_unchanged = self
            .store
            .risk(assessment_id)?
            .is_some_and(|stored| stored.same_content(risk));
        if !risk_unchanged {
            self.store.put_risk(
                assessment_id,
                StoredRisk {
                    score: risk.score,
                    tier: risk.tier,
                    drivers: risk.drivers.clone(),
                    recorded_at: now,
                },
            )?;
            summary.risk_changed = true;
        }

        info!(
            assessment_id,
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            removed = summary.removed,
            risk_changed = summary.risk_changed,
            "assessment persisted"
        );
        Ok(summary)
    }
}

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::crosswalk::normalize_ref;
use super::super::dedup::{keep_first, reduce_by_key};
use super::super::domain::{ControlScope, ControlType};
use super::super::reference::ReferenceDataError;

const STANDARD_CONTROLS: &str = include_str!("../../../data/controls.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImplementationLevel {
    Foundational,
    Intermediate,
    Advanced,
}

impl ImplementationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundational => "FOUNDATIONAL",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
        }
    }
}

/// Reference-data control. Read-only during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub control_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub control_type: ControlType,
    pub scope: ControlScope,
    #[serde(default)]
    pub nist_ref_ids: Vec<String>,
    pub implementation_level: ImplementationLevel,
    #[serde(default)]
    pub implementation_steps: Vec<String>,
    #[serde(default)]
    pub evidence_artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_guidance: Option<BTreeMap<String, String>>,
}

/// Controls indexed by id. The first definition of a duplicated id wins.
#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    controls: Vec<Control>,
    index: HashMap<String, usize>,
}

impl ControlCatalog {
    pub fn new(controls: Vec<Control>) -> Self {
        let total = controls.len();
        let controls = reduce_by_key(
            controls.into_iter().map(|mut control| {
                control.control_id = control.control_id.trim().to_string();
                control.nist_ref_ids = reduce_by_key(
                    control
                        .nist_ref_ids
                        .into_iter()
                        .map(|reference| reference.trim().to_string())
                        .filter(|reference| !reference.is_empty()),
                    |reference| normalize_ref(reference),
                    keep_first,
                );
                control
            }),
            |control| control.control_id.clone(),
            keep_first,
        );

        if controls.len() != total {
            warn!(
                duplicates = total - controls.len(),
                "control catalog contains duplicate ids; keeping first definitions"
            );
        }

        let index = controls
            .iter()
            .enumerate()
            .map(|(position, control)| (control.control_id.clone(), position))
            .collect();
        Self { controls, index }
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceDataError> {
        let controls: Vec<Control> =
            serde_json::from_str(raw).map_err(ReferenceDataError::json("controls"))?;
        Ok(Self::new(controls))
    }

    /// Catalog shipped with the crate.
    pub fn standard() -> Self {
        Self::from_json(STANDARD_CONTROLS).unwrap_or_else(|err| {
            warn!(error = %err, "embedded control catalog unreadable; continuing empty");
            Self::default()
        })
    }

    pub fn get(&self, control_id: &str) -> Option<&Control> {
        self.index
            .get(control_id.trim())
            .map(|position| &self.controls[*position])
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_keep_first_definition() {
        let catalog = ControlCatalog::from_json(
            r#"[
                {"controlId": "CTL-1", "name": "first", "type": "PROCESS", "scope": "ORG",
                 "nistRefIds": ["GOVERN 1.1", "GV-1.1", "GOVERN 1.1", " MAP 1.1 "],
                 "implementationLevel": "FOUNDATIONAL"},
                {"controlId": "CTL-1", "name": "second", "type": "LEGAL", "scope": "BOTH",
                 "implementationLevel": "ADVANCED"}
            ]"#,
        )
        .expect("catalog parses");

        assert_eq!(catalog.len(), 1);
        let control = catalog.get("CTL-1").expect("present");
        assert_eq!(control.name, "first");
        assert_eq!(control.nist_ref_ids, vec!["GOVERN 1.1", "MAP 1.1"]);
    }

    #[test]
    fn standard_catalog_is_populated() {
        let catalog = ControlCatalog::standard();
        assert!(!catalog.is_empty());
        assert!(catalog
            .controls()
            .iter()
            .all(|control| !control.nist_ref_ids.is_empty()));
    }
}

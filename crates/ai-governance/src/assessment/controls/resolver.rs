use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::dedup::{keep_strongest, reduce_by_key};
use super::super::domain::{ControlScope, ControlSelection, ControlType, Designation};
use super::catalog::{Control, ControlCatalog, ImplementationLevel};

/// Default cap on externally suggested controls.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Vendor guidance key kept regardless of the declared providers.
pub const GENERIC_GUIDANCE: &str = "generic";
const SUGGESTION_PREFIX: &str = "AI-SUGGEST-";
const SUGGESTION_REASON: &str = "suggested by an external assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub max_suggestions: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// Free-text control proposed by a collaborator outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub designation: Option<Designation>,
    #[serde(default, rename = "type")]
    pub control_type: Option<ControlType>,
}

/// A selection joined with its catalog entry, or a suggestion under a synthetic id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedControl {
    pub control_id: String,
    pub name: String,
    pub description: String,
    pub designation: Designation,
    pub reasoning: Vec<String>,
    #[serde(rename = "type")]
    pub control_type: Option<ControlType>,
    pub scope: Option<ControlScope>,
    pub implementation_level: Option<ImplementationLevel>,
    pub nist_ref_ids: Vec<String>,
    pub implementation_steps: Vec<String>,
    pub evidence_artifacts: Vec<String>,
    pub vendor_guidance: BTreeMap<String, String>,
    pub catalogued: bool,
    pub ai_generated: bool,
}

impl ResolvedControl {
    pub fn to_selection(&self) -> ControlSelection {
        ControlSelection {
            control_id: self.control_id.clone(),
            designation: self.designation,
            reasoning: self.reasoning.clone(),
        }
    }

    pub fn to_suggestion(&self) -> Suggestion {
        Suggestion {
            name: self.name.clone(),
            description: self.description.clone(),
            reasoning: self.reasoning.first().cloned(),
            designation: Some(self.designation),
            control_type: self.control_type,
        }
    }
}

/// Split resolver output back into its two inputs so it can be re-fed for recomputation.
pub fn split_for_recompute(resolved: &[ResolvedControl]) -> (Vec<ControlSelection>, Vec<Suggestion>) {
    let (suggested, selected): (Vec<&ResolvedControl>, Vec<&ResolvedControl>) =
        resolved.iter().partition(|control| control.ai_generated);
    (
        selected.into_iter().map(ResolvedControl::to_selection).collect(),
        suggested.into_iter().map(ResolvedControl::to_suggestion).collect(),
    )
}

/// Joins rule selections with the catalog and appends capped external suggestions.
#[derive(Debug, Clone)]
pub struct ControlResolver<'a> {
    catalog: &'a ControlCatalog,
    providers: Vec<String>,
    config: ResolverConfig,
}

impl<'a> ControlResolver<'a> {
    pub fn new(catalog: &'a ControlCatalog) -> Self {
        Self {
            catalog,
            providers: Vec::new(),
            config: ResolverConfig::default(),
        }
    }

    /// Cloud or model providers the organization declared; guidance for others is dropped.
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.providers = providers
            .into_iter()
            .map(|provider| provider_key(provider.as_ref()))
            .filter(|provider| !provider.is_empty())
            .collect();
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolve(
        &self,
        selections: Vec<ControlSelection>,
        suggestions: &[Suggestion],
    ) -> Vec<ResolvedControl> {
        let selections = reduce_by_key(
            selections,
            |selection| selection.control_id.trim().to_string(),
            keep_strongest,
        );

        let mut resolved: Vec<ResolvedControl> = selections
            .into_iter()
            .map(|selection| match self.catalog.get(&selection.control_id) {
                Some(control) => self.join(control, selection),
                None => {
                    warn!(
                        control_id = %selection.control_id,
                        "selected control missing from catalog; keeping placeholder"
                    );
                    placeholder(selection)
                }
            })
            .collect();

        let catalogued = resolved.len();
        resolved.extend(self.suggested(suggestions));
        debug!(
            catalogued,
            suggested = resolved.len() - catalogued,
            "controls resolved"
        );
        resolved
    }

    fn join(&self, control: &Control, selection: ControlSelection) -> ResolvedControl {
        ResolvedControl {
            control_id: control.control_id.clone(),
            name: control.name.clone(),
            description: control.description.clone(),
            designation: selection.designation,
            reasoning: selection.reasoning,
            control_type: Some(control.control_type),
            scope: Some(control.scope),
            implementation_level: Some(control.implementation_level),
            nist_ref_ids: control.nist_ref_ids.clone(),
            implementation_steps: control.implementation_steps.clone(),
            evidence_artifacts: control.evidence_artifacts.clone(),
            vendor_guidance: self.filter_guidance(control.vendor_guidance.as_ref()),
            catalogued: true,
            ai_generated: false,
        }
    }

    fn filter_guidance(
        &self,
        guidance: Option<&BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        guidance
            .into_iter()
            .flatten()
            .filter(|(provider, _)| {
                let key = provider_key(provider);
                key == GENERIC_GUIDANCE || self.providers.contains(&key)
            })
            .map(|(provider, text)| (provider.clone(), text.clone()))
            .collect()
    }

    fn suggested(&self, suggestions: &[Suggestion]) -> Vec<ResolvedControl> {
        let usable: Vec<&Suggestion> = suggestions
            .iter()
            .filter(|suggestion| {
                let keep = !suggestion.name.trim().is_empty();
                if !keep {
                    warn!("discarding external suggestion without a name");
                }
                keep
            })
            .collect();

        if usable.len() > self.config.max_suggestions {
            warn!(
                offered = usable.len(),
                cap = self.config.max_suggestions,
                "external suggestions over cap; extras discarded"
            );
        }

        usable
            .into_iter()
            .take(self.config.max_suggestions)
            .enumerate()
            .map(|(position, suggestion)| ResolvedControl {
                control_id: format!("{SUGGESTION_PREFIX}{}", position + 1),
                name: suggestion.name.trim().to_string(),
                description: suggestion.description.clone(),
                designation: suggestion.designation.unwrap_or(Designation::Recommended),
                reasoning: vec![suggestion
                    .reasoning
                    .clone()
                    .filter(|reason| !reason.trim().is_empty())
                    .unwrap_or_else(|| SUGGESTION_REASON.to_string())],
                control_type: suggestion.control_type,
                scope: None,
                implementation_level: None,
                nist_ref_ids: Vec::new(),
                implementation_steps: Vec::new(),
                evidence_artifacts: Vec::new(),
                vendor_guidance: BTreeMap::new(),
                catalogued: false,
                ai_generated: true,
            })
            .collect()
    }
}

fn placeholder(selection: ControlSelection) -> ResolvedControl {
    let control_id = selection.control_id.trim().to_string();
    ResolvedControl {
        name: format!("{control_id} (not in control catalog)"),
        control_id,
        description: String::new(),
        designation: selection.designation,
        reasoning: selection.reasoning,
        control_type: None,
        scope: None,
        implementation_level: None,
        nist_ref_ids: Vec::new(),
        implementation_steps: Vec::new(),
        evidence_artifacts: Vec::new(),
        vendor_guidance: BTreeMap::new(),
        catalogued: false,
        ai_generated: false,
    }
}

/// Normalized guidance key for a provider name as typed on a form.
fn provider_key(raw: &str) -> String {
    let key = raw.trim().to_ascii_lowercase();
    match key.as_str() {
        "amazon web services" | "amazon" => "aws".to_string(),
        "microsoft azure" | "microsoft" => "azure".to_string(),
        "google cloud" | "google cloud platform" | "google" => "gcp".to_string(),
        _ => key,
    }
}

/// Resolve with default settings and no declared providers.
pub fn resolve_controls(
    selections: Vec<ControlSelection>,
    catalog: &ControlCatalog,
    suggestions: &[Suggestion],
) -> Vec<ResolvedControl> {
    ControlResolver::new(catalog).resolve(selections, suggestions)
}

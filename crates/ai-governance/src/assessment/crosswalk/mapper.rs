use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::controls::{ImplementationLevel, ResolvedControl};
use super::super::dedup::{keep_first, reduce_by_key};
use super::super::domain::{ControlType, Designation};
use super::taxonomy::{normalize_ref, NistFunction, NistHierarchy};

/// One row per (control, referenced subcategory) pair.
///
/// A control referencing several subcategories yields several rows, so anything
/// counting controls must deduplicate by `control_id` within its scope first.
/// Spellings of the same subcategory (`GV-1.1`, `GOVERN 1.1`) collapse to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub control_id: String,
    pub control_name: String,
    pub nist_ref: String,
    pub function: Option<NistFunction>,
    pub category: Option<String>,
    pub designation: Designation,
    pub implementation_level: Option<ImplementationLevel>,
    pub control_type: Option<ControlType>,
    pub finding: String,
    pub in_taxonomy: bool,
}

pub fn map_to_taxonomy(resolved: &[ResolvedControl], taxonomy: &NistHierarchy) -> Vec<MappingEntry> {
    let entries: Vec<MappingEntry> = resolved
        .iter()
        .flat_map(|control| {
            let references = reduce_by_key(
                control.nist_ref_ids.iter(),
                |reference| normalize_ref(reference),
                keep_first,
            );
            references
                .into_iter()
                .map(move |reference| entry_for(control, reference, taxonomy))
        })
        .collect();

    debug!(
        controls = resolved.len(),
        entries = entries.len(),
        anomalies = entries.iter().filter(|entry| !entry.in_taxonomy).count(),
        "controls mapped to taxonomy"
    );
    entries
}

fn entry_for(control: &ResolvedControl, reference: &str, taxonomy: &NistHierarchy) -> MappingEntry {
    let base = |nist_ref: String, function, category, finding, in_taxonomy| MappingEntry {
        control_id: control.control_id.clone(),
        control_name: control.name.clone(),
        nist_ref,
        function,
        category,
        designation: control.designation,
        implementation_level: control.implementation_level,
        control_type: control.control_type,
        finding,
        in_taxonomy,
    };

    match taxonomy.locate(reference) {
        Some(location) => base(
            location.subcategory.id.clone(),
            Some(location.function),
            Some(location.category.id.clone()),
            format!(
                "{} control \"{}\" addresses {}: {}",
                control.designation, control.name, location.subcategory.id,
                location.subcategory.description
            ),
            true,
        ),
        None => {
            let raw = reference.trim().to_string();
            warn!(
                control_id = %control.control_id,
                nist_ref = %raw,
                normalized = %normalize_ref(&raw),
                "control references a subcategory missing from the taxonomy"
            );
            base(
                raw.clone(),
                None,
                None,
                format!(
                    "{} control \"{}\" references {raw}, which is not in the loaded taxonomy",
                    control.designation, control.name
                ),
                false,
            )
        }
    }
}

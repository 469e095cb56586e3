use std::collections::HashSet;

use serde::Serialize;

use super::super::dedup::{keep_first, reduce_by_key};
use super::mapper::MappingEntry;
use super::taxonomy::{NistFunction, NistHierarchy};

/// "X of Y implemented" over distinct controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub implemented: usize,
    pub total: usize,
}

impl Tally {
    /// Count each control once, however many entries in scope reference it.
    fn over<'a, I>(entries: I, implemented: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a MappingEntry>,
    {
        let distinct = reduce_by_key(
            entries.into_iter().map(|entry| entry.control_id.as_str()),
            |control_id| *control_id,
            keep_first,
        );
        Self {
            implemented: distinct
                .iter()
                .filter(|control_id| implemented.contains(**control_id))
                .count(),
            total: distinct.len(),
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.implemented as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryBadge {
    pub id: String,
    pub covered: bool,
    pub control_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCoverage {
    pub id: String,
    pub tally: Tally,
    pub subcategories: Vec<SubcategoryBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCoverage {
    pub function: NistFunction,
    pub tally: Tally,
    pub categories: Vec<CategoryCoverage>,
}

/// Per-level aggregation of mapping entries for dashboards and audit exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub framework: String,
    pub overall: Tally,
    pub functions: Vec<FunctionCoverage>,
    pub covered_subcategories: usize,
    pub total_subcategories: usize,
    /// Entries whose reference is not in the taxonomy.
    pub anomalies: Vec<MappingEntry>,
}

impl CoverageReport {
    pub fn build<I, S>(
        entries: &[MappingEntry],
        taxonomy: &NistHierarchy,
        implemented_ids: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let implemented: HashSet<String> = implemented_ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .collect();
        let mapped: Vec<&MappingEntry> = entries.iter().filter(|entry| entry.in_taxonomy).collect();

        let functions: Vec<FunctionCoverage> = taxonomy
            .functions()
            .iter()
            .map(|function| {
                let in_function = || within(&mapped, function.id);

                let categories = function
                    .categories
                    .iter()
                    .map(|category| {
                        let in_category = in_function()
                            .filter(|entry| entry.category.as_deref() == Some(category.id.as_str()));

                        CategoryCoverage {
                            id: category.id.clone(),
                            tally: Tally::over(in_category, &implemented),
                            subcategories: category
                                .subcategories
                                .iter()
                                .map(|subcategory| {
                                    let control_ids = reduce_by_key(
                                        in_function()
                                            .filter(|entry| entry.nist_ref == subcategory.id)
                                            .map(|entry| entry.control_id.clone()),
                                        |control_id| control_id.clone(),
                                        keep_first,
                                    );
                                    SubcategoryBadge {
                                        id: subcategory.id.clone(),
                                        covered: !control_ids.is_empty(),
                                        control_ids,
                                    }
                                })
                                .collect(),
                        }
                    })
                    .collect();

                FunctionCoverage {
                    function: function.id,
                    tally: Tally::over(in_function(), &implemented),
                    categories,
                }
            })
            .collect();

        let covered_subcategories = functions
            .iter()
            .flat_map(|function| &function.categories)
            .flat_map(|category| &category.subcategories)
            .filter(|badge| badge.covered)
            .count();

        Self {
            framework: taxonomy.framework().to_string(),
            overall: Tally::over(mapped.iter().copied(), &implemented),
            functions,
            covered_subcategories,
            total_subcategories: taxonomy.subcategory_count(),
            anomalies: entries
                .iter()
                .filter(|entry| !entry.in_taxonomy)
                .cloned()
                .collect(),
        }
    }

    pub fn function(&self, function: NistFunction) -> Option<&FunctionCoverage> {
        self.functions.iter().find(|coverage| coverage.function == function)
    }
}

fn within<'a>(
    mapped: &'a [&'a MappingEntry],
    function: NistFunction,
) -> impl Iterator<Item = &'a MappingEntry> + 'a {
    mapped
        .iter()
        .copied()
        .filter(move |entry| entry.function == Some(function))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scopes_have_zero_ratio() {
        assert_eq!(Tally::default().ratio(), 0.0);
        let tally = Tally {
            implemented: 1,
            total: 4,
        };
        assert!((tally.ratio() - 0.25).abs() < f32::EPSILON);
    }
}

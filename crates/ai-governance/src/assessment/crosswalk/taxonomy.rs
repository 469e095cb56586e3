use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::reference::ReferenceDataError;

const AI_RMF: &str = include_str!("../../../data/nist_ai_rmf.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NistFunction {
    Govern,
    Map,
    Measure,
    Manage,
}

impl NistFunction {
    pub const fn ordered() -> [Self; 4] {
        [Self::Govern, Self::Map, Self::Measure, Self::Manage]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Govern => "GOVERN",
            Self::Map => "MAP",
            Self::Measure => "MEASURE",
            Self::Manage => "MANAGE",
        }
    }

    /// Accepts full names and the two-letter abbreviations used in the playbook.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GOVERN" | "GV" => Some(Self::Govern),
            "MAP" | "MP" => Some(Self::Map),
            "MEASURE" | "MS" => Some(Self::Measure),
            "MANAGE" | "MG" => Some(Self::Manage),
            _ => None,
        }
    }
}

impl fmt::Display for NistFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub id: NistFunction,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyDocument {
    #[serde(default)]
    framework: String,
    functions: Vec<FunctionNode>,
}

/// Where a subcategory sits in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub function: NistFunction,
    pub category: &'a Category,
    pub subcategory: &'a Subcategory,
}

/// Three-level compliance hierarchy: function, category, subcategory.
#[derive(Debug, Clone, Default)]
pub struct NistHierarchy {
    framework: String,
    functions: Vec<FunctionNode>,
    index: HashMap<String, (usize, usize, usize)>,
}

impl NistHierarchy {
    /// Builds the hierarchy. A repeated subcategory id keeps its first position only.
    pub fn new(framework: impl Into<String>, mut functions: Vec<FunctionNode>) -> Self {
        let mut seen = HashSet::new();
        for category in functions
            .iter_mut()
            .flat_map(|function| function.categories.iter_mut())
        {
            category.subcategories.retain(|subcategory| {
                let first = seen.insert(normalize_ref(&subcategory.id));
                if !first {
                    warn!(subcategory = %subcategory.id, "duplicate subcategory id in taxonomy; dropped");
                }
                first
            });
        }

        let mut index = HashMap::new();
        for (f, function) in functions.iter().enumerate() {
            for (c, category) in function.categories.iter().enumerate() {
                for (s, subcategory) in category.subcategories.iter().enumerate() {
                    index.insert(normalize_ref(&subcategory.id), (f, c, s));
                }
            }
        }

        Self {
            framework: framework.into(),
            functions,
            index,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceDataError> {
        let document: TaxonomyDocument =
            serde_json::from_str(raw).map_err(ReferenceDataError::json("taxonomy"))?;
        Ok(Self::new(document.framework, document.functions))
    }

    /// NIST AI RMF 1.0 as shipped with the crate.
    pub fn ai_rmf() -> Self {
        Self::from_json(AI_RMF).unwrap_or_else(|err| {
            warn!(error = %err, "embedded taxonomy unreadable; continuing empty");
            Self::default()
        })
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    pub fn functions(&self) -> &[FunctionNode] {
        &self.functions
    }

    pub fn subcategory_count(&self) -> usize {
        self.index.len()
    }

    pub fn locate(&self, reference: &str) -> Option<Location<'_>> {
        let (f, c, s) = *self.index.get(&normalize_ref(reference))?;
        let function = &self.functions[f];
        let category = &function.categories[c];
        Some(Location {
            function: function.id,
            category,
            subcategory: &category.subcategories[s],
        })
    }
}

/// Canonical `FUNCTION n.m` form of a subcategory reference.
///
/// `GV-1.1`, `govern 1.1` and `GOVERN1.1` all normalize to `GOVERN 1.1`; anything
/// without a recognizable function prefix is only trimmed and upper-cased.
pub fn normalize_ref(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    let split = upper
        .find(|ch: char| !ch.is_ascii_alphabetic())
        .unwrap_or(upper.len());
    let (prefix, rest) = upper.split_at(split);
    let rest = rest.trim_start_matches(|ch: char| ch == '-' || ch == '_' || ch.is_whitespace());

    match NistFunction::parse(prefix) {
        Some(function) if !rest.is_empty() => format!("{} {rest}", function.label()),
        _ => upper,
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::labels::{deserialize_label, fold_label, AnswerLabel};

/// Ordinal risk classification. Variant order is the ranking used by floor enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Regulated,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Regulated]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Regulated => "REGULATED",
        }
    }

    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Regulated => 3,
        }
    }

    /// Breakpoint function over a final (clamped) score.
    pub const fn from_score(score: u8) -> Self {
        if score >= 19 {
            Self::Regulated
        } else if score >= 13 {
            Self::High
        } else if score >= 7 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "REGULATED" => Some(Self::Regulated),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority label attached to a selected control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Designation {
    Required,
    Recommended,
    Optional,
}

impl Designation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Recommended => "RECOMMENDED",
            Self::Optional => "OPTIONAL",
        }
    }

    pub const fn strength(self) -> u8 {
        match self {
            Self::Required => 3,
            Self::Recommended => 2,
            Self::Optional => 1,
        }
    }

    /// `true` when `self` strictly outranks `other`.
    pub const fn dominates(self, other: Self) -> bool {
        self.strength() > other.strength()
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    Technical,
    Process,
    Legal,
}

impl ControlType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "TECHNICAL",
            Self::Process => "PROCESS",
            Self::Legal => "LEGAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlScope {
    Org,
    Product,
    Both,
}

/// Which kind of assessment produced a context or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentScope {
    Org,
    Product,
}

impl AssessmentScope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Org => "ORG",
            Self::Product => "PRODUCT",
        }
    }
}

/// Headcount bucket used by the blueprint generator and rule contexts.
///
/// Wizards send either a bucket name or a headcount band (`1-50`, `251-1000`,
/// `1000+`); any band is bucketed by its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgSize {
    Startup,
    Small,
    Medium,
    Enterprise,
}

impl OrgSize {
    pub const fn ordered() -> [Self; 4] {
        [Self::Startup, Self::Small, Self::Medium, Self::Enterprise]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Enterprise => "enterprise",
        }
    }

    fn from_headcount(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (band, open_ended) = match raw.strip_suffix('+') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let upper: u32 = band.rsplit('-').next()?.trim().replace(',', "").parse().ok()?;
        let headcount = if open_ended { upper.saturating_add(1) } else { upper };

        Some(match headcount {
            0..=50 => Self::Startup,
            51..=250 => Self::Small,
            251..=1000 => Self::Medium,
            _ => Self::Enterprise,
        })
    }
}

impl Default for OrgSize {
    fn default() -> Self {
        Self::Small
    }
}

impl AnswerLabel for OrgSize {
    const KIND: &'static str = "organization size";

    fn from_label(raw: &str) -> Option<Self> {
        let folded = fold_label(raw);
        Self::ordered()
            .into_iter()
            .find(|size| size.label() == folded)
            .or_else(|| Self::from_headcount(raw))
    }
}

impl<'de> Deserialize<'de> for OrgSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityStage {
    Initial,
    Developing,
    Defined,
    Optimized,
}

impl MaturityStage {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Initial,
            Self::Developing,
            Self::Defined,
            Self::Optimized,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Developing => "developing",
            Self::Defined => "defined",
            Self::Optimized => "optimized",
        }
    }
}

impl Default for MaturityStage {
    fn default() -> Self {
        Self::Initial
    }
}

impl AnswerLabel for MaturityStage {
    const KIND: &'static str = "maturity stage";

    fn from_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "optimised" => Some(Self::Optimized),
            folded => Self::ordered()
                .into_iter()
                .find(|stage| stage.label() == folded),
        }
    }
}

impl<'de> Deserialize<'de> for MaturityStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer)
    }
}

/// Auditable record of one scoring contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub factor: String,
    pub contribution: i32,
    pub explanation: String,
}

/// Scorer output. `raw_score` is the pre-clamp value; `1 + Σ contributions == raw_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub score: u8,
    pub tier: RiskTier,
    pub impact: u8,
    pub likelihood: u8,
    pub inherent_risk: i32,
    pub raw_score: i32,
    pub drivers: Vec<RiskDriver>,
}

impl RiskResult {
    pub fn driver(&self, factor: &str) -> Option<&RiskDriver> {
        self.drivers.iter().find(|driver| driver.factor == factor)
    }

    pub fn contribution_total(&self) -> i32 {
        self.drivers.iter().map(|driver| driver.contribution).sum()
    }
}

/// One control picked by the rule engine, with every reason that proposed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSelection {
    pub control_id: String,
    pub designation: Designation,
    pub reasoning: Vec<String>,
}

impl ControlSelection {
    pub fn new(control_id: impl Into<String>, designation: Designation) -> Self {
        Self {
            control_id: control_id.into(),
            designation,
            reasoning: Vec::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }
}

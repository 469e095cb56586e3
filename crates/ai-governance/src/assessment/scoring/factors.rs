use tracing::warn;

use super::super::answers::DataTypes;
use super::super::domain::{RiskDriver, RiskResult, RiskTier};
use super::super::jurisdiction::{EU, US};
use super::config::ScoringConfig;

/// Inherent risk before any sub-factor applies (impact 1 x likelihood 1).
pub const BASE_INHERENT_RISK: i32 = 1;

const DIMENSION_MIN: i32 = 1;
const DIMENSION_MAX: i32 = 5;
const SCORE_MIN: i32 = 1;
const SCORE_MAX: i32 = 25;
const SLIDER_MIN: i32 = 1;
const SLIDER_MAX: i32 = 5;

/// Locally capped result of a single scoring sub-factor.
#[derive(Debug)]
pub(crate) struct Factor {
    pub factor: &'static str,
    pub points: i32,
    pub detail: String,
}

impl Factor {
    pub(crate) fn capped(
        factor: &'static str,
        raw: i32,
        cap: i32,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            factor,
            points: raw.clamp(0, cap),
            detail: detail.into(),
        }
    }

    pub(crate) fn flag(factor: &'static str, present: bool, detail: impl Into<String>) -> Self {
        Self::capped(factor, i32::from(present), 1, detail)
    }

    pub(crate) fn adjustment(factor: &'static str, points: i32, detail: impl Into<String>) -> Self {
        Self {
            factor,
            points,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Dimension {
    Impact,
    Likelihood,
}

/// Everything the combination step needs, already reduced to sub-factors.
pub(crate) struct ScoreInputs {
    pub impact: Vec<Factor>,
    pub likelihood: Vec<Factor>,
    pub adjustments: Vec<Factor>,
    pub regulated_override: Option<String>,
}

/// Fold sub-factors into a 1..=5 dimension value.
///
/// Each applied point is attributed `weight` score points so that the drivers of both
/// dimensions sum to `impact * likelihood - BASE_INHERENT_RISK`.
pub(crate) fn fold_dimension(
    dimension: Dimension,
    factors: Vec<Factor>,
    weight: i32,
) -> (i32, Vec<RiskDriver>) {
    factors
        .into_iter()
        .fold((DIMENSION_MIN, Vec::new()), |(value, mut drivers), factor| {
            let applied = factor.points.min(DIMENSION_MAX - value).max(0);
            if applied == 0 {
                return (value, drivers);
            }

            let explanation = match dimension {
                Dimension::Impact => format!("{}; impact +{applied}", factor.detail),
                Dimension::Likelihood => {
                    format!("{}; likelihood +{applied} at impact {weight}", factor.detail)
                }
            };
            drivers.push(RiskDriver {
                factor: factor.factor.to_string(),
                contribution: applied * weight,
                explanation,
            });
            (value + applied, drivers)
        })
}

pub(crate) fn adjustment_drivers(factors: Vec<Factor>) -> Vec<RiskDriver> {
    factors
        .into_iter()
        .filter(|factor| factor.points != 0)
        .map(|factor| RiskDriver {
            factor: factor.factor.to_string(),
            contribution: factor.points,
            explanation: factor.detail,
        })
        .collect()
}

pub(crate) fn governance_factor(present: &[&'static str], config: &ScoringConfig) -> Factor {
    let reduction = -(present.len() as i32);
    let points = reduction.max(config.governance_floor());
    let mut detail = format!(
        "{} governance control(s) in place: {}",
        present.len(),
        present.join(", ")
    );
    if points != reduction {
        detail.push_str(&format!(
            "; reduction capped at {}",
            config.governance_floor()
        ));
    }
    Factor::adjustment("governance_controls", points, detail)
}

pub(crate) fn regulatory_factors(regions: &[String], data: &DataTypes) -> Vec<Factor> {
    let in_eu = regions.iter().any(|region| region == EU);
    let in_us = regions.iter().any(|region| region == US);
    let regulated = data.regulated_categories();

    vec![
        Factor::adjustment(
            "eu_jurisdiction",
            if in_eu { 2 } else { 0 },
            "operates under EU jurisdiction (EU AI Act, GDPR)",
        ),
        Factor::adjustment(
            "multi_jurisdiction",
            i32::from(regions.len() > 1),
            format!(
                "operates across {} jurisdictions ({})",
                regions.len(),
                regions.join(", ")
            ),
        ),
        Factor::adjustment(
            "regulated_data_us",
            i32::from(in_us && !regulated.is_empty()),
            format!(
                "regulated data ({}) processed with a US presence",
                regulated.join(", ")
            ),
        ),
    ]
}

/// Reason for the EU + regulated-data override, when it applies.
pub(crate) fn regulated_override(regions: &[String], data: &DataTypes) -> Option<String> {
    let regulated = data.regulated_categories();
    if regulated.is_empty() || !regions.iter().any(|region| region == EU) {
        return None;
    }
    Some(format!(
        "regulated data ({}) processed under EU jurisdiction",
        regulated.join(", ")
    ))
}

pub(crate) fn assemble(inputs: ScoreInputs) -> RiskResult {
    let (impact, mut drivers) = fold_dimension(Dimension::Impact, inputs.impact, 1);
    let (likelihood, likelihood_drivers) =
        fold_dimension(Dimension::Likelihood, inputs.likelihood, impact);
    drivers.extend(likelihood_drivers);

    let inherent_risk = impact * likelihood;
    let adjustments = adjustment_drivers(inputs.adjustments);
    let adjustment: i32 = adjustments.iter().map(|driver| driver.contribution).sum();
    drivers.extend(adjustments);

    let raw_score = inherent_risk + adjustment;
    let score = raw_score.clamp(SCORE_MIN, SCORE_MAX) as u8;
    let mut tier = RiskTier::from_score(score);

    if let Some(reason) = inputs.regulated_override {
        if tier < RiskTier::Regulated {
            drivers.push(RiskDriver {
                factor: "regulated_data_eu".to_string(),
                contribution: 0,
                explanation: format!("{reason}; tier raised from {tier} to REGULATED"),
            });
            tier = RiskTier::Regulated;
        }
    }

    RiskResult {
        score,
        tier,
        impact: impact as u8,
        likelihood: likelihood as u8,
        inherent_risk,
        raw_score,
        drivers,
    }
}

/// Raise `result.tier` to at least `floor`, recording the override for audit.
pub(crate) fn enforce_floor(mut result: RiskResult, floor: RiskTier) -> RiskResult {
    if result.tier < floor {
        result.drivers.push(RiskDriver {
            factor: "org_floor".to_string(),
            contribution: 0,
            explanation: format!(
                "organization tier {floor} sets the floor; product tier raised from {}",
                result.tier
            ),
        });
        result.tier = floor;
    }
    result
}

/// Clamp a 1..=5 form slider at the point of use. Zero means unanswered.
pub(crate) fn clamp_slider(name: &str, raw: i32) -> i32 {
    let clamped = raw.clamp(SLIDER_MIN, SLIDER_MAX);
    if clamped != raw && raw != 0 {
        warn!(field = name, value = raw, "slider outside 1..=5; clamped");
    }
    clamped
}

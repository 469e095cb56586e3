use super::super::answers::{OrgAnswers, OrgContext, NEUTRAL_TOLERANCE};
use super::super::domain::RiskResult;
use super::super::jurisdiction::regions;
use super::config::ScoringConfig;
use super::factors::{
    assemble, clamp_slider, governance_factor, regulated_override, regulatory_factors,
    Factor, ScoreInputs,
};

const AI_FOOTPRINT_THRESHOLD: usize = 3;
const SEVERE_HARM: i32 = 4;
const HIGH_TOLERANCE: i32 = 4;

pub(crate) fn score(answers: &OrgAnswers, config: &ScoringConfig) -> RiskResult {
    let regions = regions(&answers.step1.countries);
    let data = answers.step3.data_types;

    let mut adjustments = vec![governance_factor(&answers.step5.present(), config)];
    adjustments.extend(regulatory_factors(&regions, &data));

    assemble(ScoreInputs {
        impact: impact_factors(answers),
        likelihood: likelihood_factors(answers),
        adjustments,
        regulated_override: regulated_override(&regions, &data),
    })
}

/// Organization facts handed down to product assessments.
pub(crate) fn parent_context(answers: &OrgAnswers, result: &RiskResult) -> OrgContext {
    OrgContext {
        org_risk_tier: result.tier,
        org_jurisdictions: regions(&answers.step1.countries),
        org_risk_tolerance: tolerance(answers),
        org_cloud_providers: answers.step1.cloud_providers.clone(),
    }
}

fn tolerance(answers: &OrgAnswers) -> i32 {
    answers
        .step2
        .risk_tolerance
        .map(|raw| clamp_slider("riskTolerance", raw))
        .unwrap_or(NEUTRAL_TOLERANCE)
}

fn impact_factors(answers: &OrgAnswers) -> Vec<Factor> {
    let harms = [
        ("financial", answers.step2.financial),
        ("operational", answers.step2.operational),
        ("safety/wellbeing", answers.step2.safety_wellbeing),
        ("reputational", answers.step2.reputational),
    ];
    let (worst_dimension, worst) = harms
        .iter()
        .map(|(name, raw)| (*name, clamp_slider(name, *raw)))
        .fold(("financial", 1), |worst, current| {
            if current.1 > worst.1 {
                current
            } else {
                worst
            }
        });

    let categories = answers.step3.data_types.categories();

    vec![
        Factor::flag(
            "harm_severity",
            worst >= SEVERE_HARM,
            format!("{worst_dimension} harm rated {worst} of 5"),
        ),
        Factor::capped(
            "data_sensitivity",
            categories.len() as i32,
            3,
            format!("handles sensitive data ({})", categories.join(", ")),
        ),
    ]
}

fn likelihood_factors(answers: &OrgAnswers) -> Vec<Factor> {
    let ai_types: Vec<&str> = answers
        .step4
        .ai_types
        .iter()
        .map(|kind| kind.trim())
        .filter(|kind| !kind.is_empty())
        .collect();
    let tolerance = tolerance(answers);

    vec![
        Factor::flag(
            "ai_footprint",
            ai_types.len() >= AI_FOOTPRINT_THRESHOLD,
            format!(
                "{} AI system types in use ({})",
                ai_types.len(),
                ai_types.join(", ")
            ),
        ),
        Factor::flag(
            "automated_decisions",
            answers.step4.can_deny_services,
            "AI outputs can deny or limit services to people",
        ),
        Factor::flag(
            "third_party_models",
            answers.step4.uses_third_party_models,
            "relies on third-party AI models",
        ),
        Factor::flag(
            "risk_tolerance",
            tolerance >= HIGH_TOLERANCE,
            format!("risk tolerance rated {tolerance} of 5"),
        ),
    ]
}

use super::super::answers::{AutonomyLevel, ImpactSeverity, OrgContext, ProductAnswers};
use super::super::domain::RiskResult;
use super::super::jurisdiction::regions;
use super::config::ScoringConfig;
use super::factors::{
    assemble, clamp_slider, enforce_floor, governance_factor, regulated_override,
    regulatory_factors, Factor, ScoreInputs,
};

const HIGH_TOLERANCE: i32 = 4;

pub(crate) fn score(
    answers: &ProductAnswers,
    parent: &OrgContext,
    config: &ScoringConfig,
) -> RiskResult {
    let regions = regions(
        parent
            .org_jurisdictions
            .iter()
            .chain(answers.step1.deployment_regions.iter()),
    );
    let data = answers.step3.data_types;

    let mut adjustments = vec![governance_factor(&answers.step5.present(), config)];
    adjustments.extend(regulatory_factors(&regions, &data));

    let own = assemble(ScoreInputs {
        impact: impact_factors(answers),
        likelihood: likelihood_factors(answers, parent),
        adjustments,
        regulated_override: regulated_override(&regions, &data),
    });

    enforce_floor(own, parent.org_risk_tier)
}

fn impact_factors(answers: &ProductAnswers) -> Vec<Factor> {
    let severity = answers.step2.impact_severity;
    let severity_points = match severity {
        ImpactSeverity::Low => 0,
        ImpactSeverity::Medium => 1,
        ImpactSeverity::High | ImpactSeverity::Critical => 2,
    };

    let data = answers.step3.data_types;
    let mut sensitive = data.regulated_categories();
    if data.biometric {
        sensitive.push("biometric");
    }

    let consequential = answers.step2.can_deny_services || answers.step2.vulnerable_populations;
    let mut consequence_detail = Vec::new();
    if answers.step2.can_deny_services {
        consequence_detail.push("can deny or limit services");
    }
    if answers.step2.vulnerable_populations {
        consequence_detail.push("affects vulnerable populations");
    }

    vec![
        Factor::capped(
            "impact_severity",
            severity_points,
            2,
            format!("impact severity rated {}", severity.label()),
        ),
        Factor::flag(
            "consequential_decisions",
            consequential,
            format!("product {}", consequence_detail.join(" and ")),
        ),
        Factor::flag(
            "data_sensitivity",
            !sensitive.is_empty(),
            format!("processes sensitive data ({})", sensitive.join(", ")),
        ),
    ]
}

fn likelihood_factors(answers: &ProductAnswers, parent: &OrgContext) -> Vec<Factor> {
    let autonomy = answers.step4.autonomy_level;
    let source = answers.step4.model_source;
    let tolerance = clamp_slider("orgRiskTolerance", parent.org_risk_tolerance);

    vec![
        Factor::flag(
            "autonomy",
            autonomy == AutonomyLevel::Autonomous,
            format!("operates at {} autonomy", autonomy.label()),
        ),
        Factor::flag(
            "oversight_gap",
            !answers.step4.human_in_the_loop,
            "no human in the loop before outputs take effect",
        ),
        Factor::flag(
            "external_model",
            source.is_external(),
            format!("built on a {} model", source.label()),
        ),
        Factor::flag(
            "org_risk_tolerance",
            tolerance >= HIGH_TOLERANCE,
            format!("organization risk tolerance rated {tolerance} of 5"),
        ),
    ]
}

//! Properties every scoring result must satisfy, whatever the answers.

use std::collections::BTreeSet;

use ai_governance::assessment::{
    split_for_recompute, AiUsageStep, AssessmentEngine, AutonomyLevel, AutonomyStep, DataStep,
    DataTypes, EngineConfig, ImpactSeverity, ImpactStep, MaturityStage, ModelSource, OrgAnswers,
    OrgContext, OrgGovernanceStep, OrgProfileStep, OrgSize, ProductAnswers, ProductControlsStep,
    ProductImpactStep, ProductProfileStep, RiskResult, RiskScorer, RiskTier, ScoringConfig,
};
use proptest::prelude::*;

const COUNTRIES: &[&str] = &[
    "Germany",
    "France",
    "United States",
    "United Kingdom",
    "Canada",
    "Japan",
];
const PROVIDERS: &[&str] = &["AWS", "Azure", "Google Cloud"];
const AI_TYPES: &[&str] = &["predictive", "generative", "computer vision", "recommendation"];
const ZERO_WEIGHT_FACTORS: &[&str] = &["regulated_data_eu", "org_floor"];

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

fn arb_subset(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(pool.to_vec(), 0..=pool.len().min(3)).prop_map(owned)
}

// Sliders stray outside 1..=5 on purpose; the scorer clamps them.
fn arb_slider() -> impl Strategy<Value = i32> {
    -1i32..=7
}

fn arb_data() -> impl Strategy<Value = DataTypes> {
    prop::array::uniform5(any::<bool>()).prop_map(|[pii, phi, pci, children, biometric]| {
        DataTypes {
            pii,
            phi,
            pci,
            children,
            biometric,
        }
    })
}

fn arb_impact() -> impl Strategy<Value = ImpactStep> {
    (
        arb_slider(),
        arb_slider(),
        arb_slider(),
        arb_slider(),
        prop::option::of(arb_slider()),
    )
        .prop_map(
            |(financial, operational, safety_wellbeing, reputational, risk_tolerance)| ImpactStep {
                financial,
                operational,
                safety_wellbeing,
                reputational,
                risk_tolerance,
            },
        )
}

fn arb_governance() -> impl Strategy<Value = OrgGovernanceStep> {
    prop::array::uniform8(any::<bool>()).prop_map(|flags| OrgGovernanceStep {
        security_program: flags[0],
        incident_response_plan: flags[1],
        impact_assessments: flags[2],
        ai_policy: flags[3],
        model_inventory: flags[4],
        vendor_risk_management: flags[5],
        bias_testing: flags[6],
        human_oversight_process: flags[7],
    })
}

fn arb_org_answers() -> impl Strategy<Value = OrgAnswers> {
    (
        arb_subset(COUNTRIES),
        arb_subset(PROVIDERS),
        prop::sample::select(OrgSize::ordered().to_vec()),
        prop::sample::select(MaturityStage::ordered().to_vec()),
        arb_impact(),
        arb_data(),
        arb_subset(AI_TYPES),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        arb_governance(),
    )
        .prop_map(
            |(
                countries,
                cloud_providers,
                org_size,
                maturity_stage,
                step2,
                data_types,
                ai_types,
                customer_facing,
                can_deny_services,
                uses_third_party_models,
                step5,
            )| OrgAnswers {
                version: 1,
                step1: OrgProfileStep {
                    organization_name: "Generated Org".to_string(),
                    industry: None,
                    org_size,
                    maturity_stage,
                    countries,
                    cloud_providers,
                    customer_facing,
                },
                step2,
                step3: DataStep { data_types },
                step4: AiUsageStep {
                    ai_types,
                    can_deny_services,
                    uses_third_party_models,
                },
                step5,
            },
        )
}

fn arb_product_answers() -> impl Strategy<Value = ProductAnswers> {
    (
        arb_subset(COUNTRIES),
        prop::sample::select(vec![
            ImpactSeverity::Low,
            ImpactSeverity::Medium,
            ImpactSeverity::High,
            ImpactSeverity::Critical,
        ]),
        any::<bool>(),
        any::<bool>(),
        arb_data(),
        prop::sample::select(vec![
            AutonomyLevel::Assistive,
            AutonomyLevel::Augmentative,
            AutonomyLevel::Autonomous,
        ]),
        any::<bool>(),
        prop::sample::select(vec![
            ModelSource::InHouse,
            ModelSource::ThirdParty,
            ModelSource::OpenSource,
        ]),
        prop::array::uniform7(any::<bool>()),
    )
        .prop_map(
            |(
                deployment_regions,
                impact_severity,
                can_deny_services,
                vulnerable_populations,
                data_types,
                autonomy_level,
                human_in_the_loop,
                model_source,
                safeguards,
            )| ProductAnswers {
                version: 1,
                step1: ProductProfileStep {
                    product_name: "Generated Product".to_string(),
                    deployment_regions,
                    ..ProductProfileStep::default()
                },
                step2: ProductImpactStep {
                    impact_severity,
                    can_deny_services,
                    vulnerable_populations,
                },
                step3: DataStep { data_types },
                step4: AutonomyStep {
                    autonomy_level,
                    human_in_the_loop,
                    model_source,
                },
                step5: ProductControlsStep {
                    monitoring: safeguards[0],
                    rollback_plan: safeguards[1],
                    model_documentation: safeguards[2],
                    bias_testing: safeguards[3],
                    red_teaming: safeguards[4],
                    human_review_process: safeguards[5],
                    incident_response: safeguards[6],
                },
            },
        )
}

fn arb_parent() -> impl Strategy<Value = OrgContext> {
    (
        prop::sample::select(RiskTier::ordered().to_vec()),
        arb_subset(&["EU", "US", "UK"]),
        arb_slider(),
        arb_subset(PROVIDERS),
    )
        .prop_map(
            |(org_risk_tier, org_jurisdictions, org_risk_tolerance, org_cloud_providers)| {
                OrgContext {
                    org_risk_tier,
                    org_jurisdictions,
                    org_risk_tolerance,
                    org_cloud_providers,
                }
            },
        )
}

fn set_data_flag(data: &mut DataTypes, which: usize) {
    match which {
        0 => data.pii = true,
        1 => data.phi = true,
        2 => data.pci = true,
        3 => data.children = true,
        _ => data.biometric = true,
    }
}

const ORG_SUB_FACTORS: usize = 6;
const PRODUCT_SUB_FACTORS: usize = 8;

/// Raises one impact or likelihood input of an organization answer set.
fn bump_org(answers: &OrgAnswers, which: usize, data_flag: usize) -> OrgAnswers {
    let mut worse = answers.clone();
    match which {
        0 => worse.step2.financial = worse.step2.financial.max(5),
        1 => set_data_flag(&mut worse.step3.data_types, data_flag),
        2 => worse.step4.ai_types = owned(AI_TYPES.to_vec()),
        3 => worse.step4.can_deny_services = true,
        4 => worse.step4.uses_third_party_models = true,
        _ => worse.step2.risk_tolerance = Some(5),
    }
    worse
}

/// Raises one impact or likelihood input of a product assessment.
fn bump_product(
    answers: &ProductAnswers,
    parent: &OrgContext,
    which: usize,
    data_flag: usize,
) -> (ProductAnswers, OrgContext) {
    let mut worse = answers.clone();
    let mut parent = parent.clone();
    match which {
        0 => worse.step2.impact_severity = worse.step2.impact_severity.max(ImpactSeverity::High),
        1 => worse.step2.can_deny_services = true,
        2 => worse.step2.vulnerable_populations = true,
        3 => set_data_flag(&mut worse.step3.data_types, data_flag),
        4 => worse.step4.autonomy_level = AutonomyLevel::Autonomous,
        5 => worse.step4.human_in_the_loop = false,
        6 => {
            if !worse.step4.model_source.is_external() {
                worse.step4.model_source = ModelSource::ThirdParty;
            }
        }
        _ => parent.org_risk_tolerance = parent.org_risk_tolerance.max(5),
    }
    (worse, parent)
}

fn region_of(label: &str) -> &str {
    match label {
        "Germany" | "France" | "EU" => "EU",
        "United States" | "US" => "US",
        "United Kingdom" | "UK" => "UK",
        "Canada" => "CA",
        other => other,
    }
}

fn regulatory_factors(
    expected: &mut BTreeSet<&'static str>,
    regions: &BTreeSet<&str>,
    data: &DataTypes,
) {
    if regions.contains("EU") {
        expected.insert("eu_jurisdiction");
    }
    if regions.len() > 1 {
        expected.insert("multi_jurisdiction");
    }
    if regions.contains("US") && (data.phi || data.pci || data.children) {
        expected.insert("regulated_data_us");
    }
}

fn expected_org_factors(answers: &OrgAnswers) -> BTreeSet<&'static str> {
    let harm = &answers.step2;
    let data = &answers.step3.data_types;
    let governance = &answers.step5;
    let triggered = [
        (
            "harm_severity",
            [harm.financial, harm.operational, harm.safety_wellbeing, harm.reputational]
                .iter()
                .any(|slider| *slider >= 4),
        ),
        (
            "data_sensitivity",
            data.pii || data.phi || data.pci || data.children || data.biometric,
        ),
        ("ai_footprint", answers.step4.ai_types.len() >= 3),
        ("automated_decisions", answers.step4.can_deny_services),
        ("third_party_models", answers.step4.uses_third_party_models),
        (
            "risk_tolerance",
            harm.risk_tolerance.map_or(false, |tolerance| tolerance >= 4),
        ),
        (
            "governance_controls",
            governance.security_program
                || governance.incident_response_plan
                || governance.impact_assessments
                || governance.ai_policy
                || governance.model_inventory
                || governance.vendor_risk_management
                || governance.bias_testing
                || governance.human_oversight_process,
        ),
    ];

    let mut expected: BTreeSet<&'static str> = triggered
        .into_iter()
        .filter_map(|(factor, hit)| hit.then_some(factor))
        .collect();
    let regions: BTreeSet<&str> = answers
        .step1
        .countries
        .iter()
        .map(|country| region_of(country))
        .collect();
    regulatory_factors(&mut expected, &regions, data);
    expected
}

fn expected_product_factors(answers: &ProductAnswers, parent: &OrgContext) -> BTreeSet<&'static str> {
    let data = &answers.step3.data_types;
    let safeguards = &answers.step5;
    let triggered = [
        (
            "impact_severity",
            answers.step2.impact_severity != ImpactSeverity::Low,
        ),
        (
            "consequential_decisions",
            answers.step2.can_deny_services || answers.step2.vulnerable_populations,
        ),
        (
            "data_sensitivity",
            data.phi || data.pci || data.children || data.biometric,
        ),
        (
            "autonomy",
            answers.step4.autonomy_level == AutonomyLevel::Autonomous,
        ),
        ("oversight_gap", !answers.step4.human_in_the_loop),
        (
            "external_model",
            answers.step4.model_source != ModelSource::InHouse,
        ),
        ("org_risk_tolerance", parent.org_risk_tolerance >= 4),
        (
            "governance_controls",
            safeguards.monitoring
                || safeguards.rollback_plan
                || safeguards.model_documentation
                || safeguards.bias_testing
                || safeguards.red_teaming
                || safeguards.human_review_process
                || safeguards.incident_response,
        ),
    ];

    let mut expected: BTreeSet<&'static str> = triggered
        .into_iter()
        .filter_map(|(factor, hit)| hit.then_some(factor))
        .collect();
    let regions: BTreeSet<&str> = parent
        .org_jurisdictions
        .iter()
        .chain(answers.step1.deployment_regions.iter())
        .map(|label| region_of(label))
        .collect();
    regulatory_factors(&mut expected, &regions, data);
    expected
}

fn weighted_factors(result: &RiskResult) -> BTreeSet<&str> {
    result
        .drivers
        .iter()
        .filter(|driver| driver.contribution != 0)
        .map(|driver| driver.factor.as_str())
        .collect()
}

fn check_result(result: &RiskResult) -> Result<(), TestCaseError> {
    prop_assert!((1..=25).contains(&result.score));
    prop_assert!((1..=5).contains(&result.impact));
    prop_assert!((1..=5).contains(&result.likelihood));
    prop_assert_eq!(
        result.inherent_risk,
        i32::from(result.impact) * i32::from(result.likelihood)
    );
    prop_assert_eq!(1 + result.contribution_total(), result.raw_score);
    prop_assert_eq!(i32::from(result.score), result.raw_score.clamp(1, 25));
    prop_assert!(result.tier >= RiskTier::from_score(result.score));

    let overridden = result
        .drivers
        .iter()
        .any(|driver| ZERO_WEIGHT_FACTORS.contains(&driver.factor.as_str()));
    if !overridden {
        prop_assert_eq!(result.tier, RiskTier::from_score(result.score));
    }
    for driver in &result.drivers {
        prop_assert!(!driver.explanation.trim().is_empty());
        if driver.contribution == 0 {
            prop_assert!(ZERO_WEIGHT_FACTORS.contains(&driver.factor.as_str()));
        }
    }
    let mut factors: Vec<&str> = result
        .drivers
        .iter()
        .map(|driver| driver.factor.as_str())
        .collect();
    factors.sort_unstable();
    factors.dedup();
    prop_assert_eq!(factors.len(), result.drivers.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn org_results_are_bounded_and_explained(answers in arb_org_answers()) {
        let result = RiskScorer::default().score_org(&answers);
        check_result(&result)?;
    }

    #[test]
    fn product_results_are_bounded_and_explained(
        answers in arb_product_answers(),
        parent in arb_parent(),
    ) {
        let result = RiskScorer::default().score_product(&answers, &parent);
        check_result(&result)?;
    }

    #[test]
    fn product_tier_never_falls_below_org_tier(
        answers in arb_product_answers(),
        parent in arb_parent(),
    ) {
        let result = RiskScorer::default().score_product(&answers, &parent);
        prop_assert!(result.tier >= parent.org_risk_tier);
    }

    #[test]
    fn scoring_is_deterministic(answers in arb_org_answers()) {
        let scorer = RiskScorer::default();
        prop_assert_eq!(scorer.score_org(&answers), scorer.score_org(&answers));
    }

    #[test]
    fn org_drivers_match_triggered_factors(answers in arb_org_answers()) {
        let result = RiskScorer::default().score_org(&answers);
        prop_assert_eq!(weighted_factors(&result), expected_org_factors(&answers));
    }

    #[test]
    fn product_drivers_match_triggered_factors(
        answers in arb_product_answers(),
        parent in arb_parent(),
    ) {
        let result = RiskScorer::default().score_product(&answers, &parent);
        prop_assert_eq!(weighted_factors(&result), expected_product_factors(&answers, &parent));
    }

    #[test]
    fn raising_any_org_factor_never_lowers_the_tier(
        answers in arb_org_answers(),
        which in 0..ORG_SUB_FACTORS,
        data_flag in 0usize..5,
    ) {
        let scorer = RiskScorer::default();
        let before = scorer.score_org(&answers);
        let after = scorer.score_org(&bump_org(&answers, which, data_flag));
        prop_assert!(after.tier >= before.tier);
        prop_assert!(after.score >= before.score);
    }

    #[test]
    fn raising_any_product_factor_never_lowers_the_tier(
        answers in arb_product_answers(),
        parent in arb_parent(),
        which in 0..PRODUCT_SUB_FACTORS,
        data_flag in 0usize..5,
    ) {
        let scorer = RiskScorer::default();
        let before = scorer.score_product(&answers, &parent);
        let (worse, worse_parent) = bump_product(&answers, &parent, which, data_flag);
        let after = scorer.score_product(&worse, &worse_parent);
        prop_assert!(after.tier >= before.tier);
        prop_assert!(after.score >= before.score);
    }

    #[test]
    fn governance_controls_never_raise_the_score(answers in arb_org_answers()) {
        let scorer = RiskScorer::default();
        let mut ungoverned = answers.clone();
        ungoverned.step5 = OrgGovernanceStep::default();
        prop_assert!(scorer.score_org(&answers).score <= scorer.score_org(&ungoverned).score);
    }

    #[test]
    fn governance_reduction_respects_any_floor(answers in arb_org_answers(), floor in -24i32..=0) {
        let result = RiskScorer::new(ScoringConfig::new(floor)).score_org(&answers);
        if let Some(driver) = result.driver("governance_controls") {
            prop_assert!(driver.contribution >= floor);
            prop_assert!(driver.contribution < 0);
        }
    }

    #[test]
    fn resolved_controls_are_stable_under_recompute(answers in arb_org_answers()) {
        let engine = AssessmentEngine::standard(EngineConfig::default());
        let assessment = engine.assess_org(&answers, &[]);
        let (selections, suggestions) = split_for_recompute(&assessment.controls);
        let again = ai_governance::assessment::ControlResolver::new(engine.catalog())
            .with_providers(&answers.step1.cloud_providers)
            .resolve(selections, &suggestions);
        prop_assert_eq!(assessment.controls, again);
    }
}

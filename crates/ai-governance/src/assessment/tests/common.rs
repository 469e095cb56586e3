use std::collections::BTreeMap;

use crate::assessment::answers::{DataTypes, ImpactSeverity, OrgAnswers, ProductAnswers};
use crate::assessment::controls::{Control, ControlCatalog, ImplementationLevel, ResolvedControl};
use crate::assessment::domain::{ControlScope, ControlType, Designation};
use crate::assessment::rules::RuleSet;

/// Organization in Germany with minimal harm ratings that processes health data.
pub(super) fn german_health_org() -> OrgAnswers {
    let mut answers = OrgAnswers::default();
    answers.step1.organization_name = "Klinik Analytics GmbH".to_string();
    answers.step1.countries = vec!["Germany".to_string()];
    answers.step2.financial = 1;
    answers.step2.operational = 1;
    answers.step2.safety_wellbeing = 1;
    answers.step2.reputational = 1;
    answers.step3.data_types = DataTypes {
        phi: true,
        ..DataTypes::default()
    };
    answers
}

/// Organization that trips every scoring factor.
pub(super) fn worst_case_org() -> OrgAnswers {
    let mut answers = OrgAnswers::default();
    answers.step1.organization_name = "Everything Everywhere Inc".to_string();
    answers.step1.countries = vec!["Germany".to_string(), "United States".to_string()];
    answers.step2.financial = 5;
    answers.step2.operational = 5;
    answers.step2.safety_wellbeing = 5;
    answers.step2.reputational = 5;
    answers.step2.risk_tolerance = Some(5);
    answers.step3.data_types = DataTypes {
        pii: true,
        phi: true,
        pci: true,
        children: true,
        biometric: true,
    };
    answers.step4.ai_types = vec![
        "predictive".to_string(),
        "generative".to_string(),
        "computer vision".to_string(),
    ];
    answers.step4.can_deny_services = true;
    answers.step4.uses_third_party_models = true;
    answers
}

pub(super) fn low_impact_product() -> ProductAnswers {
    let mut answers = ProductAnswers::default();
    answers.step1.product_name = "Appointment reminder drafts".to_string();
    answers.step2.impact_severity = ImpactSeverity::Low;
    answers
}

pub(super) fn rules(raw: &str) -> RuleSet {
    let set = RuleSet::from_json(raw).expect("rule document parses");
    assert!(set.rejected().is_empty(), "{:?}", set.rejected());
    set
}

pub(super) fn control(id: &str, refs: &[&str]) -> Control {
    Control {
        control_id: id.to_string(),
        name: format!("{id} control"),
        description: format!("{id} description"),
        control_type: ControlType::Process,
        scope: ControlScope::Both,
        nist_ref_ids: refs.iter().map(|reference| reference.to_string()).collect(),
        implementation_level: ImplementationLevel::Foundational,
        implementation_steps: vec!["do the thing".to_string()],
        evidence_artifacts: vec!["proof".to_string()],
        vendor_guidance: None,
    }
}

pub(super) fn catalog(controls: Vec<Control>) -> ControlCatalog {
    ControlCatalog::new(controls)
}

pub(super) fn guidance(entries: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(
        entries
            .iter()
            .map(|(provider, text)| (provider.to_string(), text.to_string()))
            .collect(),
    )
}

pub(super) fn resolved(id: &str, designation: Designation, refs: &[&str]) -> ResolvedControl {
    ResolvedControl {
        control_id: id.to_string(),
        name: format!("{id} control"),
        description: String::new(),
        designation,
        reasoning: vec![format!("{id} selected")],
        control_type: Some(ControlType::Technical),
        scope: Some(ControlScope::Product),
        implementation_level: Some(ImplementationLevel::Intermediate),
        nist_ref_ids: refs.iter().map(|reference| reference.to_string()).collect(),
        implementation_steps: Vec::new(),
        evidence_artifacts: Vec::new(),
        vendor_guidance: BTreeMap::new(),
        catalogued: true,
        ai_generated: false,
    }
}

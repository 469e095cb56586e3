use crate::assessment::blueprint::generate_blueprint;
use crate::assessment::domain::{MaturityStage, OrgSize};

fn committee_names(size: OrgSize, maturity: MaturityStage) -> Vec<&'static str> {
    generate_blueprint(size, maturity)
        .committees
        .iter()
        .map(|committee| committee.name)
        .collect()
}

#[test]
fn same_inputs_same_blueprint() {
    for size in OrgSize::ordered() {
        for maturity in MaturityStage::ordered() {
            assert_eq!(
                generate_blueprint(size, maturity),
                generate_blueprint(size, maturity)
            );
        }
    }
}

#[test]
fn new_startups_get_a_single_forum() {
    assert_eq!(
        committee_names(OrgSize::Startup, MaturityStage::Initial),
        vec!["AI Review Huddle"]
    );
}

#[test]
fn committees_accumulate_with_size_and_maturity() {
    assert_eq!(
        committee_names(OrgSize::Startup, MaturityStage::Developing),
        vec!["AI Review Huddle", "AI Governance Committee"]
    );
    assert_eq!(
        committee_names(OrgSize::Medium, MaturityStage::Defined),
        vec![
            "AI Review Huddle",
            "AI Governance Committee",
            "Model Risk Review Board"
        ]
    );
    assert_eq!(
        committee_names(OrgSize::Enterprise, MaturityStage::Optimized),
        vec![
            "AI Review Huddle",
            "AI Governance Committee",
            "Model Risk Review Board",
            "Board Risk Committee (AI agenda)",
            "Responsible AI Council"
        ]
    );
}

#[test]
fn larger_organizations_never_lose_structure() {
    for maturity in MaturityStage::ordered() {
        let sizes = OrgSize::ordered();
        for pair in sizes.windows(2) {
            let smaller = generate_blueprint(pair[0], maturity);
            let larger = generate_blueprint(pair[1], maturity);
            assert!(larger.roles.len() > smaller.roles.len());
            assert!(larger.committees.len() >= smaller.committees.len());
            assert!(smaller
                .roles
                .iter()
                .all(|role| larger.roles.contains(role)));
        }
    }
}

#[test]
fn oversight_patterns_and_escalation_are_fixed_shape() {
    let blueprint = generate_blueprint(OrgSize::Small, MaturityStage::Defined);
    let patterns: Vec<&str> = blueprint
        .oversight_patterns
        .iter()
        .map(|pattern| pattern.name)
        .collect();
    assert_eq!(
        patterns,
        vec!["Human-in-the-loop", "Human-on-the-loop", "Human-in-command"]
    );

    let levels: Vec<u8> = blueprint.escalation.iter().map(|step| step.level).collect();
    assert_eq!(levels, vec![1, 2, 3]);
    assert_eq!(blueprint.escalation[2].owner, "CEO");

    let enterprise = generate_blueprint(OrgSize::Enterprise, MaturityStage::Defined);
    assert_eq!(enterprise.escalation[2].owner, "Chief AI Officer and board");
    assert_eq!(enterprise.raci[0].accountable, "Model Risk Review Board");
}

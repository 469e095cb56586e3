//! Governance operating model derived from organization size and maturity.

use serde::Serialize;

use super::domain::{MaturityStage, OrgSize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesOfDefense {
    pub first: &'static str,
    pub second: &'static str,
    pub third: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceRole {
    pub title: &'static str,
    pub mandate: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub name: &'static str,
    pub cadence: &'static str,
    pub purpose: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaciRow {
    pub decision: &'static str,
    pub responsible: &'static str,
    pub accountable: &'static str,
    pub consulted: &'static str,
    pub informed: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OversightPattern {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhistleblowerChannel {
    pub channel: &'static str,
    pub process: &'static str,
    pub response_sla: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationStep {
    pub level: u8,
    pub trigger: &'static str,
    pub owner: &'static str,
    pub response_time: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceBlueprint {
    pub org_size: OrgSize,
    pub maturity_stage: MaturityStage,
    pub lines_of_defense: LinesOfDefense,
    pub roles: Vec<GovernanceRole>,
    pub committees: Vec<Committee>,
    pub raci: Vec<RaciRow>,
    pub review_cadence: &'static str,
    pub oversight_patterns: Vec<OversightPattern>,
    pub whistleblower: WhistleblowerChannel,
    pub escalation: Vec<EscalationStep>,
}

/// Pure lookup: the same inputs always produce the same blueprint.
pub fn generate_blueprint(org_size: OrgSize, maturity_stage: MaturityStage) -> GovernanceBlueprint {
    GovernanceBlueprint {
        org_size,
        maturity_stage,
        lines_of_defense: lines_of_defense(org_size),
        roles: roles(org_size),
        committees: committees(org_size, maturity_stage),
        raci: raci(org_size),
        review_cadence: review_cadence(org_size),
        oversight_patterns: oversight_patterns(),
        whistleblower: whistleblower(org_size),
        escalation: escalation(org_size),
    }
}

fn lines_of_defense(size: OrgSize) -> LinesOfDefense {
    match size {
        OrgSize::Startup => LinesOfDefense {
            first: "Engineering leads own AI risk in the systems they build and ship.",
            second: "A founder or CTO acts as the AI risk owner and signs off on releases.",
            third: "An external advisor or fractional auditor reviews AI practices annually.",
        },
        OrgSize::Small => LinesOfDefense {
            first: "Product and engineering teams own day-to-day AI risk controls.",
            second: "A designated AI governance lead sets policy and monitors compliance.",
            third: "External audit firm reviews the AI governance program annually.",
        },
        OrgSize::Medium => LinesOfDefense {
            first: "Product teams operate AI controls with embedded risk champions.",
            second: "Risk and compliance function oversees AI policy, with privacy and legal support.",
            third: "Internal audit includes AI systems in its annual plan.",
        },
        OrgSize::Enterprise => LinesOfDefense {
            first: "Business units and model owners operate AI controls and attest quarterly.",
            second: "Enterprise risk management and a dedicated Responsible AI office set standards and challenge.",
            third: "Internal audit runs a dedicated AI assurance program reporting to the audit committee.",
        },
    }
}

fn roles(size: OrgSize) -> Vec<GovernanceRole> {
    let mut roles = vec![
        GovernanceRole {
            title: "AI Risk Owner",
            mandate: "Accountable for the AI risk register and sign-off on high-risk releases.",
        },
        GovernanceRole {
            title: "Model Owner",
            mandate: "Maintains documentation, monitoring and retirement plans for each model.",
        },
    ];

    if size >= OrgSize::Small {
        roles.push(GovernanceRole {
            title: "AI Governance Lead",
            mandate: "Runs the governance program, policies and assessments day to day.",
        });
        roles.push(GovernanceRole {
            title: "Privacy Officer",
            mandate: "Reviews personal data use and coordinates data protection impact assessments.",
        });
    }
    if size >= OrgSize::Medium {
        roles.push(GovernanceRole {
            title: "AI Ethics Advisor",
            mandate: "Advises on fairness, societal impact and contested use cases.",
        });
        roles.push(GovernanceRole {
            title: "ML Security Engineer",
            mandate: "Owns adversarial testing, model supply chain and AI incident forensics.",
        });
    }
    if size >= OrgSize::Enterprise {
        roles.push(GovernanceRole {
            title: "Chief AI Officer",
            mandate: "Executive owner of AI strategy and risk appetite, reporting to the board.",
        });
        roles.push(GovernanceRole {
            title: "AI Assurance Lead",
            mandate: "Leads independent testing and audit readiness across business units.",
        });
    }

    roles
}

fn committees(size: OrgSize, maturity: MaturityStage) -> Vec<Committee> {
    let mut committees = vec![Committee {
        name: "AI Review Huddle",
        cadence: "monthly",
        purpose: "Review new AI use cases, open risks and incidents.",
    }];

    if size >= OrgSize::Medium || maturity >= MaturityStage::Developing {
        committees.push(Committee {
            name: "AI Governance Committee",
            cadence: "monthly",
            purpose: "Approve policies, prioritize risk treatment and track control implementation.",
        });
    }
    if size >= OrgSize::Medium && maturity >= MaturityStage::Defined {
        committees.push(Committee {
            name: "Model Risk Review Board",
            cadence: "bi-weekly",
            purpose: "Approve high-risk models before deployment and after material change.",
        });
    }
    if size >= OrgSize::Enterprise {
        committees.push(Committee {
            name: "Board Risk Committee (AI agenda)",
            cadence: "quarterly",
            purpose: "Oversee AI risk appetite and receive assurance reporting.",
        });
    }
    if maturity >= MaturityStage::Optimized {
        committees.push(Committee {
            name: "Responsible AI Council",
            cadence: "quarterly",
            purpose: "Benchmark practices externally and steer continuous improvement.",
        });
    }

    committees
}

fn raci(size: OrgSize) -> Vec<RaciRow> {
    let (release_accountable, policy_accountable) = match size {
        OrgSize::Startup => ("CTO", "CEO"),
        OrgSize::Small => ("AI Governance Lead", "CEO"),
        OrgSize::Medium => ("AI Governance Committee", "Chief Risk Officer"),
        OrgSize::Enterprise => ("Model Risk Review Board", "Chief AI Officer"),
    };

    vec![
        RaciRow {
            decision: "Approve high-risk AI deployment",
            responsible: "Model Owner",
            accountable: release_accountable,
            consulted: "Legal, Privacy, Security",
            informed: "Executive leadership",
        },
        RaciRow {
            decision: "Set AI policy and risk appetite",
            responsible: "AI Risk Owner",
            accountable: policy_accountable,
            consulted: "Legal, Business leads",
            informed: "All staff",
        },
        RaciRow {
            decision: "Respond to an AI incident",
            responsible: "Incident response team",
            accountable: "AI Risk Owner",
            consulted: "Legal, Communications",
            informed: "Affected customers, regulators where required",
        },
        RaciRow {
            decision: "Onboard a third-party AI vendor",
            responsible: "Procurement",
            accountable: "AI Risk Owner",
            consulted: "Security, Privacy",
            informed: "Model Owner",
        },
        RaciRow {
            decision: "Retire or roll back a model",
            responsible: "Model Owner",
            accountable: "AI Risk Owner",
            consulted: "Engineering, Support",
            informed: "Product users",
        },
    ]
}

fn review_cadence(size: OrgSize) -> &'static str {
    match size {
        OrgSize::Startup => "Semi-annual review of the AI inventory and risk register.",
        OrgSize::Small => "Quarterly review of AI risks with an annual policy refresh.",
        OrgSize::Medium => {
            "Monthly committee review, quarterly control testing, annual policy refresh."
        }
        OrgSize::Enterprise => {
            "Continuous monitoring with monthly risk reporting and quarterly board updates."
        }
    }
}

fn oversight_patterns() -> Vec<OversightPattern> {
    vec![
        OversightPattern {
            name: "Human-in-the-loop",
            description: "A person approves each AI output before it takes effect. Use for decisions that deny or materially affect services.",
        },
        OversightPattern {
            name: "Human-on-the-loop",
            description: "The system acts autonomously while a person monitors and can intervene or halt it. Use for high-volume, reversible decisions.",
        },
        OversightPattern {
            name: "Human-in-command",
            description: "People decide when and whether AI is used at all and can override it at any time. Applies to every deployment.",
        },
    ]
}

fn whistleblower(size: OrgSize) -> WhistleblowerChannel {
    match size {
        OrgSize::Startup => WhistleblowerChannel {
            channel: "Dedicated email alias monitored by a founder and an external advisor",
            process: "Concerns are logged, acknowledged and reviewed by someone outside the reporter's line.",
            response_sla: "Acknowledge within 5 business days",
        },
        OrgSize::Small => WhistleblowerChannel {
            channel: "Anonymous web form routed to the AI Governance Lead",
            process: "Triage within the governance function with escalation to leadership when substantiated.",
            response_sla: "Acknowledge within 3 business days",
        },
        OrgSize::Medium => WhistleblowerChannel {
            channel: "Third-party ethics hotline covering AI concerns",
            process: "Independent intake, case management and quarterly reporting to the governance committee.",
            response_sla: "Acknowledge within 2 business days",
        },
        OrgSize::Enterprise => WhistleblowerChannel {
            channel: "Multilingual third-party hotline with anonymous two-way messaging",
            process: "Investigations led by compliance with audit committee oversight and anti-retaliation monitoring.",
            response_sla: "Acknowledge within 1 business day",
        },
    }
}

fn escalation(size: OrgSize) -> Vec<EscalationStep> {
    let (first_owner, second_owner, third_owner) = match size {
        OrgSize::Startup => ("Engineering lead", "CTO", "CEO"),
        OrgSize::Small => ("Model Owner", "AI Governance Lead", "CEO"),
        OrgSize::Medium => ("Model Owner", "AI Governance Committee", "Executive leadership team"),
        OrgSize::Enterprise => ("Model Owner", "Responsible AI office", "Chief AI Officer and board"),
    };

    vec![
        EscalationStep {
            level: 1,
            trigger: "Model performance or fairness metric breaches its threshold",
            owner: first_owner,
            response_time: "1 business day",
        },
        EscalationStep {
            level: 2,
            trigger: "Customer harm, regulatory exposure or repeated level 1 breaches",
            owner: second_owner,
            response_time: "4 hours",
        },
        EscalationStep {
            level: 3,
            trigger: "Serious incident requiring shutdown, disclosure or regulator notification",
            owner: third_owner,
            response_time: "1 hour",
        },
    ]
}

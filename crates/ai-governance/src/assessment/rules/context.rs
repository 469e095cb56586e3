use serde::{Deserialize, Serialize};

use super::super::answers::{
    AutonomyLevel, ImpactSeverity, OrgAnswers, OrgContext, ProductAnswers,
};
use super::super::domain::{AssessmentScope, MaturityStage, OrgSize, RiskResult, RiskTier};
use super::super::jurisdiction::regions;

/// Names a rule condition may reference. Unknown names are rejected when rules load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextField {
    Scope,
    RiskTier,
    AiType,
    DataTypes,
    Jurisdictions,
    CanDenyServices,
    UsesThirdPartyModels,
    CustomerFacing,
    OrgSize,
    MaturityStage,
    CloudProviders,
    HumanInTheLoop,
    ImpactSeverity,
    AutonomyLevel,
    DeploymentStage,
    VulnerablePopulations,
}

/// Shape of the value a field carries; conditions are type-checked against it at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
    Flag,
}

impl ContextField {
    pub const ALL: [Self; 16] = [
        Self::Scope,
        Self::RiskTier,
        Self::AiType,
        Self::DataTypes,
        Self::Jurisdictions,
        Self::CanDenyServices,
        Self::UsesThirdPartyModels,
        Self::CustomerFacing,
        Self::OrgSize,
        Self::MaturityStage,
        Self::CloudProviders,
        Self::HumanInTheLoop,
        Self::ImpactSeverity,
        Self::AutonomyLevel,
        Self::DeploymentStage,
        Self::VulnerablePopulations,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::RiskTier => "riskTier",
            Self::AiType => "aiType",
            Self::DataTypes => "dataTypes",
            Self::Jurisdictions => "jurisdictions",
            Self::CanDenyServices => "canDenyServices",
            Self::UsesThirdPartyModels => "usesThirdPartyModels",
            Self::CustomerFacing => "customerFacing",
            Self::OrgSize => "orgSize",
            Self::MaturityStage => "maturityStage",
            Self::CloudProviders => "cloudProviders",
            Self::HumanInTheLoop => "humanInTheLoop",
            Self::ImpactSeverity => "impactSeverity",
            Self::AutonomyLevel => "autonomyLevel",
            Self::DeploymentStage => "deploymentStage",
            Self::VulnerablePopulations => "vulnerablePopulations",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::AiType | Self::DataTypes | Self::Jurisdictions | Self::CloudProviders => {
                FieldKind::List
            }
            Self::CanDenyServices
            | Self::UsesThirdPartyModels
            | Self::CustomerFacing
            | Self::HumanInTheLoop
            | Self::VulnerablePopulations => FieldKind::Flag,
            Self::Scope
            | Self::RiskTier
            | Self::OrgSize
            | Self::MaturityStage
            | Self::ImpactSeverity
            | Self::AutonomyLevel
            | Self::DeploymentStage => FieldKind::Text,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        // `aiTypes` is how the organization wizard spells it.
        if name == "aiTypes" {
            return Some(Self::AiType);
        }
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Borrowed view of one context value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Flag(bool),
}

impl FieldValue<'_> {
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => (*text).to_string(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Flag(flag) => flag.to_string(),
        }
    }
}

/// Flat evaluation record. This is the only input the rule engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub scope: AssessmentScope,
    pub risk_tier: RiskTier,
    #[serde(default)]
    pub ai_type: Vec<String>,
    #[serde(default)]
    pub data_types: Vec<String>,
    #[serde(default)]
    pub jurisdictions: Vec<String>,
    #[serde(default)]
    pub can_deny_services: bool,
    #[serde(default)]
    pub uses_third_party_models: bool,
    #[serde(default)]
    pub customer_facing: bool,
    #[serde(default)]
    pub org_size: Option<OrgSize>,
    #[serde(default)]
    pub maturity_stage: Option<MaturityStage>,
    #[serde(default)]
    pub cloud_providers: Vec<String>,
    #[serde(default)]
    pub human_in_the_loop: Option<bool>,
    #[serde(default)]
    pub impact_severity: Option<ImpactSeverity>,
    #[serde(default)]
    pub autonomy_level: Option<AutonomyLevel>,
    #[serde(default)]
    pub deployment_stage: Option<String>,
    #[serde(default)]
    pub vulnerable_populations: Option<bool>,
}

impl Context {
    /// Minimal context carrying only a scope and tier; everything else is absent.
    pub fn new(scope: AssessmentScope, risk_tier: RiskTier) -> Self {
        Self {
            scope,
            risk_tier,
            ai_type: Vec::new(),
            data_types: Vec::new(),
            jurisdictions: Vec::new(),
            can_deny_services: false,
            uses_third_party_models: false,
            customer_facing: false,
            org_size: None,
            maturity_stage: None,
            cloud_providers: Vec::new(),
            human_in_the_loop: None,
            impact_severity: None,
            autonomy_level: None,
            deployment_stage: None,
            vulnerable_populations: None,
        }
    }

    pub fn for_org(answers: &OrgAnswers, risk: &RiskResult) -> Self {
        Self {
            ai_type: trimmed(&answers.step4.ai_types),
            data_types: owned(answers.step3.data_types.categories()),
            jurisdictions: regions(&answers.step1.countries),
            can_deny_services: answers.step4.can_deny_services,
            uses_third_party_models: answers.step4.uses_third_party_models,
            customer_facing: answers.step1.customer_facing,
            org_size: Some(answers.step1.org_size),
            maturity_stage: Some(answers.step1.maturity_stage),
            cloud_providers: trimmed(&answers.step1.cloud_providers),
            ..Self::new(AssessmentScope::Org, risk.tier)
        }
    }

    pub fn for_product(answers: &ProductAnswers, parent: &OrgContext, risk: &RiskResult) -> Self {
        let deployment_stage = answers
            .step1
            .deployment_stage
            .as_deref()
            .map(str::trim)
            .filter(|stage| !stage.is_empty())
            .map(str::to_string);

        Self {
            ai_type: trimmed(&answers.step1.ai_type),
            data_types: owned(answers.step3.data_types.categories()),
            jurisdictions: regions(
                parent
                    .org_jurisdictions
                    .iter()
                    .chain(answers.step1.deployment_regions.iter()),
            ),
            can_deny_services: answers.step2.can_deny_services,
            uses_third_party_models: answers.step4.model_source.is_external(),
            customer_facing: answers.step1.customer_facing,
            cloud_providers: trimmed(&parent.org_cloud_providers),
            human_in_the_loop: Some(answers.step4.human_in_the_loop),
            impact_severity: Some(answers.step2.impact_severity),
            autonomy_level: Some(answers.step4.autonomy_level),
            deployment_stage,
            vulnerable_populations: Some(answers.step2.vulnerable_populations),
            ..Self::new(AssessmentScope::Product, risk.tier)
        }
    }

    /// Value of `field`, or `None` when the field is not known for this context.
    pub fn value(&self, field: ContextField) -> Option<FieldValue<'_>> {
        let value = match field {
            ContextField::Scope => FieldValue::Text(self.scope.label()),
            ContextField::RiskTier => FieldValue::Text(self.risk_tier.label()),
            ContextField::AiType => FieldValue::List(&self.ai_type),
            ContextField::DataTypes => FieldValue::List(&self.data_types),
            ContextField::Jurisdictions => FieldValue::List(&self.jurisdictions),
            ContextField::CanDenyServices => FieldValue::Flag(self.can_deny_services),
            ContextField::UsesThirdPartyModels => FieldValue::Flag(self.uses_third_party_models),
            ContextField::CustomerFacing => FieldValue::Flag(self.customer_facing),
            ContextField::OrgSize => FieldValue::Text(self.org_size?.label()),
            ContextField::MaturityStage => FieldValue::Text(self.maturity_stage?.label()),
            ContextField::CloudProviders => FieldValue::List(&self.cloud_providers),
            ContextField::HumanInTheLoop => FieldValue::Flag(self.human_in_the_loop?),
            ContextField::ImpactSeverity => FieldValue::Text(self.impact_severity?.label()),
            ContextField::AutonomyLevel => FieldValue::Text(self.autonomy_level?.label()),
            ContextField::DeploymentStage => FieldValue::Text(self.deployment_stage.as_deref()?),
            ContextField::VulnerablePopulations => FieldValue::Flag(self.vulnerable_populations?),
        };
        Some(value)
    }
}

fn trimmed(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn owned(values: Vec<&'static str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

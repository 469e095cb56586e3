//! Step-keyed answer sets captured by the organization and product wizards.
//!
//! Every field defaults so that partially completed wizards still deserialize; the
//! scorers read these structures by reference and never mutate them.

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{MaturityStage, OrgSize, RiskTier};
use super::labels::{deserialize_label, fold_label, AnswerLabel};

const fn default_version() -> u32 {
    1
}

/// Organization-level answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAnswers {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub step1: OrgProfileStep,
    #[serde(default)]
    pub step2: ImpactStep,
    #[serde(default)]
    pub step3: DataStep,
    #[serde(default)]
    pub step4: AiUsageStep,
    #[serde(default)]
    pub step5: OrgGovernanceStep,
}

impl Default for OrgAnswers {
    fn default() -> Self {
        Self {
            version: default_version(),
            step1: OrgProfileStep::default(),
            step2: ImpactStep::default(),
            step3: DataStep::default(),
            step4: AiUsageStep::default(),
            step5: OrgGovernanceStep::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgProfileStep {
    pub organization_name: String,
    pub industry: Option<String>,
    pub org_size: OrgSize,
    pub maturity_stage: MaturityStage,
    pub countries: Vec<String>,
    pub cloud_providers: Vec<String>,
    pub customer_facing: bool,
}

/// Harm sliders (nominally 1..=5) plus the organization's stated risk tolerance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactStep {
    pub financial: i32,
    pub operational: i32,
    pub safety_wellbeing: i32,
    pub reputational: i32,
    pub risk_tolerance: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataStep {
    pub data_types: DataTypes,
}

/// Sensitive data categories. PHI, PCI and children's data are the regulated set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTypes {
    #[serde(alias = "PII")]
    pub pii: bool,
    #[serde(alias = "PHI")]
    pub phi: bool,
    #[serde(alias = "PCI")]
    pub pci: bool,
    pub children: bool,
    pub biometric: bool,
}

impl DataTypes {
    /// Present categories in a fixed order.
    pub fn categories(&self) -> Vec<&'static str> {
        [
            (self.pii, "PII"),
            (self.phi, "PHI"),
            (self.pci, "PCI"),
            (self.children, "children"),
            (self.biometric, "biometric"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }

    pub fn regulated_categories(&self) -> Vec<&'static str> {
        [
            (self.phi, "PHI"),
            (self.pci, "PCI"),
            (self.children, "children"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }

    pub fn has_regulated(&self) -> bool {
        self.phi || self.pci || self.children
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiUsageStep {
    pub ai_types: Vec<String>,
    pub can_deny_services: bool,
    pub uses_third_party_models: bool,
}

/// Governance controls the organization reports as already in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgGovernanceStep {
    pub security_program: bool,
    pub incident_response_plan: bool,
    pub impact_assessments: bool,
    pub ai_policy: bool,
    pub model_inventory: bool,
    pub vendor_risk_management: bool,
    pub bias_testing: bool,
    pub human_oversight_process: bool,
}

impl OrgGovernanceStep {
    pub fn present(&self) -> Vec<&'static str> {
        [
            (self.security_program, "security program"),
            (self.incident_response_plan, "incident response plan"),
            (self.impact_assessments, "systematic impact assessments"),
            (self.ai_policy, "AI acceptable-use policy"),
            (self.model_inventory, "model inventory"),
            (self.vendor_risk_management, "vendor risk management"),
            (self.bias_testing, "bias testing"),
            (self.human_oversight_process, "human oversight process"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }
}

/// Product-level answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnswers {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub step1: ProductProfileStep,
    #[serde(default)]
    pub step2: ProductImpactStep,
    #[serde(default)]
    pub step3: DataStep,
    #[serde(default)]
    pub step4: AutonomyStep,
    #[serde(default)]
    pub step5: ProductControlsStep,
}

impl Default for ProductAnswers {
    fn default() -> Self {
        Self {
            version: default_version(),
            step1: ProductProfileStep::default(),
            step2: ProductImpactStep::default(),
            step3: DataStep::default(),
            step4: AutonomyStep::default(),
            step5: ProductControlsStep::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductProfileStep {
    pub product_name: String,
    pub description: Option<String>,
    pub ai_type: Vec<String>,
    pub deployment_stage: Option<String>,
    pub deployment_regions: Vec<String>,
    pub customer_facing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSeverity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl AnswerLabel for ImpactSeverity {
    const KIND: &'static str = "impact severity";

    fn from_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ImpactSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductImpactStep {
    pub impact_severity: ImpactSeverity,
    pub can_deny_services: bool,
    pub vulnerable_populations: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutonomyLevel {
    #[default]
    Assistive,
    Augmentative,
    Autonomous,
}

impl AutonomyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assistive => "assistive",
            Self::Augmentative => "augmentative",
            Self::Autonomous => "autonomous",
        }
    }
}

impl AnswerLabel for AutonomyLevel {
    const KIND: &'static str = "autonomy level";

    fn from_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "assistive" => Some(Self::Assistive),
            "augmentative" => Some(Self::Augmentative),
            "autonomous" => Some(Self::Autonomous),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for AutonomyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    #[default]
    InHouse,
    ThirdParty,
    OpenSource,
}

impl ModelSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InHouse => "in-house",
            Self::ThirdParty => "third-party",
            Self::OpenSource => "open-source",
        }
    }

    pub const fn is_external(self) -> bool {
        !matches!(self, Self::InHouse)
    }
}

impl AnswerLabel for ModelSource {
    const KIND: &'static str = "model source";

    fn from_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "inhouse" => Some(Self::InHouse),
            "thirdparty" => Some(Self::ThirdParty),
            "opensource" => Some(Self::OpenSource),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ModelSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutonomyStep {
    pub autonomy_level: AutonomyLevel,
    pub human_in_the_loop: bool,
    pub model_source: ModelSource,
}

impl Default for AutonomyStep {
    fn default() -> Self {
        Self {
            autonomy_level: AutonomyLevel::default(),
            human_in_the_loop: true,
            model_source: ModelSource::default(),
        }
    }
}

/// Product-level safeguards that reduce residual risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductControlsStep {
    pub monitoring: bool,
    pub rollback_plan: bool,
    pub model_documentation: bool,
    pub bias_testing: bool,
    pub red_teaming: bool,
    pub human_review_process: bool,
    pub incident_response: bool,
}

impl ProductControlsStep {
    pub fn present(&self) -> Vec<&'static str> {
        [
            (self.monitoring, "production monitoring"),
            (self.rollback_plan, "rollback plan"),
            (self.model_documentation, "model documentation"),
            (self.bias_testing, "bias testing"),
            (self.red_teaming, "red teaming"),
            (self.human_review_process, "human review process"),
            (self.incident_response, "incident response"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }
}

/// Organization facts a product assessment inherits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgContext {
    pub org_risk_tier: RiskTier,
    #[serde(default)]
    pub org_jurisdictions: Vec<String>,
    #[serde(default = "default_tolerance")]
    pub org_risk_tolerance: i32,
    #[serde(default)]
    pub org_cloud_providers: Vec<String>,
}

pub(crate) const NEUTRAL_TOLERANCE: i32 = 3;

const fn default_tolerance() -> i32 {
    NEUTRAL_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_org_answers_fill_defaults() {
        let answers: OrgAnswers = serde_json::from_str(
            r#"{"step1": {"countries": ["Germany"]}, "step3": {"dataTypes": {"PHI": true}}}"#,
        )
        .expect("answers parse");

        assert_eq!(answers.version, 1);
        assert_eq!(answers.step1.countries, vec!["Germany".to_string()]);
        assert!(answers.step3.data_types.phi);
        assert!(answers.step3.data_types.has_regulated());
        assert!(answers.step5.present().is_empty());
    }

    #[test]
    fn product_defaults_keep_a_human_in_the_loop() {
        let answers: ProductAnswers =
            serde_json::from_str(r#"{"step2": {"impactSeverity": "low"}}"#).expect("parses");
        assert!(answers.step4.human_in_the_loop);
        assert_eq!(answers.step4.model_source, ModelSource::InHouse);
        assert_eq!(answers.step2.impact_severity, ImpactSeverity::Low);
    }

    #[test]
    fn data_categories_keep_declaration_order() {
        let data = DataTypes {
            pii: true,
            phi: false,
            pci: true,
            children: true,
            biometric: false,
        };
        assert_eq!(data.categories(), vec!["PII", "PCI", "children"]);
        assert_eq!(data.regulated_categories(), vec!["PCI", "children"]);
    }

    #[test]
    fn enum_answers_ignore_case_and_separators() {
        let answers: ProductAnswers = serde_json::from_str(
            r#"{"step2": {"impactSeverity": "High"},
                "step4": {"autonomyLevel": "AUTONOMOUS", "modelSource": "Third Party"}}"#,
        )
        .expect("answers parse");

        assert_eq!(answers.step2.impact_severity, ImpactSeverity::High);
        assert_eq!(answers.step4.autonomy_level, AutonomyLevel::Autonomous);
        assert_eq!(answers.step4.model_source, ModelSource::ThirdParty);
    }

    #[test]
    fn org_profile_accepts_any_headcount_band() {
        let answers: OrgAnswers = serde_json::from_str(
            r#"{"step1": {"orgSize": "1-10", "maturityStage": "Defined", "countries": ["Canada"]}}"#,
        )
        .expect("answers parse");

        assert_eq!(answers.step1.org_size, OrgSize::Startup);
        assert_eq!(answers.step1.maturity_stage, MaturityStage::Defined);
        assert_eq!(answers.step1.countries, vec!["Canada".to_string()]);
    }

    #[test]
    fn unrecognized_enum_answers_fall_back_to_defaults() {
        let answers: ProductAnswers = serde_json::from_str(
            r#"{"step2": {"impactSeverity": "catastrophic", "canDenyServices": true},
                "step4": {"autonomyLevel": 3, "modelSource": null}}"#,
        )
        .expect("answers still parse");

        assert_eq!(answers.step2.impact_severity, ImpactSeverity::Low);
        assert!(answers.step2.can_deny_services);
        assert_eq!(answers.step4.autonomy_level, AutonomyLevel::Assistive);
        assert_eq!(answers.step4.model_source, ModelSource::InHouse);
    }
}

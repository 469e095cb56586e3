//! Assessment-to-controls decision engine.
//!
//! Answers are scored, flattened into a rule context, matched against declarative
//! rules, joined with the control catalog and cross-referenced against the NIST AI RMF.
//! Every stage is a pure function of its inputs.

pub mod answers;
pub mod blueprint;
pub mod controls;
pub mod crosswalk;
pub(crate) mod dedup;
pub mod domain;
pub mod engine;
pub mod jurisdiction;
pub mod labels;
pub mod reference;
pub mod rules;
pub mod scoring;
pub mod store;

#[cfg(test)]
mod tests;

pub use answers::{
    AiUsageStep, AutonomyLevel, AutonomyStep, DataStep, DataTypes, ImpactSeverity, ImpactStep,
    ModelSource, OrgAnswers, OrgContext, OrgGovernanceStep, OrgProfileStep, ProductAnswers,
    ProductControlsStep, ProductImpactStep, ProductProfileStep,
};
pub use blueprint::{generate_blueprint, GovernanceBlueprint};
pub use controls::{
    resolve_controls, split_for_recompute, Control, ControlCatalog, ControlResolver,
    ImplementationLevel, ResolvedControl, ResolverConfig, Suggestion,
};
pub use crosswalk::{
    map_to_taxonomy, write_mapping_csv, CoverageReport, MappingEntry, NistFunction, NistHierarchy,
};
pub use domain::{
    AssessmentScope, ControlScope, ControlSelection, ControlType, Designation, MaturityStage,
    OrgSize, RiskDriver, RiskResult, RiskTier,
};
pub use engine::{AssessmentEngine, EngineConfig, OrgAssessment, ProductAssessment};
pub use labels::AnswerLabel;
pub use reference::ReferenceDataError;
pub use rules::{evaluate_rules, Condition, Context, ContextField, Rule, RuleRejection, RuleSet};
pub use scoring::{score_org, score_product, RiskScorer, ScoringConfig};
pub use store::{
    AssessmentService, AssessmentStore, MemoryAssessmentStore, PersistSummary, StoreError,
};

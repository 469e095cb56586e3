use serde::Serialize;
use tracing::info;

use super::answers::{OrgAnswers, OrgContext, ProductAnswers};
use super::blueprint::{generate_blueprint, GovernanceBlueprint};
use super::controls::{ControlCatalog, ControlResolver, ResolvedControl, ResolverConfig, Suggestion};
use super::crosswalk::{map_to_taxonomy, CoverageReport, MappingEntry, NistHierarchy};
use super::domain::RiskResult;
use super::rules::{Context, RuleSet};
use super::scoring::{RiskScorer, ScoringConfig};

/// Dials for every stage of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub resolver: ResolverConfig,
}

/// Organization assessment output, including the context products inherit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAssessment {
    pub risk: RiskResult,
    pub context: Context,
    pub controls: Vec<ResolvedControl>,
    pub mappings: Vec<MappingEntry>,
    pub blueprint: GovernanceBlueprint,
    pub parent_context: OrgContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssessment {
    pub risk: RiskResult,
    pub context: Context,
    pub controls: Vec<ResolvedControl>,
    pub mappings: Vec<MappingEntry>,
}

/// Chains scorer, rule engine, resolver and crosswalk over loaded reference data.
///
/// Holds no mutable state; one engine can serve concurrent assessments.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    scorer: RiskScorer,
    rules: RuleSet,
    catalog: ControlCatalog,
    taxonomy: NistHierarchy,
    resolver: ResolverConfig,
}

impl AssessmentEngine {
    pub fn new(
        config: EngineConfig,
        rules: RuleSet,
        catalog: ControlCatalog,
        taxonomy: NistHierarchy,
    ) -> Self {
        Self {
            scorer: RiskScorer::new(config.scoring),
            rules,
            catalog,
            taxonomy,
            resolver: config.resolver,
        }
    }

    /// Engine over the reference data embedded in the crate.
    pub fn standard(config: EngineConfig) -> Self {
        Self::new(
            config,
            RuleSet::standard(),
            ControlCatalog::standard(),
            NistHierarchy::ai_rmf(),
        )
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn catalog(&self) -> &ControlCatalog {
        &self.catalog
    }

    pub fn taxonomy(&self) -> &NistHierarchy {
        &self.taxonomy
    }

    pub fn assess_org(&self, answers: &OrgAnswers, suggestions: &[Suggestion]) -> OrgAssessment {
        let risk = self.scorer.score_org(answers);
        let context = Context::for_org(answers, &risk);
        let parent_context = self.scorer.org_context(answers, &risk);

        let selections = self.rules.evaluate(&context);
        let controls = self
            .resolver_for(&answers.step1.cloud_providers)
            .resolve(selections, suggestions);
        let mappings = map_to_taxonomy(&controls, &self.taxonomy);
        let blueprint = generate_blueprint(answers.step1.org_size, answers.step1.maturity_stage);

        info!(
            organization = %answers.step1.organization_name,
            tier = %risk.tier,
            score = risk.score,
            controls = controls.len(),
            mappings = mappings.len(),
            "organization assessed"
        );

        OrgAssessment {
            risk,
            context,
            controls,
            mappings,
            blueprint,
            parent_context,
        }
    }

    pub fn assess_product(
        &self,
        answers: &ProductAnswers,
        parent: &OrgContext,
        suggestions: &[Suggestion],
    ) -> ProductAssessment {
        let risk = self.scorer.score_product(answers, parent);
        let context = Context::for_product(answers, parent, &risk);

        let selections = self.rules.evaluate(&context);
        let controls = self
            .resolver_for(&parent.org_cloud_providers)
            .resolve(selections, suggestions);
        let mappings = map_to_taxonomy(&controls, &self.taxonomy);

        info!(
            product = %answers.step1.product_name,
            tier = %risk.tier,
            org_tier = %parent.org_risk_tier,
            controls = controls.len(),
            "product assessed"
        );

        ProductAssessment {
            risk,
            context,
            controls,
            mappings,
        }
    }

    /// Coverage of `mappings` against the loaded taxonomy.
    pub fn coverage<I, S>(&self, mappings: &[MappingEntry], implemented_ids: I) -> CoverageReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CoverageReport::build(mappings, &self.taxonomy, implemented_ids)
    }

    fn resolver_for(&self, providers: &[String]) -> ControlResolver<'_> {
        ControlResolver::new(&self.catalog)
            .with_providers(providers)
            .with_config(self.resolver)
    }
}

mod config;
mod factors;
mod org;
mod product;

pub use config::{ScoringConfig, DEFAULT_GOVERNANCE_FLOOR, MIN_GOVERNANCE_FLOOR};
pub use factors::BASE_INHERENT_RISK;

use super::answers::{OrgAnswers, OrgContext, ProductAnswers};
use super::domain::RiskResult;
use tracing::debug;

/// Stateless scorer that applies the configured dials to answer sets.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score_org(&self, answers: &OrgAnswers) -> RiskResult {
        let result = org::score(answers, &self.config);
        debug!(
            score = result.score,
            tier = %result.tier,
            drivers = result.drivers.len(),
            "scored organization"
        );
        result
    }

    /// Score a product; the reported tier never falls below `parent.org_risk_tier`.
    pub fn score_product(&self, answers: &ProductAnswers, parent: &OrgContext) -> RiskResult {
        let result = product::score(answers, parent, &self.config);
        debug!(
            score = result.score,
            tier = %result.tier,
            org_tier = %parent.org_risk_tier,
            drivers = result.drivers.len(),
            "scored product"
        );
        result
    }

    /// Context a product assessment inherits from its organization.
    pub fn org_context(&self, answers: &OrgAnswers, result: &RiskResult) -> OrgContext {
        org::parent_context(answers, result)
    }
}

pub fn score_org(answers: &OrgAnswers) -> RiskResult {
    RiskScorer::default().score_org(answers)
}

pub fn score_product(answers: &ProductAnswers, parent: &OrgContext) -> RiskResult {
    RiskScorer::default().score_product(answers, parent)
}

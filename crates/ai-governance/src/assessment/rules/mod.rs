//! Declarative rule engine: typed conditions over a flat [`Context`], evaluated in
//! priority order and reduced so each control appears once with its strongest designation.

pub mod condition;
pub mod context;
pub mod loader;

use serde::Serialize;
use tracing::{debug, warn};

use super::dedup::{keep_strongest, KeyedReducer};
use super::domain::{ControlSelection, Designation};

pub use condition::Condition;
pub use context::{Context, ContextField, FieldKind, FieldValue};
pub use loader::{ActionDefinition, PickDefinition, RuleDefinition, RuleRejection, RuleSet};

/// Priority assigned to rules that do not declare one.
pub const DEFAULT_PRIORITY: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPick {
    pub control_id: String,
    pub designation: Designation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub rule_id: String,
    pub name: String,
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub actions: Vec<ControlPick>,
    pub reasoning: Option<String>,
}

impl Rule {
    /// Conditions are joined with AND; a rule without conditions always matches.
    pub fn matches(&self, context: &Context) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.evaluate(context))
    }

    /// Reasoning attached to every control this rule proposes.
    pub fn reasoning_for(&self, context: &Context) -> String {
        match &self.reasoning {
            Some(template) => render(template, context),
            None if self.conditions.is_empty() => {
                format!("{} ({}): applies to every assessment", self.name, self.rule_id)
            }
            None => {
                let matched: Vec<String> = self
                    .conditions
                    .iter()
                    .map(|condition| condition.describe(context))
                    .collect();
                format!("{} ({}): {}", self.name, self.rule_id, matched.join("; "))
            }
        }
    }
}

/// Substitute `{fieldName}` placeholders with context values. Unknown placeholders
/// are left as written; absent values render as `n/a`.
fn render(template: &str, context: &Context) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            rendered.push_str(&rest[start..]);
            return rendered;
        };

        let name = &after[..end];
        match ContextField::from_name(name) {
            Some(field) => match context.value(field) {
                Some(value) => rendered.push_str(&value.display()),
                None => rendered.push_str("n/a"),
            },
            None => {
                rendered.push('{');
                rendered.push_str(name);
                rendered.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    rendered.push_str(rest);
    rendered
}

/// Evaluate `rules` against `context`.
///
/// Rules run in ascending priority, ties in declaration order. Each control appears
/// once in first-match order, carrying the strongest designation proposed for it and
/// the reasoning of every rule that proposed it.
pub fn evaluate_rules(context: &Context, rules: &[Rule]) -> Vec<ControlSelection> {
    let mut ordered: Vec<(usize, &Rule)> = rules.iter().enumerate().collect();
    ordered.sort_by_key(|(index, rule)| (rule.priority, *index));

    let mut reducer = KeyedReducer::new(keep_strongest);
    let mut matched = 0usize;

    for (_, rule) in ordered {
        if rule.actions.is_empty() {
            warn!(rule_id = %rule.rule_id, "rule selects no controls; skipping");
            continue;
        }
        if !rule.matches(context) {
            continue;
        }

        matched += 1;
        let reason = rule.reasoning_for(context);
        for pick in &rule.actions {
            reducer.push(
                pick.control_id.clone(),
                ControlSelection::new(pick.control_id.clone(), pick.designation)
                    .with_reason(reason.clone()),
            );
        }
    }

    debug!(
        scope = context.scope.label(),
        rules = rules.len(),
        matched,
        selected = reducer.len(),
        "rules evaluated"
    );
    reducer.into_items()
}

impl RuleSet {
    pub fn evaluate(&self, context: &Context) -> Vec<ControlSelection> {
        evaluate_rules(context, self.rules())
    }
}

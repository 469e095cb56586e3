use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::super::domain::Designation;
use super::super::reference::ReferenceDataError;
use super::condition::Condition;
use super::context::ContextField;
use super::{ControlPick, Rule, DEFAULT_PRIORITY};

const STANDARD_RULES: &str = include_str!("../../../data/rules.json");

/// Wire shape of a rule in reference data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub rule_id: String,
    pub name: String,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub conditions: Map<String, Value>,
    #[serde(default)]
    pub actions: ActionDefinition,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    #[serde(default)]
    pub select_controls: Vec<PickDefinition>,
    #[serde(default)]
    pub designation: Option<Designation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PickDefinition {
    Id(String),
    Detailed {
        #[serde(alias = "controlId")]
        id: String,
        #[serde(default)]
        designation: Option<Designation>,
    },
}

/// Why a single rule was left out of a rule set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleRejection {
    #[error("rule at position {index} is not a valid rule definition: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("rule {rule_id} references unknown context field '{field}'")]
    UnknownField { rule_id: String, field: String },
    #[error("rule {rule_id} has an unsupported condition on '{field}': {reason}")]
    UnsupportedCondition {
        rule_id: String,
        field: String,
        reason: String,
    },
    #[error("rule {rule_id} selects no controls")]
    EmptyAction { rule_id: String },
}

/// Validated rules plus the definitions that were rejected while loading.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    rejected: Vec<RuleRejection>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            rejected: Vec::new(),
        }
    }

    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> Self {
        let mut set = Self::default();
        for definition in definitions {
            set.accept(Rule::try_from(definition));
        }
        set
    }

    /// Parse a JSON array of rule definitions. Only a document that is not a JSON
    /// array fails as a whole; bad entries are rejected one by one.
    pub fn from_json(raw: &str) -> Result<Self, ReferenceDataError> {
        let entries: Vec<Value> =
            serde_json::from_str(raw).map_err(ReferenceDataError::json("rules"))?;

        let mut set = Self::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RuleDefinition>(entry)
                .map_err(|err| RuleRejection::Malformed {
                    index,
                    reason: err.to_string(),
                })
                .and_then(Rule::try_from);
            set.accept(parsed);
        }
        Ok(set)
    }

    /// Built-in rule set shipped with the crate.
    pub fn standard() -> Self {
        Self::from_json(STANDARD_RULES).unwrap_or_else(|err| {
            warn!(error = %err, "embedded rule set unreadable; continuing without rules");
            Self::default()
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rejected(&self) -> &[RuleRejection] {
        &self.rejected
    }

    fn accept(&mut self, parsed: Result<Rule, RuleRejection>) {
        match parsed {
            Ok(rule) => self.rules.push(rule),
            Err(rejection) => {
                warn!(%rejection, "skipping malformed rule");
                self.rejected.push(rejection);
            }
        }
    }
}

impl TryFrom<RuleDefinition> for Rule {
    type Error = RuleRejection;

    fn try_from(definition: RuleDefinition) -> Result<Self, Self::Error> {
        let RuleDefinition {
            rule_id,
            name,
            priority,
            conditions,
            actions,
            reasoning,
        } = definition;

        let conditions = conditions
            .iter()
            .map(|(field, value)| parse_condition(&rule_id, field, value))
            .collect::<Result<Vec<_>, _>>()?;

        let default_designation = actions.designation.unwrap_or(Designation::Recommended);
        let actions: Vec<ControlPick> = actions
            .select_controls
            .into_iter()
            .filter_map(|pick| {
                let (control_id, designation) = match pick {
                    PickDefinition::Id(id) => (id, None),
                    PickDefinition::Detailed { id, designation } => (id, designation),
                };
                let control_id = control_id.trim().to_string();
                (!control_id.is_empty()).then(|| ControlPick {
                    control_id,
                    designation: designation.unwrap_or(default_designation),
                })
            })
            .collect();

        if actions.is_empty() {
            return Err(RuleRejection::EmptyAction { rule_id });
        }

        Ok(Rule {
            rule_id,
            name,
            priority: priority.unwrap_or(DEFAULT_PRIORITY),
            conditions,
            actions,
            reasoning: reasoning.filter(|template| !template.trim().is_empty()),
        })
    }
}

fn parse_condition(rule_id: &str, name: &str, value: &Value) -> Result<Condition, RuleRejection> {
    let field = ContextField::from_name(name).ok_or_else(|| RuleRejection::UnknownField {
        rule_id: rule_id.to_string(),
        field: name.to_string(),
    })?;
    let unsupported = |reason: String| RuleRejection::UnsupportedCondition {
        rule_id: rule_id.to_string(),
        field: name.to_string(),
        reason,
    };

    let condition = match value {
        Value::String(text) => Condition::Equals {
            field,
            value: text.clone(),
        },
        Value::Bool(expected) => Condition::Bool {
            field,
            expected: *expected,
        },
        Value::Array(items) => Condition::In {
            field,
            values: strings(items).map_err(unsupported)?,
        },
        Value::Object(operator) => parse_operator(field, operator).map_err(unsupported)?,
        other => return Err(unsupported(format!("unsupported value {other}"))),
    };

    condition.check_kind().map_err(unsupported)?;
    Ok(condition)
}

fn parse_operator(field: ContextField, operator: &Map<String, Value>) -> Result<Condition, String> {
    let mut entries = operator.iter();
    let (Some((op, argument)), None) = (entries.next(), entries.next()) else {
        return Err("operator objects must have exactly one key".to_string());
    };

    match (op.as_str(), argument) {
        ("equals", Value::String(value)) => Ok(Condition::Equals {
            field,
            value: value.clone(),
        }),
        ("in", Value::Array(items)) => Ok(Condition::In {
            field,
            values: strings(items)?,
        }),
        ("exists", Value::Bool(true)) => Ok(Condition::Exists { field }),
        ("exists", Value::Bool(false)) => {
            Err("absence checks are not supported; omit the condition instead".to_string())
        }
        (op, argument) => Err(format!("unsupported operator {op} with argument {argument}")),
    }
}

fn strings(items: &[Value]) -> Result<Vec<String>, String> {
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => Ok(text.clone()),
            other => Err(format!("expected string list entry, found {other}")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_detailed_control_picks() {
        let set = RuleSet::from_json(
            r#"[{
                "ruleId": "R-1",
                "name": "High tier",
                "conditions": {"riskTier": "HIGH"},
                "actions": {"selectControls": ["CTL-1", {"id": "CTL-2", "designation": "REQUIRED"}]}
            }]"#,
        )
        .expect("document parses");

        assert!(set.rejected().is_empty());
        let rule = &set.rules()[0];
        assert_eq!(rule.priority, DEFAULT_PRIORITY);
        assert_eq!(rule.actions[0].designation, Designation::Recommended);
        assert_eq!(rule.actions[1].designation, Designation::Required);
    }

    #[test]
    fn rejects_unknown_fields_without_dropping_siblings() {
        let set = RuleSet::from_json(
            r#"[
                {"ruleId": "R-1", "name": "bad", "conditions": {"shoeSize": "42"},
                 "actions": {"selectControls": ["CTL-1"]}},
                {"ruleId": "R-2", "name": "empty", "conditions": {}, "actions": {"selectControls": []}},
                {"ruleId": "R-3", "name": "good", "conditions": {"canDenyServices": true},
                 "actions": {"selectControls": ["CTL-3"]}},
                {"name": "missing id"}
            ]"#,
        )
        .expect("document parses");

        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.rules()[0].rule_id, "R-3");
        assert_eq!(set.rejected().len(), 3);
        assert!(matches!(
            &set.rejected()[0],
            RuleRejection::UnknownField { field, .. } if field == "shoeSize"
        ));
        assert!(matches!(
            &set.rejected()[1],
            RuleRejection::EmptyAction { rule_id } if rule_id == "R-2"
        ));
        assert!(matches!(
            &set.rejected()[2],
            RuleRejection::Malformed { index: 3, .. }
        ));
    }

    #[test]
    fn operator_objects_map_to_conditions() {
        let set = RuleSet::from_json(
            r#"[{"ruleId": "R-1", "name": "ops",
                 "conditions": {
                    "deploymentStage": {"exists": true},
                    "dataTypes": {"in": ["PHI", "PCI"]},
                    "impactSeverity": {"equals": "high"}
                 },
                 "actions": {"selectControls": ["CTL-1"], "designation": "OPTIONAL"}}]"#,
        )
        .expect("document parses");

        let rule = &set.rules()[0];
        assert_eq!(rule.conditions.len(), 3);
        assert_eq!(rule.actions[0].designation, Designation::Optional);
    }

    #[test]
    fn type_mismatches_are_rejected_at_load() {
        let set = RuleSet::from_json(
            r#"[{"ruleId": "R-1", "name": "mismatch", "conditions": {"riskTier": true},
                 "actions": {"selectControls": ["CTL-1"]}}]"#,
        )
        .expect("document parses");
        assert!(set.rules().is_empty());
        assert!(matches!(
            &set.rejected()[0],
            RuleRejection::UnsupportedCondition { .. }
        ));
    }

    #[test]
    fn non_array_documents_fail_whole() {
        assert!(RuleSet::from_json(r#"{"ruleId": "R-1"}"#).is_err());
    }

    #[test]
    fn standard_rules_load_cleanly() {
        let set = RuleSet::standard();
        assert!(set.rejected().is_empty(), "{:?}", set.rejected());
        assert!(!set.rules().is_empty());
    }
}

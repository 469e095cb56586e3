use serde::Serialize;

use super::context::{Context, ContextField, FieldKind, FieldValue};

/// Closed set of predicates a rule may place on one context field.
///
/// On list-valued fields `Equals` means "contains" and `In` means "intersects".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Equals { field: ContextField, value: String },
    In { field: ContextField, values: Vec<String> },
    Exists { field: ContextField },
    Bool { field: ContextField, expected: bool },
}

impl Condition {
    pub fn field(&self) -> ContextField {
        match self {
            Condition::Equals { field, .. }
            | Condition::In { field, .. }
            | Condition::Exists { field }
            | Condition::Bool { field, .. } => *field,
        }
    }

    /// `Err` carries the reason when the predicate cannot apply to the field's kind.
    pub(crate) fn check_kind(&self) -> Result<(), String> {
        let kind = self.field().kind();
        match (self, kind) {
            (Condition::Bool { .. }, FieldKind::Flag) => Ok(()),
            (Condition::Bool { .. }, _) => Err(format!(
                "boolean condition on non-boolean field {}",
                self.field().name()
            )),
            (Condition::Equals { .. } | Condition::In { .. }, FieldKind::Flag) => Err(format!(
                "text condition on boolean field {}",
                self.field().name()
            )),
            (Condition::In { values, .. }, _) if values.is_empty() => {
                Err("empty value list".to_string())
            }
            _ => Ok(()),
        }
    }

    /// A missing field never satisfies a condition.
    pub fn evaluate(&self, context: &Context) -> bool {
        let Some(actual) = context.value(self.field()) else {
            return false;
        };

        match (self, actual) {
            (Condition::Equals { value, .. }, FieldValue::Text(text)) => {
                text.eq_ignore_ascii_case(value)
            }
            (Condition::Equals { value, .. }, FieldValue::List(items)) => {
                items.iter().any(|item| item.eq_ignore_ascii_case(value))
            }
            (Condition::In { values, .. }, FieldValue::Text(text)) => {
                values.iter().any(|value| value.eq_ignore_ascii_case(text))
            }
            (Condition::In { values, .. }, FieldValue::List(items)) => items
                .iter()
                .any(|item| values.iter().any(|value| value.eq_ignore_ascii_case(item))),
            (Condition::Exists { .. }, FieldValue::Text(text)) => !text.trim().is_empty(),
            (Condition::Exists { .. }, FieldValue::List(items)) => !items.is_empty(),
            (Condition::Exists { .. }, FieldValue::Flag(_)) => true,
            (Condition::Bool { expected, .. }, FieldValue::Flag(flag)) => flag == *expected,
            _ => false,
        }
    }

    /// Human-readable account of what satisfied this condition.
    pub fn describe(&self, context: &Context) -> String {
        let name = self.field().name();
        let actual = context.value(self.field());

        match (self, actual) {
            (Condition::Equals { value, .. }, Some(FieldValue::List(_))) => {
                format!("{name} includes {value}")
            }
            (Condition::Equals { .. } | Condition::In { .. }, Some(FieldValue::Text(text))) => {
                format!("{name} is {text}")
            }
            (Condition::In { values, .. }, Some(FieldValue::List(items))) => {
                let matched: Vec<&str> = items
                    .iter()
                    .filter(|item| values.iter().any(|value| value.eq_ignore_ascii_case(item)))
                    .map(String::as_str)
                    .collect();
                format!("{name} includes {}", matched.join(", "))
            }
            (Condition::Exists { .. }, Some(value)) => {
                format!("{name} is set ({})", value.display())
            }
            (Condition::Bool { expected, .. }, _) => format!("{name} is {expected}"),
            _ => format!("{name} is not set"),
        }
    }
}

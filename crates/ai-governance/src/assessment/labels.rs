//! Forgiving parsing for the enum answers the wizards emit.
//!
//! Wizard versions disagree on case and separators (`High`, `third_party`,
//! `Third-Party`), so labels are compared after folding to lowercase alphanumerics.
//! A value that still matches nothing falls back to the type's default with a
//! warning rather than failing the whole answer document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// An answer enum that can be read from a free-form wizard label.
pub trait AnswerLabel: Sized + Default {
    /// Name used in logs when a label is not recognized.
    const KIND: &'static str;

    /// Strict parse; `None` when the label names no variant.
    fn from_label(raw: &str) -> Option<Self>;
}

pub(crate) fn fold_label(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

pub(crate) fn deserialize_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: AnswerLabel,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Null => return Ok(T::default()),
        Value::String(raw) => T::from_label(raw),
        _ => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        warn!(kind = T::KIND, value = %value, "unrecognized answer label; using default");
        T::default()
    }))
}

/// Raised when a reference-data document cannot be parsed at all.
///
/// Individual bad entries inside a parseable document are skipped and logged instead.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("invalid {document} document: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ReferenceDataError {
    pub(crate) fn json(document: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Json { document, source }
    }
}

use thiserror::Error;

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors returned by template parsing and candidate generation.
///
/// Every variant is fatal for the current generation session: retrying
/// without changing the template or the data reproduces the same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template string is not initialized")]
    TemplateUnset,
    #[error("incomplete {kind} element (element=\"{element}\"): required data was never supplied")]
    IncompleteElement { kind: &'static str, element: String },
    #[error("invalid template \"{template}\": {reason}")]
    Parse { template: String, reason: String },
}

impl TemplateError {
    pub(crate) fn parse(template: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

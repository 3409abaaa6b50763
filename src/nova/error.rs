#[derive(Debug)]
pub enum NovaError {
    /// Retraining could not remove or write the model files.
    Training(crate::assistant::AssistantError),
    /// A reply sentence asked for a variable the handler did not provide.
    Template(crate::template::TemplateError),
}

impl std::fmt::Display for NovaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NovaError::Training(err) => f.write_fmt(format_args!("Self-training failed: {err}")),
            NovaError::Template(err) => {
                f.write_fmt(format_args!("Error rendering a reply: {err}"))
            }
        }
    }
}
impl std::error::Error for NovaError {}

impl From<crate::assistant::AssistantError> for NovaError {
    fn from(value: crate::assistant::AssistantError) -> Self {
        NovaError::Training(value)
    }
}
impl From<crate::template::TemplateError> for NovaError {
    fn from(value: crate::template::TemplateError) -> Self {
        NovaError::Template(value)
    }
}

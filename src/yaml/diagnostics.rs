//! Rich diagnostics for YAML parse failures

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A YAML syntax or shape error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(swapspec::yaml::syntax), help("Check the record against `swapspec <kind> show` output for the expected fields"))]
pub struct YamlSyntaxError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it was parsing
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err.location().map(|loc| {
            let offset = loc.index().min(content.len().saturating_sub(1));
            SourceSpan::from((offset, 1))
        });
        Self {
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

/// Errors raised while reading YAML records
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(Box<YamlSyntaxError>),

    #[error("failed to read file: {0}")]
    #[diagnostic(code(swapspec::yaml::io))]
    Io(#[from] std::io::Error),
}

impl From<YamlSyntaxError> for YamlError {
    fn from(err: YamlSyntaxError) -> Self {
        YamlError::Syntax(Box::new(err))
    }
}

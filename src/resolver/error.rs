use thiserror::Error;

use crate::xsd::QName;

/// Errors that abort a resolution. No roots are returned when one occurs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unsupported construct in {context}: {construct}")]
    UnsupportedConstruct {
        context: String,
        construct: &'static str,
    },
    #[error("type name {name:?} matches more than one declaration: {}", display_names(.candidates))]
    AmbiguousName { name: String, candidates: Vec<QName> },
    #[error("type {0} derives from itself")]
    CircularDerivation(QName),
}

fn display_names(names: &[QName]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

use thiserror::Error;

/// Errors raised while mapping an XSD document into the schema object model.
#[derive(Debug, Error)]
pub enum XsdError {
    #[error("the document is not well-formed XML")]
    Xml(#[from] roxmltree::Error),
    #[error("expected a <schema> root element, found <{0}>")]
    NotASchema(String),
    #[error("<{element}> is missing the required {attribute:?} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("invalid value {value:?} for attribute {attribute:?}")]
    InvalidValue { attribute: String, value: String },
}

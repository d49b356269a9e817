use roxmltree::Node;
use tracing::warn;

use super::{
    error::XsdError,
    values::{attribute_value, children_named, documentation, required_value},
    xstypes::{NCName, QName},
    SimpleType,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AttributeUse {
    #[default]
    Optional,
    Required,
    Prohibited,
}

impl AttributeUse {
    fn from_lexical(value: &str) -> Result<Self, XsdError> {
        match value.trim() {
            "optional" => Ok(Self::Optional),
            "required" => Ok(Self::Required),
            "prohibited" => Ok(Self::Prohibited),
            _ => Err(XsdError::InvalidValue {
                attribute: "use".into(),
                value: value.into(),
            }),
        }
    }
}

/// A local `<attribute>` declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attribute {
    pub name: NCName,
    pub type_ref: Option<QName>,
    pub use_: AttributeUse,
    pub default: Option<String>,
    pub annotation: Option<String>,
    pub simple_type: Option<SimpleType>,
}

impl Attribute {
    pub const TAG_NAME: &'static str = "attribute";

    pub fn type_ref(&self) -> Option<&QName> {
        self.type_ref.as_ref().filter(|name| !name.is_empty())
    }

    pub(super) fn map_from_xml(attribute: Node) -> Result<Self, XsdError> {
        let use_ = match attribute.attribute("use") {
            Some(value) => AttributeUse::from_lexical(value)?,
            None => AttributeUse::Optional,
        };
        let simple_type = children_named(attribute, SimpleType::TAG_NAME)
            .next()
            .map(SimpleType::map_from_xml)
            .transpose()?;

        Ok(Self {
            name: required_value(attribute, Self::TAG_NAME, "name")?,
            type_ref: attribute_value(attribute, "type")?,
            use_,
            default: attribute_value(attribute, "default")?,
            annotation: documentation(attribute),
            simple_type,
        })
    }

    /// Maps all `<attribute>` children of `parent`. Attribute references and attribute groups
    /// have no counterpart in the model and are dropped.
    pub(super) fn map_from_xml_children(parent: Node) -> Result<Vec<Self>, XsdError> {
        for group in children_named(parent, "attributeGroup") {
            warn!(reference = group.attribute("ref"), "attribute groups are not supported");
        }
        children_named(parent, Self::TAG_NAME)
            .filter(|attribute| match attribute.attribute("ref") {
                Some(reference) if attribute.attribute("name").is_none() => {
                    warn!(reference, "attribute references are not supported");
                    false
                }
                _ => true,
            })
            .map(Self::map_from_xml)
            .collect()
    }
}

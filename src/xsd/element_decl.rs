use roxmltree::Node;
use tracing::warn;

use super::{
    error::XsdError,
    model_group::Flatten,
    particle::Occurrence,
    values::{attribute_value, children_named, documentation, required_value},
    xstypes::{NCName, QName},
    ComplexType, SimpleType,
};

/// An `<element>` declaration, top-level or local.
///
/// The type is either referenced by name through `type_ref`, or defined inline through one of
/// `complex_type` / `simple_type`. When `type_ref` is present the inline definitions are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: NCName,
    pub type_ref: Option<QName>,
    pub default: Option<String>,
    pub occurs: Occurrence,
    pub annotation: Option<String>,
    pub complex_type: Option<ComplexType>,
    pub simple_type: Option<SimpleType>,
}

impl Element {
    pub const TAG_NAME: &'static str = "element";

    /// The referenced type name, if it is present and not empty.
    pub fn type_ref(&self) -> Option<&QName> {
        self.type_ref.as_ref().filter(|name| !name.is_empty())
    }

    /// Maps the `<element>` children of `parent`, skipping references to top-level elements.
    pub(super) fn map_from_xml_children(parent: Node) -> Result<Vec<Self>, XsdError> {
        children_named(parent, Self::TAG_NAME)
            .filter(|element| match element.attribute("ref") {
                Some(reference) if element.attribute("name").is_none() => {
                    warn!(reference, "element references are not expanded");
                    false
                }
                _ => true,
            })
            .map(Self::map_from_xml)
            .collect()
    }

    pub(super) fn map_from_xml(element: Node) -> Result<Self, XsdError> {
        // {name} The ·actual value· of the name [attribute].
        let name = required_value(element, Self::TAG_NAME, "name")?;

        let complex_type = children_named(element, ComplexType::TAG_NAME)
            .next()
            .map(ComplexType::map_from_xml)
            .transpose()?;
        let simple_type = children_named(element, SimpleType::TAG_NAME)
            .next()
            .map(SimpleType::map_from_xml)
            .transpose()?;

        Ok(Self {
            name,
            type_ref: attribute_value(element, "type")?,
            default: attribute_value(element, "default")?,
            occurs: Occurrence::map_from_xml(element)?,
            annotation: documentation(element),
            complex_type,
            simple_type,
        })
    }
}

impl Flatten for Element {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        self.complex_type.flatten_into(out);
    }
}

use roxmltree::Node;

use super::{
    error::XsdError,
    values::{attribute_value, children_named, documentation, required_value},
    xstypes::{NCName, QName},
};

/// A `<simpleType>` definition. Only derivation by restriction is modelled; `<list>` and
/// `<union>` leave `restriction` empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleType {
    pub name: Option<NCName>,
    pub annotation: Option<String>,
    pub restriction: Option<Restriction>,
}

/// `<restriction>`, in simple types and in simple content.
///
/// The facets are carried along but do not affect the resolved shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Restriction {
    pub base: QName,
    pub patterns: Vec<Pattern>,
    pub enumerations: Vec<Enumeration>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub value: String,
    pub annotation: Option<String>,
}

impl SimpleType {
    pub const TAG_NAME: &'static str = "simpleType";

    pub(super) fn map_from_xml(simple_type: Node) -> Result<Self, XsdError> {
        let restriction = children_named(simple_type, Restriction::TAG_NAME)
            .next()
            .map(Restriction::map_from_xml)
            .transpose()?;

        Ok(Self {
            name: attribute_value(simple_type, "name")?,
            annotation: documentation(simple_type),
            restriction,
        })
    }
}

impl Restriction {
    pub const TAG_NAME: &'static str = "restriction";

    pub(super) fn map_from_xml(restriction: Node) -> Result<Self, XsdError> {
        let patterns = children_named(restriction, "pattern")
            .map(|pattern| {
                Ok(Pattern {
                    value: required_value(pattern, "pattern", "value")?,
                })
            })
            .collect::<Result<_, XsdError>>()?;
        let enumerations = children_named(restriction, "enumeration")
            .map(|enumeration| {
                Ok(Enumeration {
                    value: required_value(enumeration, "enumeration", "value")?,
                    annotation: documentation(enumeration),
                })
            })
            .collect::<Result<_, XsdError>>()?;

        Ok(Self {
            base: required_value(restriction, Self::TAG_NAME, "base")?,
            patterns,
            enumerations,
        })
    }
}

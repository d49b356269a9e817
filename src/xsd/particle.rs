use roxmltree::Node;

use super::{error::XsdError, values::attribute_value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Unbounded,
    Count(u64),
}

impl Default for MaxOccurs {
    fn default() -> Self {
        Self::Count(1)
    }
}

impl MaxOccurs {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// The `minOccurs`/`maxOccurs` pair shared by elements and model groups. Both default to 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub min_occurs: u64,
    pub max_occurs: MaxOccurs,
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            min_occurs: 1,
            max_occurs: MaxOccurs::Count(1),
        }
    }
}

impl Occurrence {
    pub fn unbounded() -> Self {
        Self {
            max_occurs: MaxOccurs::Unbounded,
            ..Self::default()
        }
    }

    pub(super) fn map_from_xml(node: Node) -> Result<Self, XsdError> {
        // {min occurs}
        //   The ·actual value· of the minOccurs [attribute], if present, otherwise 1.
        let min_occurs = attribute_value::<u64>(node, "minOccurs")?.unwrap_or(1);

        // {max occurs}
        //   unbounded, if the maxOccurs [attribute] equals unbounded, otherwise the ·actual value·
        //   of the maxOccurs [attribute], if present, otherwise 1.
        let max_occurs = match node.attribute("maxOccurs").map(str::trim) {
            Some("unbounded") => MaxOccurs::Unbounded,
            Some(_) => MaxOccurs::Count(attribute_value::<u64>(node, "maxOccurs")?.unwrap_or(1)),
            None => MaxOccurs::Count(1),
        };

        Ok(Self {
            min_occurs,
            max_occurs,
        })
    }
}

/// Occurrence-bound reporting, implemented by every element and composition node.
pub trait Occurs {
    fn occurrence(&self) -> Occurrence;

    fn max_occurs(&self) -> MaxOccurs {
        self.occurrence().max_occurs
    }

    fn is_unbounded(&self) -> bool {
        self.max_occurs().is_unbounded()
    }
}

macro_rules! impl_occurs {
    ($($type_name:ty),* $(,)?) => {
        $(
            impl Occurs for $type_name {
                fn occurrence(&self) -> Occurrence {
                    self.occurs
                }
            }
        )*
    };
}

impl_occurs!(
    super::Element,
    super::model_group::Sequence,
    super::model_group::Choice,
    super::model_group::All,
    super::model_group::Group,
    super::model_group::Any,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence_of(xml: &str) -> Result<Occurrence, XsdError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        Occurrence::map_from_xml(doc.root_element())
    }

    #[test]
    fn defaults_to_exactly_once() {
        let occurs = occurrence_of("<element/>").unwrap();
        assert_eq!(occurs, Occurrence::default());
        assert!(!occurs.max_occurs.is_unbounded());
    }

    #[test]
    fn reads_unbounded() {
        let occurs = occurrence_of(r#"<element minOccurs="0" maxOccurs="unbounded"/>"#).unwrap();
        assert_eq!(occurs.min_occurs, 0);
        assert_eq!(occurs.max_occurs, MaxOccurs::Unbounded);
    }

    #[test]
    fn reads_finite_bound() {
        let occurs = occurrence_of(r#"<element maxOccurs="3"/>"#).unwrap();
        assert_eq!(occurs.max_occurs, MaxOccurs::Count(3));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            occurrence_of(r#"<element maxOccurs="lots"/>"#),
            Err(XsdError::InvalidValue { attribute, .. }) if attribute == "maxOccurs"
        ));
    }
}

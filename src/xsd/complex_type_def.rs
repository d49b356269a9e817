use roxmltree::Node;

use super::{
    error::XsdError,
    model_group::{Flatten, ModelGroup},
    values::{attribute_value, children_named, documentation, required_value},
    xstypes::{NCName, QName},
    Attribute, Element, Restriction,
};

/// A `<complexType>` definition, named (top-level) or anonymous (inline in an element).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComplexType {
    pub name: Option<NCName>,
    pub abstract_: bool,
    pub annotation: Option<String>,
    pub content: Option<ModelGroup>,
    pub attributes: Vec<Attribute>,
    pub complex_content: Option<ComplexContent>,
    pub simple_content: Option<SimpleContent>,
}

/// `<complexContent>`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComplexContent {
    pub annotation: Option<String>,
    pub derivation: Option<Derivation>,
}

/// `<simpleContent>`: a text-only complex type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleContent {
    pub annotation: Option<String>,
    pub derivation: Option<Derivation>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Derivation {
    Extension(Extension),
    Restriction(Restriction),
}

/// `<extension>`: the base type plus additional attributes and content layered on top of it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extension {
    pub base: QName,
    pub attributes: Vec<Attribute>,
    pub content: Option<ModelGroup>,
}

impl ComplexType {
    pub const TAG_NAME: &'static str = "complexType";

    pub(super) fn map_from_xml(complex_type: Node) -> Result<Self, XsdError> {
        let complex_content = children_named(complex_type, "complexContent")
            .next()
            .map(|node| {
                Ok::<_, XsdError>(ComplexContent {
                    annotation: documentation(node),
                    derivation: Derivation::map_from_xml_child(node)?,
                })
            })
            .transpose()?;
        let simple_content = children_named(complex_type, "simpleContent")
            .next()
            .map(|node| {
                Ok::<_, XsdError>(SimpleContent {
                    annotation: documentation(node),
                    derivation: Derivation::map_from_xml_child(node)?,
                })
            })
            .transpose()?;

        Ok(Self {
            name: attribute_value(complex_type, "name")?,
            abstract_: attribute_value(complex_type, "abstract")?.unwrap_or(false),
            annotation: documentation(complex_type),
            content: ModelGroup::map_from_xml_first_child(complex_type)?,
            attributes: Attribute::map_from_xml_children(complex_type)?,
            complex_content,
            simple_content,
        })
    }
}

impl Derivation {
    fn map_from_xml_child(content: Node) -> Result<Option<Self>, XsdError> {
        if let Some(extension) = children_named(content, Extension::TAG_NAME).next() {
            return Ok(Some(Self::Extension(Extension::map_from_xml(extension)?)));
        }
        children_named(content, Restriction::TAG_NAME)
            .next()
            .map(|restriction| Restriction::map_from_xml(restriction).map(Self::Restriction))
            .transpose()
    }
}

impl Extension {
    pub const TAG_NAME: &'static str = "extension";

    pub(super) fn map_from_xml(extension: Node) -> Result<Self, XsdError> {
        Ok(Self {
            base: required_value(extension, Self::TAG_NAME, "base")?,
            attributes: Attribute::map_from_xml_children(extension)?,
            content: ModelGroup::map_from_xml_first_child(extension)?,
        })
    }
}

impl Flatten for ComplexType {
    /// The content model's elements, followed by the elements an extension adds. Elements
    /// inherited from a base type are not included; those need the type index.
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        self.content.flatten_into(out);
        let derivations = [
            self.complex_content.as_ref().and_then(|c| c.derivation.as_ref()),
            self.simple_content.as_ref().and_then(|c| c.derivation.as_ref()),
        ];
        for derivation in derivations.into_iter().flatten() {
            if let Derivation::Extension(extension) = derivation {
                extension.content.flatten_into(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::Schema;

    #[test]
    fn flattens_content_then_extension_content() {
        let schema = Schema::parse(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="car">
                <xs:complexType>
                  <xs:complexContent>
                    <xs:extension base="Vehicle">
                      <xs:sequence>
                        <xs:element name="seats" type="xs:int"/>
                        <xs:choice>
                          <xs:element name="petrol" type="xs:string"/>
                          <xs:element name="electric" type="xs:string"/>
                        </xs:choice>
                      </xs:sequence>
                      <xs:attribute name="brand" type="xs:string"/>
                    </xs:extension>
                  </xs:complexContent>
                </xs:complexType>
              </xs:element>
            </xs:schema>
            "#,
        )
        .unwrap();

        let car = &schema.elements[0];
        let names: Vec<_> = car.flatten().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["seats", "petrol", "electric"]);

        let Some(ComplexContent {
            derivation: Some(Derivation::Extension(extension)),
            ..
        }) = car.complex_type.as_ref().and_then(|c| c.complex_content.as_ref())
        else {
            panic!("expected a complex content extension");
        };
        assert_eq!(extension.base.local_name, "Vehicle");
        assert_eq!(extension.attributes[0].name, "brand");
    }

    #[test]
    fn reads_abstract_flag() {
        let schema = Schema::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="Shape" abstract="true"/>
               </xs:schema>"#,
        )
        .unwrap();
        assert!(schema.complex_types[0].abstract_);
    }
}

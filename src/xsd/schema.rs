use roxmltree::Node;
use tracing::debug;

use super::{
    error::XsdError,
    values::{attribute_value, children_named, documentation},
    xstypes::AnyURI,
    ComplexType, Element, SimpleType,
};

/// One parsed schema document. Several of these (an import closure) are merged by the resolver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    pub target_namespace: Option<AnyURI>,
    pub annotation: Option<String>,
    pub imports: Vec<Import>,
    pub elements: Vec<Element>,
    pub complex_types: Vec<ComplexType>,
    pub simple_types: Vec<SimpleType>,
}

/// This structure represents the `import` element; loading the imported document is left to the
/// caller.
///
/// Note that an import is allowed to have neither a `schemaLocation` nor a `namespace` attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Import {
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

impl Import {
    pub const TAG_NAME: &'static str = "import";

    pub(super) fn map_from_xml(import: Node) -> Result<Self, XsdError> {
        Ok(Self {
            namespace: attribute_value(import, "namespace")?,
            schema_location: attribute_value(import, "schemaLocation")?,
        })
    }
}

impl Schema {
    pub const TAG_NAME: &'static str = "schema";

    /// Maps the text of one XSD document into the object model.
    pub fn parse(text: &str) -> Result<Self, XsdError> {
        Self::parse_with_options(text, false)
    }

    /// Like [`Schema::parse`], optionally accepting a document type definition.
    pub fn parse_with_options(text: &str, allow_dtd: bool) -> Result<Self, XsdError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd,
            ..roxmltree::ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(text, options)?;
        Self::map_from_xml(document.root_element())
    }

    pub fn map_from_xml(schema: Node) -> Result<Self, XsdError> {
        if schema.tag_name().name() != Self::TAG_NAME {
            return Err(XsdError::NotASchema(schema.tag_name().name().into()));
        }

        let target_namespace = attribute_value::<String>(schema, "targetNamespace")?;
        debug!(?target_namespace, "mapping schema document");

        Ok(Self {
            target_namespace,
            annotation: documentation(schema),
            imports: children_named(schema, Import::TAG_NAME)
                .map(Import::map_from_xml)
                .collect::<Result<_, _>>()?,
            elements: Element::map_from_xml_children(schema)?,
            complex_types: children_named(schema, ComplexType::TAG_NAME)
                .map(ComplexType::map_from_xml)
                .collect::<Result<_, _>>()?,
            simple_types: children_named(schema, SimpleType::TAG_NAME)
                .map(SimpleType::map_from_xml)
                .collect::<Result<_, _>>()?,
        })
    }

    /// The locations of all imports that name one.
    pub fn import_locations(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .filter_map(|import| import.schema_location.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::{
        particle::{MaxOccurs, Occurs},
        xstypes::QName,
        Derivation, ModelGroup, XS_NAMESPACE,
    };

    const SCHEMA: &str = r#"
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                   xmlns:tns="urn:shop" targetNamespace="urn:shop">
          <xs:import namespace="urn:common" schemaLocation="common.xsd"/>
          <xs:element name="Order" type="tns:OrderType">
            <xs:annotation><xs:documentation> An order. </xs:documentation></xs:annotation>
          </xs:element>
          <xs:complexType name="OrderType">
            <xs:sequence>
              <xs:element name="Line" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
            </xs:sequence>
            <xs:attribute name="id" type="xs:Name" use="required"/>
          </xs:complexType>
          <xs:complexType name="Price">
            <xs:simpleContent>
              <xs:extension base="xs:decimal">
                <xs:attribute name="currency" type="xs:token"/>
              </xs:extension>
            </xs:simpleContent>
          </xs:complexType>
          <xs:simpleType name="Code">
            <xs:restriction base="xs:token">
              <xs:pattern value="[A-Z]{3}"/>
              <xs:enumeration value="EUR"/>
            </xs:restriction>
          </xs:simpleType>
        </xs:schema>
    "#;

    #[test]
    fn maps_top_level_declarations() {
        let schema = Schema::parse(SCHEMA).unwrap();

        assert_eq!(schema.target_namespace.as_deref(), Some("urn:shop"));
        assert_eq!(schema.import_locations().collect::<Vec<_>>(), ["common.xsd"]);

        let order = &schema.elements[0];
        assert_eq!(order.name, "Order");
        assert_eq!(
            order.type_ref(),
            Some(&QName::with_namespace("urn:shop", "OrderType"))
        );
        assert_eq!(order.annotation.as_deref(), Some("An order."));

        let order_type = &schema.complex_types[0];
        let Some(ModelGroup::Sequence(sequence)) = &order_type.content else {
            panic!("expected a sequence, got {:?}", order_type.content);
        };
        let line = &sequence.elements[0];
        assert_eq!(line.type_ref, Some(QName::with_namespace(XS_NAMESPACE, "string")));
        assert_eq!(line.max_occurs(), MaxOccurs::Unbounded);
        assert_eq!(line.occurs.min_occurs, 0);
        assert_eq!(order_type.attributes[0].name, "id");

        let price = &schema.complex_types[1];
        let Some(Derivation::Extension(extension)) = price
            .simple_content
            .as_ref()
            .and_then(|c| c.derivation.as_ref())
        else {
            panic!("expected a simple content extension");
        };
        assert_eq!(extension.base.local_name, "decimal");
        assert_eq!(extension.attributes.len(), 1);

        let code = schema.simple_types[0].restriction.as_ref().unwrap();
        assert_eq!(code.patterns[0].value, "[A-Z]{3}");
        assert_eq!(code.enumerations[0].value, "EUR");
    }

    #[test]
    fn rejects_non_schema_root() {
        assert!(matches!(
            Schema::parse("<definitions/>"),
            Err(XsdError::NotASchema(name)) if name == "definitions"
        ));
    }

    #[test]
    fn rejects_unnamed_element() {
        let text = r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"><element type="string"/></schema>"#;
        assert!(matches!(
            Schema::parse(text),
            Err(XsdError::MissingAttribute {
                element: "element",
                attribute: "name"
            })
        ));
    }

    #[test]
    fn element_references_are_skipped() {
        let text = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="note" type="xs:string"/>
              <xs:complexType name="Memo">
                <xs:sequence>
                  <xs:element ref="note"/>
                  <xs:element name="a" type="xs:string"/>
                  <xs:choice><xs:element ref="note" minOccurs="0"/></xs:choice>
                </xs:sequence>
              </xs:complexType>
            </xs:schema>"#;
        let schema = Schema::parse(text).unwrap();

        let Some(ModelGroup::Sequence(sequence)) = &schema.complex_types[0].content else {
            panic!("expected a sequence");
        };
        let names: Vec<_> = sequence.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a"]);
        assert!(sequence.choices[0].elements.is_empty());
    }

    #[test]
    fn undeclared_type_prefix_keeps_local_name() {
        let text = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="Order" type="foo:Bar"/>
            </xs:schema>"#;
        let schema = Schema::parse(text).unwrap();
        assert_eq!(schema.elements[0].type_ref(), Some(&QName::local("Bar")));
    }

    #[test]
    fn reports_malformed_xml() {
        assert!(matches!(Schema::parse("<schema>"), Err(XsdError::Xml(_))));
    }

    #[test]
    fn dtd_needs_opting_in() {
        let text = r#"<!DOCTYPE schema []>
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#;
        assert!(matches!(Schema::parse(text), Err(XsdError::Xml(_))));
        assert_eq!(
            Schema::parse_with_options(text, true).unwrap(),
            Schema::default()
        );
    }
}

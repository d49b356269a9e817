use roxmltree::Node;

use super::{error::XsdError, xstypes::QName};

/// Conversion of an attribute's normalized value into its typed ·actual value·.
pub trait ActualValue<'a>: Sized {
    fn convert(src: &'a str, parent: Node) -> Result<Self, XsdError>;
}

impl<'a> ActualValue<'a> for &'a str {
    fn convert(src: &'a str, _parent: Node) -> Result<Self, XsdError> {
        Ok(src)
    }
}

impl ActualValue<'_> for String {
    fn convert(src: &'_ str, _parent: Node) -> Result<Self, XsdError> {
        Ok(src.to_string())
    }
}

impl ActualValue<'_> for QName {
    fn convert(src: &'_ str, parent: Node) -> Result<Self, XsdError> {
        Ok(QName::expand(src.trim(), parent))
    }
}

impl ActualValue<'_> for bool {
    fn convert(src: &str, parent: Node) -> Result<Self, XsdError> {
        match src.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(parent, src)),
        }
    }
}

impl ActualValue<'_> for u64 {
    fn convert(src: &str, parent: Node) -> Result<Self, XsdError> {
        src.trim().parse().map_err(|_| invalid(parent, src))
    }
}

fn invalid(parent: Node, value: &str) -> XsdError {
    // The attribute name is not known to the converter; report the owning element instead.
    XsdError::InvalidValue {
        attribute: parent.tag_name().name().to_string(),
        value: value.to_string(),
    }
}

/// Looks up `name` on `node` and converts it, if present.
pub fn attribute_value<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    name: &str,
) -> Result<Option<T>, XsdError> {
    node.attribute(name)
        .map(|value| {
            T::convert(value, node).map_err(|err| match err {
                XsdError::InvalidValue { value, .. } => XsdError::InvalidValue {
                    attribute: name.to_string(),
                    value,
                },
                other => other,
            })
        })
        .transpose()
}

/// Like [`attribute_value`], but the attribute must be present.
pub fn required_value<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<T, XsdError> {
    attribute_value(node, attribute)?.ok_or(XsdError::MissingAttribute { element, attribute })
}

/// Element children of `node` with the given local name.
pub fn children_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// The text of all `<annotation><documentation>` children, joined by blank lines.
pub fn documentation(node: Node) -> Option<String> {
    let text = children_named(node, "annotation")
        .flat_map(|annotation| children_named(annotation, "documentation"))
        .filter_map(|documentation| documentation.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>();
    if text.is_empty() {
        None
    } else {
        Some(text.join("\n\n"))
    }
}

//! Expanded names, the form every type reference takes once mapped.

use std::fmt;

use roxmltree::Node;
use tracing::warn;

pub type NCName = String;
pub type AnyURI = String;

/// Bound to the `xml` prefix without any declaration (Namespaces in XML 1.0, §3).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A local name and the namespace its prefix was bound to. Displayed as `{namespace}local`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace_name: Option<AnyURI>,
    pub local_name: NCName,
}

impl QName {
    pub fn new(namespace_name: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.map(str::to_owned),
            local_name: local_name.into(),
        }
    }

    pub fn with_namespace(namespace_name: &str, local_name: impl Into<String>) -> Self {
        Self::new(Some(namespace_name), local_name)
    }

    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(None, local_name)
    }

    pub fn is_empty(&self) -> bool {
        self.local_name.is_empty()
    }

    /// Expands `prefix:local` or `local` against the namespace declarations in scope at
    /// `context`.
    ///
    /// An unprefixed name takes the default namespace, if one is declared. A prefix with no
    /// declaration is dropped with a warning and only the local name is kept, which the type
    /// index then looks up by local name.
    pub fn expand(lexical: &str, context: Node) -> Self {
        let Some((prefix, local_name)) = lexical.split_once(':') else {
            return Self::new(context.lookup_namespace_uri(None), lexical);
        };

        let namespace_name = match prefix {
            "xml" => Some(XML_NAMESPACE),
            _ => context.lookup_namespace_uri(Some(prefix)),
        };
        if namespace_name.is_none() {
            warn!(prefix, name = lexical, "undeclared namespace prefix, keeping the local name");
        }
        Self::new(namespace_name, local_name)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace_name {
            Some(namespace_name) => write!(f, "{{{namespace_name}}}{}", self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = r#"<root xmlns="urn:default" xmlns:t="urn:t"><inner xmlns=""/></root>"#;

    #[test]
    fn expands_declared_prefixes() {
        let doc = roxmltree::Document::parse(SCOPE).unwrap();
        let root = doc.root_element();

        assert_eq!(QName::expand("t:Foo", root), QName::with_namespace("urn:t", "Foo"));
        assert_eq!(
            QName::expand("xml:lang", root),
            QName::with_namespace(XML_NAMESPACE, "lang")
        );
    }

    #[test]
    fn unprefixed_names_take_the_default_namespace() {
        let doc = roxmltree::Document::parse(SCOPE).unwrap();
        let root = doc.root_element();
        let inner = root.first_element_child().unwrap();

        assert_eq!(QName::expand("Foo", root), QName::with_namespace("urn:default", "Foo"));
        assert_eq!(QName::expand("Foo", inner), QName::local("Foo"));
    }

    #[test]
    fn undeclared_prefix_keeps_local_name() {
        let doc = roxmltree::Document::parse(SCOPE).unwrap();
        assert_eq!(QName::expand("u:Foo", doc.root_element()), QName::local("Foo"));
    }

    #[test]
    fn displays_in_clark_notation() {
        assert_eq!(QName::with_namespace("urn:a", "B").to_string(), "{urn:a}B");
        assert_eq!(QName::local("B").to_string(), "B");
    }
}
